use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;

pub const PHONE_MIN_LEN: usize = 6;
pub const PHONE_MAX_LEN: usize = 15;
pub const OTP_LEN: usize = 6;
pub const TITLE_MIN_LEN: usize = 2;
pub const TITLE_MAX_LEN: usize = 32;
pub const MESSAGE_MAX_LEN: usize = 500;

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("static regex"));
static OTP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{6}$").expect("static regex"));

/// Step one of login: a country must be picked and the phone number must be
/// 6 to 15 digits.
pub fn validate_login(country: &str, phone: &str) -> Result<(), ValidationError> {
    if country.trim().is_empty() {
        return Err(ValidationError::CountryRequired);
    }
    let phone = phone.trim();
    let len = phone.chars().count();
    if len < PHONE_MIN_LEN {
        return Err(ValidationError::PhoneTooShort);
    }
    if len > PHONE_MAX_LEN {
        return Err(ValidationError::PhoneTooLong);
    }
    if !DIGITS.is_match(phone) {
        return Err(ValidationError::PhoneNotNumeric);
    }
    Ok(())
}

pub fn validate_otp(code: &str) -> Result<(), ValidationError> {
    if OTP.is_match(code.trim()) {
        Ok(())
    } else {
        Err(ValidationError::OtpFormat)
    }
}

/// Returns the trimmed title on success.
pub fn validate_title(title: &str) -> Result<&str, ValidationError> {
    let title = title.trim();
    let len = title.chars().count();
    if len < TITLE_MIN_LEN {
        Err(ValidationError::TitleTooShort)
    } else if len > TITLE_MAX_LEN {
        Err(ValidationError::TitleTooLong)
    } else {
        Ok(title)
    }
}

/// Text may be empty only when an image is attached.
pub fn validate_message(text: &str, has_image: bool) -> Result<(), ValidationError> {
    if text.chars().count() > MESSAGE_MAX_LEN {
        return Err(ValidationError::MessageTooLong);
    }
    if text.trim().is_empty() && !has_image {
        return Err(ValidationError::EmptyMessage);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_rules() {
        assert_eq!(validate_login("", "123456"), Err(ValidationError::CountryRequired));
        assert_eq!(validate_login("VN", "12345"), Err(ValidationError::PhoneTooShort));
        assert_eq!(
            validate_login("VN", "1234567890123456"),
            Err(ValidationError::PhoneTooLong)
        );
        assert_eq!(validate_login("VN", "12ab56"), Err(ValidationError::PhoneNotNumeric));
        assert_eq!(validate_login("VN", " 0912345678 "), Ok(()));
    }

    #[test]
    fn otp_rules() {
        assert_eq!(validate_otp("123456"), Ok(()));
        assert_eq!(validate_otp("12345"), Err(ValidationError::OtpFormat));
        assert_eq!(validate_otp("12345a"), Err(ValidationError::OtpFormat));
        assert_eq!(validate_otp("1234567"), Err(ValidationError::OtpFormat));
        assert_eq!(ValidationError::OtpFormat.to_string(), "OTP must be 6 digits");
    }

    #[test]
    fn title_rules() {
        assert_eq!(validate_title("a"), Err(ValidationError::TitleTooShort));
        assert_eq!(validate_title("  Trip Planning "), Ok("Trip Planning"));
        assert_eq!(validate_title(&"x".repeat(32)).map(str::len), Ok(32));
        assert_eq!(validate_title(&"x".repeat(33)), Err(ValidationError::TitleTooLong));
        assert_eq!(ValidationError::TitleTooShort.to_string(), "Title is too short");
    }

    #[test]
    fn message_rules() {
        assert_eq!(validate_message("", false), Err(ValidationError::EmptyMessage));
        assert_eq!(validate_message("   ", false), Err(ValidationError::EmptyMessage));
        assert_eq!(validate_message("", true), Ok(()));
        assert_eq!(validate_message(&"é".repeat(500), false), Ok(()));
        assert_eq!(
            validate_message(&"x".repeat(501), true),
            Err(ValidationError::MessageTooLong)
        );
    }
}
