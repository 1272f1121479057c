use thiserror::Error;

/// Failures of the local key-value storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("snapshot encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures of the country list provider.
#[derive(Debug, Error)]
pub enum CountryError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Form validation failures. The `Display` text is shown to the user as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Country is required")]
    CountryRequired,
    #[error("Phone is too short")]
    PhoneTooShort,
    #[error("Phone is too long")]
    PhoneTooLong,
    #[error("Phone must contain digits only")]
    PhoneNotNumeric,
    #[error("OTP must be 6 digits")]
    OtpFormat,
    #[error("Title is too short")]
    TitleTooShort,
    #[error("Title is too long")]
    TitleTooLong,
    #[error("Message is empty")]
    EmptyMessage,
    #[error("Message is too long")]
    MessageTooLong,
}
