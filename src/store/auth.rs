/// Fields collected by the two-step login flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub phone: String,
    pub country: String,
    pub otp: String,
    pub is_authenticated: bool,
}

/// Owns the session state. Inputs are taken as given; callers validate
/// before invoking any setter.
#[derive(Debug, Default)]
pub struct AuthStore {
    state: AuthState,
}

impl AuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated
    }

    pub fn set_phone(&mut self, phone: impl Into<String>) {
        self.state.phone = phone.into();
    }

    pub fn set_country(&mut self, code: impl Into<String>) {
        self.state.country = code.into();
    }

    pub fn set_otp(&mut self, code: impl Into<String>) {
        self.state.otp = code.into();
    }

    pub fn set_authenticated(&mut self, authenticated: bool) {
        log::debug!("auth: authenticated = {authenticated}");
        self.state.is_authenticated = authenticated;
    }

    pub fn reset(&mut self) {
        log::debug!("auth: reset");
        self.state = AuthState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_are_set_independently() {
        let mut auth = AuthStore::new();
        auth.set_country("VN");
        auth.set_phone("0912345678");
        assert_eq!(auth.state().country, "VN");
        assert_eq!(auth.state().phone, "0912345678");
        assert!(auth.state().otp.is_empty());
        assert!(!auth.is_authenticated());

        auth.set_otp("123456");
        auth.set_authenticated(true);
        assert_eq!(auth.state().otp, "123456");
        assert!(auth.is_authenticated());
    }

    #[test]
    fn setters_accept_any_input() {
        let mut auth = AuthStore::new();
        auth.set_phone("");
        auth.set_otp("not-a-code");
        assert_eq!(auth.state().otp, "not-a-code");
    }

    #[test]
    fn reset_clears_everything() {
        let mut auth = AuthStore::new();
        auth.set_country("US");
        auth.set_phone("5551234");
        auth.set_otp("123456");
        auth.set_authenticated(true);

        auth.reset();
        assert_eq!(auth.state(), &AuthState::default());
    }
}
