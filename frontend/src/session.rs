use web_sys::window;

const TOKEN_KEY: &str = "token";

/// Credentials for authenticated requests. Read once at start-up and handed
/// to request functions through the component context.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn from_storage() -> Self {
        Self::new(get_stored_token())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Value for the `Authorization` header, if a token is present.
    pub fn authorization(&self) -> Option<String> {
        self.token.as_ref().map(|token| format!("Bearer {token}"))
    }
}

pub fn get_stored_token() -> Option<String> {
    window()
        .and_then(|w| w.local_storage().ok())
        .and_then(|s| s.and_then(|storage| storage.get_item(TOKEN_KEY).ok()))
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::Session;

    #[test]
    fn bearer_header_uses_the_stored_token() {
        let session = Session::new(Some("abc123".to_string()));
        assert!(session.is_authenticated());
        assert_eq!(session.authorization().as_deref(), Some("Bearer abc123"));
    }

    #[test]
    fn blank_token_counts_as_signed_out() {
        let session = Session::new(Some("   ".to_string()));
        assert!(!session.is_authenticated());
        assert_eq!(session.authorization(), None);
        assert_eq!(Session::default(), session);
    }
}
