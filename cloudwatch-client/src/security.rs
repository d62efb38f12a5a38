//! Credential handling.
//!
//! AWS secrets are held in [`SecureString`], which is wiped from memory on drop
//! and never printed by `Debug`.

use zeroize::ZeroizeOnDrop;

/// A secure string that automatically clears its contents when dropped.
#[derive(Clone, PartialEq, Eq, ZeroizeOnDrop)]
pub struct SecureString(String);

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureString(***)")
    }
}

impl SecureString {
    /// Create a new secure string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the string value. Use carefully and avoid storing the result.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for SecureString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SecureString {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A static AWS access key pair.
#[derive(Clone, PartialEq, Eq)]
pub struct StaticCredentials {
    access_key_id: String,
    secret_access_key: SecureString,
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &self.secret_access_key)
            .finish()
    }
}

impl StaticCredentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: SecureString::new(secret_access_key.into()),
        }
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret_access_key(&self) -> &SecureString {
        &self.secret_access_key
    }

    /// An empty key pair means "use the default provider chain".
    pub fn is_empty(&self) -> bool {
        self.access_key_id.is_empty() && self.secret_access_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_string_expose() {
        let secure = SecureString::new("secret123");
        assert_eq!(secure.expose(), "secret123");
        assert!(!secure.is_empty());
    }

    #[test]
    fn test_secret_not_leaked_in_debug() {
        let creds = StaticCredentials::new("AKIAEXAMPLE", "wJalrXUtnFEMI/K7MDENG");
        let debug_output = format!("{creds:?}");

        assert!(debug_output.contains("AKIAEXAMPLE"));
        assert!(!debug_output.contains("wJalrXUtnFEMI"));
        assert!(debug_output.contains("SecureString(***)"));
    }

    #[test]
    fn test_empty_credentials() {
        assert!(StaticCredentials::new("", "").is_empty());
        assert!(!StaticCredentials::new("AKIA", "").is_empty());
    }
}
