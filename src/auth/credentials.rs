//! Application credentials for the IAM backend.

use std::fmt;

use zeroize::Zeroizing;

/// The application credential pair registered with the IAM backend.
///
/// The secret is wiped from memory when the credentials are dropped and is
/// never printed by `Debug`.
///
/// ## Example
///
/// ```rust
/// use iam_backend::AppCredentials;
///
/// let creds = AppCredentials::new("bk_demo", "app-secret");
/// assert_eq!(creds.app_code(), "bk_demo");
/// assert!(!format!("{:?}", creds).contains("app-secret"));
/// ```
#[derive(Clone)]
pub struct AppCredentials {
    app_code: String,
    app_secret: Zeroizing<String>,
}

impl AppCredentials {
    /// Creates a new credential pair.
    pub fn new(app_code: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_code: app_code.into(),
            app_secret: Zeroizing::new(app_secret.into()),
        }
    }

    /// Returns the application code.
    pub fn app_code(&self) -> &str {
        &self.app_code
    }

    /// Returns the application secret.
    pub fn app_secret(&self) -> &str {
        &self.app_secret
    }
}

impl fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppCredentials")
            .field("app_code", &self.app_code)
            .field("app_secret", &"[REDACTED]")
            .finish()
    }
}
