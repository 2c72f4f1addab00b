use serde::Deserialize;

use crate::config::AdminConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AdminAuthError {
    #[error("Server configuration error")]
    NotConfigured,
    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Checks a username/password pair against the single configured admin account.
#[derive(Debug, Clone)]
pub struct AdminAuthenticator {
    config: AdminConfig,
}

impl AdminAuthenticator {
    pub fn new(config: AdminConfig) -> Self {
        Self { config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.username.is_some() && self.config.password.is_some()
    }

    pub fn verify(&self, username: &str, password: &str) -> Result<(), AdminAuthError> {
        let (Some(expected_user), Some(expected_password)) =
            (self.config.username.as_deref(), self.config.password.as_deref())
        else {
            return Err(AdminAuthError::NotConfigured);
        };

        if username == expected_user && password == expected_password {
            Ok(())
        } else {
            Err(AdminAuthError::InvalidCredentials)
        }
    }
}
