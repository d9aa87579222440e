//! Email/password sign-in against the chat SDK.

use std::fmt;

use crate::{
    domain::message::User,
    infra::secrets::{mask_email, redact_text},
};

const LOGIN_SUCCEEDED: &str = "LOGIN_SUCCEEDED";
const LOGIN_FAILED: &str = "LOGIN_FAILED";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &mask_email(&self.email))
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginSourceError {
    InvalidCredentials,
    /// Transport or server failure. `detail` is free text from the SDK and may
    /// echo what was submitted.
    Unavailable { detail: String },
}

pub trait LoginSource {
    fn login(&self, credentials: &Credentials) -> Result<User, LoginSourceError>;
}

impl<T: LoginSource + ?Sized> LoginSource for &T {
    fn login(&self, credentials: &Credentials) -> Result<User, LoginSourceError> {
        (*self).login(credentials)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error("email is required")]
    MissingEmail,
    #[error("password is required")]
    MissingPassword,
    #[error("email or password is incorrect")]
    InvalidCredentials,
    #[error("sign-in is temporarily unavailable")]
    TemporarilyUnavailable,
}

pub fn login(source: &dyn LoginSource, credentials: &Credentials) -> Result<User, LoginError> {
    if credentials.email.trim().is_empty() {
        return Err(LoginError::MissingEmail);
    }
    if credentials.password.trim().is_empty() {
        return Err(LoginError::MissingPassword);
    }

    let trimmed = Credentials {
        email: credentials.email.trim().to_owned(),
        password: credentials.password.clone(),
    };

    match source.login(&trimmed) {
        Ok(user) => {
            tracing::info!(code = LOGIN_SUCCEEDED, user_id = %user.id, "signed in");
            Ok(user)
        }
        Err(LoginSourceError::InvalidCredentials) => {
            tracing::warn!(
                code = LOGIN_FAILED,
                email = %mask_email(&trimmed.email),
                "sign-in rejected"
            );
            Err(LoginError::InvalidCredentials)
        }
        Err(LoginSourceError::Unavailable { detail }) => {
            tracing::warn!(
                code = LOGIN_FAILED,
                email = %mask_email(&trimmed.email),
                detail = %redact_text(
                    &detail,
                    &[trimmed.password.as_str(), trimmed.email.as_str()]
                ),
                "sign-in failed"
            );
            Err(LoginError::TemporarilyUnavailable)
        }
    }
}
