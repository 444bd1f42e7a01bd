//! Authentication error types.

use thiserror::Error;

/// Errors that can occur at the identity-provider boundary.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The ID token was rejected by the provider.
    #[error("invalid ID token")]
    InvalidToken,

    /// The ID token has expired.
    #[error("ID token expired")]
    TokenExpired,

    /// An account with this email already exists.
    #[error("email already registered")]
    EmailExists,

    /// No account matches the given uid or email.
    #[error("account not found")]
    AccountNotFound,

    /// The provider rejected the request for another reason.
    #[error("identity provider rejected request: {0}")]
    Provider(String),

    /// Could not reach the provider.
    #[error("identity provider unreachable: {0}")]
    Network(String),
}

impl AuthError {
    /// Map a provider error code to the matching variant.
    pub(crate) fn from_provider_code(code: &str) -> Self {
        // Codes sometimes carry a trailing detail, e.g. "TOKEN_EXPIRED : ...".
        let code = code.split_whitespace().next().unwrap_or(code);
        match code {
            "INVALID_ID_TOKEN" => AuthError::InvalidToken,
            "TOKEN_EXPIRED" => AuthError::TokenExpired,
            "EMAIL_EXISTS" => AuthError::EmailExists,
            "USER_NOT_FOUND" | "EMAIL_NOT_FOUND" => AuthError::AccountNotFound,
            other => AuthError::Provider(other.to_string()),
        }
    }

    /// True for errors that mean the caller's token is unusable, as opposed
    /// to the provider being unavailable.
    pub fn is_token_rejection(&self) -> bool {
        matches!(self, AuthError::InvalidToken | AuthError::TokenExpired)
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        AuthError::Network(e.to_string())
    }
}
