//! Push messaging error types.

use thiserror::Error;

/// Errors that can occur when sending a push notification.
///
/// Delivery is best-effort: callers log these and continue, they never
/// propagate into the operation that triggered the notification.
#[derive(Error, Debug)]
pub enum PushError {
    /// The provider rejected the message.
    #[error("push provider rejected message: {0}")]
    Provider(String),

    /// Could not reach the provider.
    #[error("push provider unreachable: {0}")]
    Network(String),
}

impl From<reqwest::Error> for PushError {
    fn from(e: reqwest::Error) -> Self {
        PushError::Network(e.to_string())
    }
}
