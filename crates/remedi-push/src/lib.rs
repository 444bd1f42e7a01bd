//! Push-messaging boundary for Remedi.
//!
//! Delivery guarantees are a non-goal: notifications are fire-and-forget,
//! and every failure is logged and absorbed by the caller. The provider
//! endpoint and server key come from configuration.

mod error;
mod message;
mod sender;

pub use error::PushError;
pub use message::Notice;
pub use sender::{HttpPushSender, PushSender};
