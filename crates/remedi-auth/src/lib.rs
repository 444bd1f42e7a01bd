//! Identity provider boundary for Remedi.
//!
//! Authentication itself is a non-goal of this backend: tokens are minted
//! and validated by an external identity provider. This crate is the thin
//! REST client the server uses to verify ID tokens and to create or delete
//! accounts.

mod client;
mod error;

pub use client::{AuthClient, ProviderAccount, TokenClaims};
pub use error::AuthError;
