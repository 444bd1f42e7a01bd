//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in pharmacy commerce operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Drug not found in the catalog.
    #[error("Drug doesn't exist: {0}")]
    DrugNotFound(String),

    /// Drug name already taken.
    #[error("Drug already exists: {0}")]
    DrugAlreadyExists(String),

    /// No open cart exists for the user.
    #[error("No open cart for user: {0}")]
    CartNotFound(String),

    /// Item not in the open cart.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),

    /// Malformed identifier supplied by the caller.
    #[error("Bad ObjectID: {0}")]
    BadIdentifier(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Requested page is past the end of the listing.
    #[error("No more pages: requested {requested}, have {available}")]
    NoMorePages { requested: i64, available: i64 },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Validation error.
    #[error("Validation error: {0}")]
    ValidationError(String),
}
