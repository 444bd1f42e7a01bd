//! Persistence error types.

use thiserror::Error;

/// Errors that can occur when using the document store.
///
/// Callers surface these as generic server errors; the full detail is
/// logged server-side only.
#[derive(Error, Debug)]
pub enum DbError {
    /// Failed to connect to the database.
    #[error("failed to connect to database: {0}")]
    Connect(String),

    /// A query or update failed.
    #[error("query execution failed: {0}")]
    Query(String),

    /// Failed to serialize a document.
    #[error("serialization error: {0}")]
    Serialize(String),

    /// No document returned when one was expected.
    #[error("no document returned")]
    NotFound,
}

impl From<mongodb::error::Error> for DbError {
    fn from(e: mongodb::error::Error) -> Self {
        DbError::Query(e.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for DbError {
    fn from(e: mongodb::bson::ser::Error) -> Self {
        DbError::Serialize(e.to_string())
    }
}
