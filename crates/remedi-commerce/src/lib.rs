//! Pharmacy commerce domain types and logic for Remedi.
//!
//! This crate provides the types the rest of the backend is built around:
//!
//! - **Catalog**: drugs, dosage forms, status, paginated catalog queries
//! - **Cart**: per-user shopping cart with price-snapshot line items
//! - **Users**: directory records for buyers and administrators
//! - **Money**: piastre-based integer money to keep totals exact
//!
//! No I/O happens here; persistence and provider boundaries live in the
//! sibling crates.

pub mod cart;
pub mod catalog;
pub mod error;
pub mod ids;
pub mod money;
pub mod user;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Drug, DrugForm, DrugPage, DrugQuery, DrugStatus, DrugUpdate, NewDrug};

    // Cart
    pub use crate::cart::{Cart, CartItem};

    // Users
    pub use crate::user::{User, UserRole};
}
