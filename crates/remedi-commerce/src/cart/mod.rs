//! Shopping cart module.
//!
//! Contains the per-user cart and its price-snapshot line items.

mod cart;

pub use cart::{Cart, CartItem};
