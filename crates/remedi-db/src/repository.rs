//! Repository traits over the document store.
//!
//! The HTTP layer and the cart workflow depend on these seams rather than
//! on the MongoDB types directly, so tests can substitute in-memory
//! implementations.

use crate::DbError;
use async_trait::async_trait;
use remedi_commerce::cart::{Cart, CartItem};
use remedi_commerce::catalog::{Drug, DrugPage, DrugQuery, DrugUpdate, NewDrug};
use remedi_commerce::ids::{DrugId, UserId};
use remedi_commerce::user::User;

/// Per-user cart documents.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// The cart with `purchased = false` for the user, if any. No side
    /// effects.
    async fn find_open(&self, user: &UserId) -> Result<Option<Cart>, DbError>;

    /// The user's open cart, created empty when none exists.
    ///
    /// Creation is atomic with the lookup: concurrent calls for the same
    /// user resolve to the same document.
    async fn open_or_create(&self, user: &UserId) -> Result<Cart, DbError>;

    /// Append a line to the user's open cart and bump the subtotal,
    /// creating the cart seeded with this single line when none is open.
    /// Returns the updated cart.
    async fn add_item(&self, user: &UserId, item: CartItem) -> Result<Cart, DbError>;

    /// Remove every line matching the drug from the user's open cart and
    /// recompute the subtotal. Returns false when there is no open cart or
    /// the drug is not in it.
    async fn remove_item(&self, user: &UserId, drug: &DrugId) -> Result<bool, DbError>;

    /// Flip the open cart to purchased and return the finalized record, or
    /// `None` when the user has no open cart.
    async fn purchase(&self, user: &UserId) -> Result<Option<Cart>, DbError>;

    /// All purchased carts for the user.
    async fn history(&self, user: &UserId) -> Result<Vec<Cart>, DbError>;

    /// Unfiltered listing of every cart. Testing-only capability.
    async fn list_all(&self) -> Result<Vec<Cart>, DbError>;
}

/// Drug catalog documents.
#[async_trait]
pub trait DrugRepository: Send + Sync {
    /// Look up a drug by id.
    async fn find(&self, id: &DrugId) -> Result<Option<Drug>, DbError>;

    /// Look up a drug by its unique name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Drug>, DbError>;

    /// Filtered, paginated catalog listing.
    async fn list(&self, query: &DrugQuery) -> Result<DrugPage, DbError>;

    /// Distinct dosage forms across the catalog.
    async fn distinct_forms(&self) -> Result<Vec<String>, DbError>;

    /// Insert a new drug and return the stored record.
    async fn create(&self, input: NewDrug) -> Result<Drug, DbError>;

    /// Apply a partial update. Returns the updated record, or `None` when
    /// the id does not resolve.
    async fn update(&self, id: &DrugId, changes: DrugUpdate) -> Result<Option<Drug>, DbError>;

    /// Delete a drug. Returns false when the id does not resolve.
    async fn delete(&self, id: &DrugId) -> Result<bool, DbError>;
}

/// User directory records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Look up a user by uid.
    async fn find(&self, uid: &UserId) -> Result<Option<User>, DbError>;

    /// Any administrator record, used to target purchase notifications.
    async fn find_admin(&self) -> Result<Option<User>, DbError>;

    /// Insert a directory record.
    async fn insert(&self, user: User) -> Result<(), DbError>;

    /// Delete a directory record. Returns false when absent.
    async fn delete(&self, uid: &UserId) -> Result<bool, DbError>;

    /// All directory records.
    async fn list(&self) -> Result<Vec<User>, DbError>;
}
