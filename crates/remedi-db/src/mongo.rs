//! Database connection and collection handles.

use crate::DbError;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use remedi_commerce::cart::Cart;
use remedi_commerce::catalog::Drug;
use remedi_commerce::user::User;

/// Handle to the pharmacy database.
///
/// Cheap to clone; collection handles are derived per call.
#[derive(Clone)]
pub struct Mongo {
    db: Database,
}

impl Mongo {
    /// Connect to the document store.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self, DbError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| DbError::Connect(e.to_string()))?;
        Ok(Self {
            db: client.database(db_name),
        })
    }

    /// Create the indexes the stores rely on.
    ///
    /// - unique `drug_name` backs the catalog uniqueness invariant
    /// - `(user_uid, purchased)` backs the open-cart and history lookups
    pub async fn ensure_indexes(&self) -> Result<(), DbError> {
        let unique_name = IndexModel::builder()
            .keys(doc! { "drug_name": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.drugs().create_index(unique_name).await?;

        let cart_lookup = IndexModel::builder()
            .keys(doc! { "user_uid": 1, "purchased": 1 })
            .build();
        self.carts().create_index(cart_lookup).await?;

        tracing::debug!("database indexes ensured");
        Ok(())
    }

    pub(crate) fn carts(&self) -> Collection<Cart> {
        self.db.collection("carts")
    }

    pub(crate) fn drugs(&self) -> Collection<Drug> {
        self.db.collection("drugs")
    }

    pub(crate) fn users(&self) -> Collection<User> {
        self.db.collection("users")
    }
}

/// Mint a new ObjectId hex string for a document key.
pub(crate) fn new_object_id() -> String {
    ObjectId::new().to_hex()
}

/// Get current Unix timestamp.
pub(crate) fn unix_now() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
