//! MongoDB cart store.
//!
//! Every mutation here is a single atomic update on the open-cart document,
//! keyed on `(user_uid, purchased: false)`. Concurrent fetch-or-create and
//! add-item calls for the same user therefore resolve to one open cart
//! instead of racing a check-then-act pair of operations.

use crate::mongo::{new_object_id, unix_now, Mongo};
use crate::repository::CartRepository;
use crate::DbError;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, to_bson, to_document, Document};
use mongodb::options::ReturnDocument;
use mongodb::Collection;
use remedi_commerce::cart::{Cart, CartItem};
use remedi_commerce::ids::{CartId, DrugId, UserId};

/// Cart documents in the `carts` collection.
#[derive(Clone)]
pub struct MongoCartStore {
    col: Collection<Cart>,
}

impl MongoCartStore {
    pub fn new(mongo: &Mongo) -> Self {
        Self { col: mongo.carts() }
    }

    fn open_filter(user: &UserId) -> Document {
        doc! { "user_uid": user.as_str(), "purchased": false }
    }
}

#[async_trait]
impl CartRepository for MongoCartStore {
    async fn find_open(&self, user: &UserId) -> Result<Option<Cart>, DbError> {
        Ok(self.col.find_one(Self::open_filter(user)).await?)
    }

    async fn open_or_create(&self, user: &UserId) -> Result<Cart, DbError> {
        let seed = Cart::empty(CartId::new(new_object_id()), user.clone());
        // Filter equality fields are set by the server on upsert-insert;
        // they must not repeat inside $setOnInsert.
        let mut on_insert = to_document(&seed)?;
        on_insert.remove("user_uid");
        on_insert.remove("purchased");

        self.col
            .find_one_and_update(Self::open_filter(user), doc! { "$setOnInsert": on_insert })
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or(DbError::NotFound)
    }

    async fn add_item(&self, user: &UserId, item: CartItem) -> Result<Cart, DbError> {
        let now = unix_now();
        let update = doc! {
            "$push": { "items": to_bson(&item)? },
            "$inc": { "subtotal.amount_cents": item.total.amount_cents },
            "$set": { "updated_at": now },
            "$setOnInsert": {
                "_id": new_object_id(),
                "subtotal.currency": item.total.currency.code(),
                "created_at": now,
            },
        };

        self.col
            .find_one_and_update(Self::open_filter(user), update)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or(DbError::NotFound)
    }

    async fn remove_item(&self, user: &UserId, drug: &DrugId) -> Result<bool, DbError> {
        let mut filter = Self::open_filter(user);
        filter.insert("items.drugId", drug.as_str());

        // Pipeline update: drop the matching lines, then recompute the
        // subtotal from what is left, all in one document-level operation.
        let pipeline = vec![
            doc! { "$set": {
                "items": { "$filter": {
                    "input": "$items",
                    "as": "item",
                    "cond": { "$ne": ["$$item.drugId", drug.as_str()] },
                }},
            }},
            doc! { "$set": {
                "subtotal.amount_cents": { "$sum": "$items.total.amount_cents" },
                "updated_at": unix_now(),
            }},
        ];

        let result = self.col.update_one(filter, pipeline).await?;
        Ok(result.matched_count > 0)
    }

    async fn purchase(&self, user: &UserId) -> Result<Option<Cart>, DbError> {
        let update = doc! { "$set": { "purchased": true, "updated_at": unix_now() } };
        Ok(self
            .col
            .find_one_and_update(Self::open_filter(user), update)
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn history(&self, user: &UserId) -> Result<Vec<Cart>, DbError> {
        let filter = doc! { "user_uid": user.as_str(), "purchased": true };
        let cursor = self.col.find(filter).sort(doc! { "updated_at": -1 }).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn list_all(&self) -> Result<Vec<Cart>, DbError> {
        let cursor = self.col.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }
}
