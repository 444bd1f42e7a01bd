//! MongoDB user directory store.

use crate::mongo::Mongo;
use crate::repository::UserRepository;
use crate::DbError;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::Collection;
use remedi_commerce::ids::UserId;
use remedi_commerce::user::{User, UserRole};

/// User directory documents in the `users` collection, keyed by the
/// identity-provider uid.
#[derive(Clone)]
pub struct MongoUserStore {
    col: Collection<User>,
}

impl MongoUserStore {
    pub fn new(mongo: &Mongo) -> Self {
        Self { col: mongo.users() }
    }
}

#[async_trait]
impl UserRepository for MongoUserStore {
    async fn find(&self, uid: &UserId) -> Result<Option<User>, DbError> {
        Ok(self.col.find_one(doc! { "_id": uid.as_str() }).await?)
    }

    async fn find_admin(&self) -> Result<Option<User>, DbError> {
        Ok(self
            .col
            .find_one(doc! { "role": UserRole::Admin.as_str() })
            .await?)
    }

    async fn insert(&self, user: User) -> Result<(), DbError> {
        self.col.insert_one(&user).await?;
        Ok(())
    }

    async fn delete(&self, uid: &UserId) -> Result<bool, DbError> {
        let result = self.col.delete_one(doc! { "_id": uid.as_str() }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn list(&self) -> Result<Vec<User>, DbError> {
        let cursor = self.col.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }
}
