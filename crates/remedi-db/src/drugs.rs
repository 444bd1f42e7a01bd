//! MongoDB drug catalog store.

use crate::mongo::{new_object_id, unix_now, Mongo};
use crate::repository::DrugRepository;
use crate::DbError;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, to_bson, Document};
use mongodb::options::ReturnDocument;
use mongodb::Collection;
use remedi_commerce::catalog::{Drug, DrugPage, DrugQuery, DrugUpdate, NewDrug};
use remedi_commerce::ids::DrugId;

/// Drug documents in the `drugs` collection.
#[derive(Clone)]
pub struct MongoDrugStore {
    col: Collection<Drug>,
}

impl MongoDrugStore {
    pub fn new(mongo: &Mongo) -> Self {
        Self { col: mongo.drugs() }
    }
}

#[async_trait]
impl DrugRepository for MongoDrugStore {
    async fn find(&self, id: &DrugId) -> Result<Option<Drug>, DbError> {
        Ok(self.col.find_one(doc! { "_id": id.as_str() }).await?)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Drug>, DbError> {
        Ok(self.col.find_one(doc! { "drug_name": name }).await?)
    }

    async fn list(&self, query: &DrugQuery) -> Result<DrugPage, DbError> {
        let filter = query.to_filter();
        let total = self.col.count_documents(filter.clone()).await? as i64;

        let cursor = self
            .col
            .find(filter)
            .sort(doc! { "drug_name": 1 })
            .skip(query.offset() as u64)
            .limit(query.per_page)
            .await?;
        let data: Vec<Drug> = cursor.try_collect().await?;

        Ok(DrugPage::new(data, total, query))
    }

    async fn distinct_forms(&self) -> Result<Vec<String>, DbError> {
        let values = self.col.distinct("forms.form", doc! {}).await?;
        Ok(values
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect())
    }

    async fn create(&self, input: NewDrug) -> Result<Drug, DbError> {
        let drug = Drug::from_input(DrugId::new(new_object_id()), input);
        self.col.insert_one(&drug).await?;
        Ok(drug)
    }

    async fn update(&self, id: &DrugId, changes: DrugUpdate) -> Result<Option<Drug>, DbError> {
        let mut set = Document::new();
        if let Some(name) = changes.drug_name {
            set.insert("drug_name", name);
        }
        if let Some(forms) = changes.forms {
            set.insert("forms", to_bson(&forms)?);
        }
        if let Some(strength) = changes.strength {
            set.insert("strength", strength);
        }
        if let Some(ingredients) = changes.active_ingredients {
            set.insert("active_ingredients", to_bson(&ingredients)?);
        }
        if let Some(status) = changes.status {
            set.insert("status", to_bson(&status)?);
        }
        if let Some(price) = changes.price {
            set.insert("price", to_bson(&price)?);
        }
        set.insert("updated_at", unix_now());

        Ok(self
            .col
            .find_one_and_update(doc! { "_id": id.as_str() }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn delete(&self, id: &DrugId) -> Result<bool, DbError> {
        let result = self.col.delete_one(doc! { "_id": id.as_str() }).await?;
        Ok(result.deleted_count > 0)
    }
}
