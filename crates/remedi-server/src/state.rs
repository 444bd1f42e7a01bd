//! Shared application state.

use crate::cart::CartWorkflow;
use remedi_auth::AuthClient;
use remedi_db::{
    CartRepository, DrugRepository, Mongo, MongoCartStore, MongoDrugStore, MongoUserStore,
    UserRepository,
};
use remedi_push::PushSender;
use std::sync::Arc;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub drugs: Arc<dyn DrugRepository>,
    pub users: Arc<dyn UserRepository>,
    pub auth: Arc<AuthClient>,
    pub workflow: Arc<CartWorkflow>,
}

impl AppState {
    /// Wire the stores and the cart workflow onto a database handle.
    pub fn new(mongo: &Mongo, auth: AuthClient, push: Arc<dyn PushSender>) -> Self {
        let drugs: Arc<dyn DrugRepository> = Arc::new(MongoDrugStore::new(mongo));
        let users: Arc<dyn UserRepository> = Arc::new(MongoUserStore::new(mongo));
        let carts: Arc<dyn CartRepository> = Arc::new(MongoCartStore::new(mongo));
        let workflow = Arc::new(CartWorkflow::new(
            carts,
            Arc::clone(&drugs),
            Arc::clone(&users),
            push,
        ));
        Self {
            drugs,
            users,
            auth: Arc::new(auth),
            workflow,
        }
    }
}
