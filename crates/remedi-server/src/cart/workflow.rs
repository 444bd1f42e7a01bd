//! Cart lifecycle orchestration.
//!
//! Composes the cart and catalog repositories with the push boundary into
//! the externally visible workflow: fetch-or-create, add item, remove
//! item, purchase. Identifier format is checked before any store access,
//! and the purchase notification can never fail the purchase itself.

use crate::error::ApiError;
use remedi_commerce::cart::{Cart, CartItem};
use remedi_commerce::ids::{DrugId, UserId};
use remedi_commerce::money::Money;
use remedi_commerce::CommerceError;
use remedi_db::{CartRepository, DrugRepository, UserRepository};
use remedi_push::{Notice, PushSender};
use std::sync::Arc;

/// Orchestrates the cart lifecycle for the HTTP handlers.
pub struct CartWorkflow {
    carts: Arc<dyn CartRepository>,
    drugs: Arc<dyn DrugRepository>,
    users: Arc<dyn UserRepository>,
    push: Arc<dyn PushSender>,
}

impl CartWorkflow {
    pub fn new(
        carts: Arc<dyn CartRepository>,
        drugs: Arc<dyn DrugRepository>,
        users: Arc<dyn UserRepository>,
        push: Arc<dyn PushSender>,
    ) -> Self {
        Self {
            carts,
            drugs,
            users,
            push,
        }
    }

    /// The caller's open cart, created empty when none exists.
    pub async fn open_cart(&self, user: &UserId) -> Result<Cart, ApiError> {
        Ok(self.carts.open_or_create(user).await?)
    }

    /// Add a drug to the caller's open cart.
    ///
    /// The line snapshots name, image, and unit price at this moment;
    /// later catalog price changes do not touch carts already holding the
    /// line. When no open cart exists, one is created seeded with this
    /// single line.
    pub async fn add_item(
        &self,
        user: &UserId,
        drug_id: &str,
        quantity: i64,
    ) -> Result<Cart, ApiError> {
        let drug_id = parse_drug_id(drug_id)?;
        let drug = self
            .drugs
            .find(&drug_id)
            .await?
            .ok_or_else(|| CommerceError::DrugNotFound(drug_id.to_string()))?;

        let item = CartItem::snapshot(&drug, quantity)?;
        Ok(self.carts.add_item(user, item).await?)
    }

    /// Remove every line for the drug from the caller's open cart.
    pub async fn remove_item(&self, user: &UserId, drug_id: &str) -> Result<(), ApiError> {
        let drug_id = parse_drug_id(drug_id)?;
        let removed = self.carts.remove_item(user, &drug_id).await?;
        if !removed {
            return Err(CommerceError::ItemNotInCart(drug_id.to_string()).into());
        }
        Ok(())
    }

    /// Finalize the caller's open cart and notify an administrator.
    ///
    /// The notification is fire-and-forget: it is dispatched after the
    /// purchase has committed, and its outcome is observed only for
    /// logging.
    pub async fn purchase(&self, user: &UserId, username: &str) -> Result<Cart, ApiError> {
        let cart = self
            .carts
            .purchase(user)
            .await?
            .ok_or_else(|| ApiError::BadRequest("User doesn't have cart to purchase!".to_string()))?;

        if cart.is_empty() {
            // Open product question: there is deliberately no guard here.
            tracing::debug!(user = %user, "purchased an empty cart");
        }

        self.dispatch_purchase_notice(username.to_string(), cart.subtotal);
        Ok(cart)
    }

    /// The caller's purchased carts.
    pub async fn history(&self, user: &UserId) -> Result<Vec<Cart>, ApiError> {
        Ok(self.carts.history(user).await?)
    }

    /// Every cart in the store. Testing-only.
    pub async fn list_all(&self) -> Result<Vec<Cart>, ApiError> {
        Ok(self.carts.list_all().await?)
    }

    fn dispatch_purchase_notice(&self, buyer: String, subtotal: Money) {
        let users = Arc::clone(&self.users);
        let push = Arc::clone(&self.push);
        tokio::spawn(async move {
            if let Err(e) = send_purchase_notice(users, push, &buyer, subtotal).await {
                tracing::warn!(error = %e, "purchase notification failed, continuing");
            }
        });
    }
}

/// Deliver the purchase notice to the administrator on file, if any.
async fn send_purchase_notice(
    users: Arc<dyn UserRepository>,
    push: Arc<dyn PushSender>,
    buyer: &str,
    subtotal: Money,
) -> anyhow::Result<()> {
    let Some(admin) = users.find_admin().await? else {
        tracing::debug!("no administrator on file, skipping purchase notice");
        return Ok(());
    };
    let Some(device_token) = admin.device_token else {
        tracing::debug!("administrator has no device token, skipping purchase notice");
        return Ok(());
    };

    let notice = Notice::new(
        "Order Purchased",
        format!("{buyer} purchased {} worth of items", subtotal.display()),
    );
    push.send(&device_token, &notice).await?;
    Ok(())
}

fn parse_drug_id(raw: &str) -> Result<DrugId, ApiError> {
    let id = DrugId::new(raw);
    if !id.is_valid() {
        return Err(CommerceError::BadIdentifier(id.into_inner()).into());
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use remedi_commerce::catalog::{
        Drug, DrugForm, DrugPage, DrugQuery, DrugStatus, DrugUpdate, NewDrug,
    };
    use remedi_commerce::ids::CartId;
    use remedi_commerce::money::Currency;
    use remedi_commerce::user::{User, UserRole};
    use remedi_db::DbError;
    use remedi_push::PushError;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::Mutex;

    struct MemoryCarts {
        carts: Mutex<Vec<Cart>>,
        counter: AtomicU64,
        touched: AtomicBool,
    }

    impl MemoryCarts {
        fn new() -> Self {
            Self {
                carts: Mutex::new(Vec::new()),
                counter: AtomicU64::new(1),
                touched: AtomicBool::new(false),
            }
        }

        fn next_id(&self) -> CartId {
            let n = self.counter.fetch_add(1, Ordering::SeqCst);
            CartId::new(format!("{n:024x}"))
        }

        fn mark(&self) {
            self.touched.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl CartRepository for MemoryCarts {
        async fn find_open(&self, user: &UserId) -> Result<Option<Cart>, DbError> {
            self.mark();
            let carts = self.carts.lock().unwrap();
            Ok(carts
                .iter()
                .find(|c| &c.user_uid == user && !c.purchased)
                .cloned())
        }

        async fn open_or_create(&self, user: &UserId) -> Result<Cart, DbError> {
            self.mark();
            let mut carts = self.carts.lock().unwrap();
            if let Some(cart) = carts.iter().find(|c| &c.user_uid == user && !c.purchased) {
                return Ok(cart.clone());
            }
            let cart = Cart::empty(self.next_id(), user.clone());
            carts.push(cart.clone());
            Ok(cart)
        }

        async fn add_item(&self, user: &UserId, item: CartItem) -> Result<Cart, DbError> {
            self.mark();
            let mut carts = self.carts.lock().unwrap();
            if let Some(cart) = carts
                .iter_mut()
                .find(|c| &c.user_uid == user && !c.purchased)
            {
                cart.push_item(item).map_err(|e| DbError::Query(e.to_string()))?;
                return Ok(cart.clone());
            }
            let mut cart = Cart::empty(self.next_id(), user.clone());
            cart.push_item(item).map_err(|e| DbError::Query(e.to_string()))?;
            carts.push(cart.clone());
            Ok(cart)
        }

        async fn remove_item(&self, user: &UserId, drug: &DrugId) -> Result<bool, DbError> {
            self.mark();
            let mut carts = self.carts.lock().unwrap();
            let Some(cart) = carts
                .iter_mut()
                .find(|c| &c.user_uid == user && !c.purchased)
            else {
                return Ok(false);
            };
            cart.remove_drug(drug).map_err(|e| DbError::Query(e.to_string()))
        }

        async fn purchase(&self, user: &UserId) -> Result<Option<Cart>, DbError> {
            self.mark();
            let mut carts = self.carts.lock().unwrap();
            let Some(cart) = carts
                .iter_mut()
                .find(|c| &c.user_uid == user && !c.purchased)
            else {
                return Ok(None);
            };
            cart.finalize();
            Ok(Some(cart.clone()))
        }

        async fn history(&self, user: &UserId) -> Result<Vec<Cart>, DbError> {
            self.mark();
            let carts = self.carts.lock().unwrap();
            Ok(carts
                .iter()
                .filter(|c| &c.user_uid == user && c.purchased)
                .cloned()
                .collect())
        }

        async fn list_all(&self) -> Result<Vec<Cart>, DbError> {
            self.mark();
            Ok(self.carts.lock().unwrap().clone())
        }
    }

    struct MemoryDrugs {
        drugs: Mutex<Vec<Drug>>,
        touched: AtomicBool,
    }

    impl MemoryDrugs {
        fn new(drugs: Vec<Drug>) -> Self {
            Self {
                drugs: Mutex::new(drugs),
                touched: AtomicBool::new(false),
            }
        }

        fn mark(&self) {
            self.touched.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl DrugRepository for MemoryDrugs {
        async fn find(&self, id: &DrugId) -> Result<Option<Drug>, DbError> {
            self.mark();
            Ok(self
                .drugs
                .lock()
                .unwrap()
                .iter()
                .find(|d| &d.id == id)
                .cloned())
        }

        async fn find_by_name(&self, name: &str) -> Result<Option<Drug>, DbError> {
            self.mark();
            Ok(self
                .drugs
                .lock()
                .unwrap()
                .iter()
                .find(|d| d.drug_name == name)
                .cloned())
        }

        async fn list(&self, query: &DrugQuery) -> Result<DrugPage, DbError> {
            self.mark();
            let drugs = self.drugs.lock().unwrap().clone();
            let total = drugs.len() as i64;
            Ok(DrugPage::new(drugs, total, query))
        }

        async fn distinct_forms(&self) -> Result<Vec<String>, DbError> {
            self.mark();
            Ok(Vec::new())
        }

        async fn create(&self, input: NewDrug) -> Result<Drug, DbError> {
            self.mark();
            let drug = Drug::from_input(DrugId::new(format!("{:024x}", 999)), input);
            self.drugs.lock().unwrap().push(drug.clone());
            Ok(drug)
        }

        async fn update(&self, _id: &DrugId, _changes: DrugUpdate) -> Result<Option<Drug>, DbError> {
            self.mark();
            Ok(None)
        }

        async fn delete(&self, _id: &DrugId) -> Result<bool, DbError> {
            self.mark();
            Ok(false)
        }
    }

    struct MemoryUsers {
        users: Mutex<Vec<User>>,
    }

    #[async_trait]
    impl UserRepository for MemoryUsers {
        async fn find(&self, uid: &UserId) -> Result<Option<User>, DbError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| &u.uid == uid)
                .cloned())
        }

        async fn find_admin(&self) -> Result<Option<User>, DbError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.is_admin())
                .cloned())
        }

        async fn insert(&self, user: User) -> Result<(), DbError> {
            self.users.lock().unwrap().push(user);
            Ok(())
        }

        async fn delete(&self, uid: &UserId) -> Result<bool, DbError> {
            let mut users = self.users.lock().unwrap();
            let before = users.len();
            users.retain(|u| &u.uid != uid);
            Ok(users.len() < before)
        }

        async fn list(&self) -> Result<Vec<User>, DbError> {
            Ok(self.users.lock().unwrap().clone())
        }
    }

    struct RecordingPush {
        sent: Mutex<Vec<(String, Notice)>>,
    }

    #[async_trait]
    impl PushSender for RecordingPush {
        async fn send(&self, device_token: &str, notice: &Notice) -> Result<(), PushError> {
            self.sent
                .lock()
                .unwrap()
                .push((device_token.to_string(), notice.clone()));
            Ok(())
        }
    }

    struct FailingPush;

    #[async_trait]
    impl PushSender for FailingPush {
        async fn send(&self, _device_token: &str, _notice: &Notice) -> Result<(), PushError> {
            Err(PushError::Network("simulated provider outage".into()))
        }
    }

    fn drug(id: &str, name: &str, price_cents: i64) -> Drug {
        Drug::from_input(
            DrugId::new(id),
            NewDrug {
                drug_name: name.to_string(),
                forms: vec![DrugForm {
                    form: "tablet".to_string(),
                    image: format!("{name}.jpg"),
                }],
                strength: "500 mg".to_string(),
                active_ingredients: vec!["paracetamol".to_string()],
                status: Some(DrugStatus::Available),
                price: Some(Money::new(price_cents, Currency::EGP)),
            },
        )
    }

    const PANADOL: &str = "6418a6c7e9d2b1f3a4c5d6e7";
    const BRUFEN: &str = "70f1b2c3d4e5f6a7b8c9d0e1";

    struct Fixture {
        workflow: CartWorkflow,
        carts: Arc<MemoryCarts>,
        drugs: Arc<MemoryDrugs>,
        user: UserId,
    }

    fn fixture_with_push(push: Arc<dyn PushSender>) -> Fixture {
        let carts = Arc::new(MemoryCarts::new());
        let drugs = Arc::new(MemoryDrugs::new(vec![
            drug(PANADOL, "Panadol", 1000),
            drug(BRUFEN, "Brufen", 2500),
        ]));
        let users = Arc::new(MemoryUsers {
            users: Mutex::new(vec![User {
                uid: UserId::new("admin-uid"),
                username: "pharmacist".to_string(),
                email: "admin@remedi.example".to_string(),
                role: UserRole::Admin,
                device_token: Some("admin-device".to_string()),
            }]),
        });
        let workflow = CartWorkflow::new(
            carts.clone() as Arc<dyn CartRepository>,
            drugs.clone() as Arc<dyn DrugRepository>,
            users as Arc<dyn UserRepository>,
            push,
        );
        Fixture {
            workflow,
            carts,
            drugs,
            user: UserId::new("uid-1"),
        }
    }

    fn fixture() -> Fixture {
        fixture_with_push(Arc::new(RecordingPush {
            sent: Mutex::new(Vec::new()),
        }))
    }

    #[tokio::test]
    async fn test_fetch_or_create_returns_empty_cart() {
        let fx = fixture();
        let cart = fx.workflow.open_cart(&fx.user).await.unwrap();
        assert!(cart.is_empty());
        assert!(!cart.purchased);
        assert!(cart.subtotal.is_zero());
    }

    #[tokio::test]
    async fn test_fetch_or_create_is_stable() {
        let fx = fixture();
        let first = fx.workflow.open_cart(&fx.user).await.unwrap();
        let second = fx.workflow.open_cart(&fx.user).await.unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_find_open_reflects_lifecycle() {
        let fx = fixture();
        assert!(fx.carts.find_open(&fx.user).await.unwrap().is_none());

        let opened = fx.workflow.open_cart(&fx.user).await.unwrap();
        let found = fx.carts.find_open(&fx.user).await.unwrap().unwrap();
        assert_eq!(found.id, opened.id);

        fx.workflow.purchase(&fx.user, "sara").await.unwrap();
        assert!(fx.carts.find_open(&fx.user).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_item_snapshots_price() {
        let fx = fixture();
        let cart = fx.workflow.add_item(&fx.user, PANADOL, 2).await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].price.amount_cents, 1000);
        assert_eq!(cart.items[0].total.amount_cents, 2000);
        assert_eq!(cart.subtotal.amount_cents, 2000);
        assert_eq!(cart.items[0].drug_name, "Panadol");
        assert_eq!(cart.items[0].image, "Panadol.jpg");
    }

    #[tokio::test]
    async fn test_add_item_seeds_cart_when_none_open() {
        let fx = fixture();
        // no prior open_cart call
        let cart = fx.workflow.add_item(&fx.user, BRUFEN, 1).await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.subtotal.amount_cents, 2500);
    }

    #[tokio::test]
    async fn test_add_unknown_drug_is_not_found() {
        let fx = fixture();
        fx.workflow.open_cart(&fx.user).await.unwrap();

        let missing = "aaaaaaaaaaaaaaaaaaaaaaaa";
        let err = fx.workflow.add_item(&fx.user, missing, 1).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let cart = fx.workflow.open_cart(&fx.user).await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_add_item_rejects_bad_quantity() {
        let fx = fixture();
        let err = fx.workflow.add_item(&fx.user, PANADOL, 0).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_id_rejected_before_store_access() {
        let fx = fixture();
        let err = fx
            .workflow
            .remove_item(&fx.user, "not-an-object-id")
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(!fx.carts.touched.load(Ordering::SeqCst));

        let err = fx
            .workflow
            .add_item(&fx.user, "not-an-object-id", 1)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(!fx.drugs.touched.load(Ordering::SeqCst));
        assert!(!fx.carts.touched.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_remove_item_not_in_cart() {
        let fx = fixture();
        fx.workflow.open_cart(&fx.user).await.unwrap();

        let err = fx.workflow.remove_item(&fx.user, PANADOL).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_remove_item_decreases_subtotal() {
        let fx = fixture();
        fx.workflow.add_item(&fx.user, PANADOL, 2).await.unwrap();
        fx.workflow.add_item(&fx.user, BRUFEN, 1).await.unwrap();

        fx.workflow.remove_item(&fx.user, PANADOL).await.unwrap();

        let cart = fx.workflow.open_cart(&fx.user).await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.subtotal.amount_cents, 2500);
        assert!(!cart.contains_drug(&DrugId::new(PANADOL)));
        assert!(cart.contains_drug(&DrugId::new(BRUFEN)));
    }

    #[tokio::test]
    async fn test_duplicate_drug_keeps_separate_lines() {
        let fx = fixture();
        fx.workflow.add_item(&fx.user, PANADOL, 1).await.unwrap();
        let cart = fx.workflow.add_item(&fx.user, PANADOL, 2).await.unwrap();
        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.subtotal.amount_cents, 3000);
    }

    #[tokio::test]
    async fn test_purchase_moves_cart_to_history() {
        let fx = fixture();
        fx.workflow.add_item(&fx.user, PANADOL, 2).await.unwrap();

        let purchased = fx.workflow.purchase(&fx.user, "sara").await.unwrap();
        assert!(purchased.purchased);
        assert_eq!(purchased.subtotal.amount_cents, 2000);

        let history = fx.workflow.history(&fx.user).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, purchased.id);

        // next access lazily creates a brand-new empty open cart
        let fresh = fx.workflow.open_cart(&fx.user).await.unwrap();
        assert_ne!(fresh.id, purchased.id);
        assert!(fresh.is_empty());
    }

    #[tokio::test]
    async fn test_purchase_without_cart_fails() {
        let fx = fixture();
        let err = fx.workflow.purchase(&fx.user, "sara").await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_purchase_of_empty_cart_is_permitted() {
        let fx = fixture();
        fx.workflow.open_cart(&fx.user).await.unwrap();
        let purchased = fx.workflow.purchase(&fx.user, "sara").await.unwrap();
        assert!(purchased.purchased);
        assert!(purchased.is_empty());
    }

    #[tokio::test]
    async fn test_push_outage_does_not_fail_purchase() {
        let fx = fixture_with_push(Arc::new(FailingPush));
        fx.workflow.add_item(&fx.user, PANADOL, 1).await.unwrap();

        let purchased = fx.workflow.purchase(&fx.user, "sara").await.unwrap();
        assert!(purchased.purchased);

        // the persisted state is purchased regardless of the notification
        let history = fx.workflow.history(&fx.user).await.unwrap();
        assert_eq!(history.len(), 1);
        assert!(history[0].purchased);
    }

    #[tokio::test]
    async fn test_purchase_notice_content() {
        let push = Arc::new(RecordingPush {
            sent: Mutex::new(Vec::new()),
        });
        let users: Arc<dyn UserRepository> = Arc::new(MemoryUsers {
            users: Mutex::new(vec![User {
                uid: UserId::new("admin-uid"),
                username: "pharmacist".to_string(),
                email: "admin@remedi.example".to_string(),
                role: UserRole::Admin,
                device_token: Some("admin-device".to_string()),
            }]),
        });

        send_purchase_notice(
            users,
            push.clone() as Arc<dyn PushSender>,
            "sara",
            Money::new(2000, Currency::EGP),
        )
        .await
        .unwrap();

        let sent = push.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "admin-device");
        assert_eq!(sent[0].1.title, "Order Purchased");
        assert!(sent[0].1.body.contains("sara"));
        assert!(sent[0].1.body.contains("LE 20.00"));
    }

    #[tokio::test]
    async fn test_purchase_notice_without_admin_is_ok() {
        let push = Arc::new(RecordingPush {
            sent: Mutex::new(Vec::new()),
        });
        let users: Arc<dyn UserRepository> = Arc::new(MemoryUsers {
            users: Mutex::new(Vec::new()),
        });

        send_purchase_notice(
            users,
            push.clone() as Arc<dyn PushSender>,
            "sara",
            Money::new(2000, Currency::EGP),
        )
        .await
        .unwrap();

        assert!(push.sent.lock().unwrap().is_empty());
    }
}
