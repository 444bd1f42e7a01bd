//! Cart and line item types.
//!
//! A user has at most one cart with `purchased = false` (the open cart).
//! Once purchased, a cart is immutable and becomes part of the user's
//! history; the next access lazily creates a fresh open cart.

use crate::catalog::Drug;
use crate::error::CommerceError;
use crate::ids::{CartId, DrugId, UserId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A line in the cart.
///
/// Name, image, and unit price are denormalized snapshots captured when the
/// item is added; later catalog price changes never retroactively affect a
/// cart that already contains the line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// The catalog drug this line refers to.
    #[serde(rename = "drugId")]
    pub drug_id: DrugId,
    /// Quantity, always positive.
    pub quantity: i64,
    /// Drug name at add-time.
    pub drug_name: String,
    /// Image of the drug's first form at add-time.
    pub image: String,
    /// Unit price at add-time.
    pub price: Money,
    /// Line total: unit price times quantity.
    pub total: Money,
}

impl CartItem {
    /// Snapshot a catalog drug into a cart line.
    ///
    /// Returns an error if the quantity is not positive or the line total
    /// overflows.
    pub fn snapshot(drug: &Drug, quantity: i64) -> Result<Self, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        let total = drug
            .price
            .try_multiply(quantity)
            .ok_or(CommerceError::Overflow)?;
        Ok(Self {
            drug_id: drug.id.clone(),
            quantity,
            drug_name: drug.drug_name.clone(),
            image: drug.primary_image().to_string(),
            price: drug.price,
            total,
        })
    }
}

/// A shopping cart, open or purchased.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Unique cart identifier (ObjectId hex).
    #[serde(rename = "_id")]
    pub id: CartId,
    /// Owning user.
    pub user_uid: UserId,
    /// Purchase flag; true makes the cart an immutable order record.
    pub purchased: bool,
    /// Lines in insertion order. The same drug may appear on several lines.
    pub items: Vec<CartItem>,
    /// Sum of line totals.
    pub subtotal: Money,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Cart {
    /// Create an empty open cart for a user.
    pub fn empty(id: CartId, user_uid: UserId) -> Self {
        let now = current_timestamp();
        Self {
            id,
            user_uid,
            purchased: false,
            items: Vec::new(),
            subtotal: Money::zero(Currency::EGP),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a line and bump the subtotal.
    ///
    /// Lines for the same drug are kept separate; there is no merge.
    pub fn push_item(&mut self, item: CartItem) -> Result<(), CommerceError> {
        self.subtotal = self
            .subtotal
            .try_add(&item.total)
            .ok_or(CommerceError::Overflow)?;
        self.items.push(item);
        self.updated_at = current_timestamp();
        Ok(())
    }

    /// Remove every line matching the drug and recompute the subtotal.
    ///
    /// Returns false when the drug is not in the cart.
    pub fn remove_drug(&mut self, drug_id: &DrugId) -> Result<bool, CommerceError> {
        let len_before = self.items.len();
        self.items.retain(|i| &i.drug_id != drug_id);
        if self.items.len() == len_before {
            return Ok(false);
        }
        self.recompute_subtotal()?;
        self.updated_at = current_timestamp();
        Ok(true)
    }

    /// Recompute the subtotal from the current lines.
    pub fn recompute_subtotal(&mut self) -> Result<(), CommerceError> {
        self.subtotal = Money::try_sum(self.items.iter().map(|i| &i.total), self.subtotal.currency)
            .ok_or(CommerceError::Overflow)?;
        Ok(())
    }

    /// Check whether a drug is in the cart.
    pub fn contains_drug(&self, drug_id: &DrugId) -> bool {
        self.items.iter().any(|i| &i.drug_id == drug_id)
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Mark the cart purchased, closing it to further mutation.
    pub fn finalize(&mut self) {
        self.purchased = true;
        self.updated_at = current_timestamp();
    }
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DrugForm, DrugStatus, NewDrug};

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

    fn empty_cart() -> Cart {
        Cart::empty(
            CartId::new("6418a6c7e9d2b1f3a4c5d6e7"),
            UserId::new("uid-1"),
        )
    }

    #[test]
    fn test_new_cart_is_empty() {
        let cart = empty_cart();
        assert!(cart.is_empty());
        assert!(!cart.purchased);
        assert!(cart.subtotal.is_zero());
    }

    #[test]
    fn test_snapshot_line_total() {
        // price 10.00, quantity 2 -> line total 20.00
        let d = drug("6418a6c7e9d2b1f3a4c5d6e7", "Panadol", 1000);
        let item = CartItem::snapshot(&d, 2).unwrap();
        assert_eq!(item.total.amount_cents, 2000);
        assert_eq!(item.price.amount_cents, 1000);
        assert_eq!(item.drug_name, "Panadol");
        assert_eq!(item.image, "Panadol.jpg");
    }

    #[test]
    fn test_snapshot_rejects_non_positive_quantity() {
        let d = drug("6418a6c7e9d2b1f3a4c5d6e7", "Panadol", 1000);
        assert!(matches!(
            CartItem::snapshot(&d, 0),
            Err(CommerceError::InvalidQuantity(0))
        ));
        assert!(CartItem::snapshot(&d, -3).is_err());
    }

    #[test]
    fn test_push_item_bumps_subtotal() {
        let d = drug("6418a6c7e9d2b1f3a4c5d6e7", "Panadol", 1000);
        let mut cart = empty_cart();
        cart.push_item(CartItem::snapshot(&d, 2).unwrap()).unwrap();
        assert_eq!(cart.subtotal.amount_cents, 2000);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_same_drug_keeps_separate_lines() {
        let d = drug("6418a6c7e9d2b1f3a4c5d6e7", "Panadol", 1000);
        let mut cart = empty_cart();
        cart.push_item(CartItem::snapshot(&d, 1).unwrap()).unwrap();
        cart.push_item(CartItem::snapshot(&d, 2).unwrap()).unwrap();
        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.subtotal.amount_cents, 3000);
    }

    #[test]
    fn test_price_snapshot_survives_catalog_change() {
        let mut d = drug("6418a6c7e9d2b1f3a4c5d6e7", "Panadol", 1000);
        let mut cart = empty_cart();
        cart.push_item(CartItem::snapshot(&d, 1).unwrap()).unwrap();

        d.price = Money::new(9999, Currency::EGP);
        assert_eq!(cart.items[0].price.amount_cents, 1000);
        assert_eq!(cart.subtotal.amount_cents, 1000);
    }

    #[test]
    fn test_remove_drug_recomputes_subtotal() {
        let a = drug("6418a6c7e9d2b1f3a4c5d6e7", "Panadol", 1000);
        let b = drug("70f1b2c3d4e5f6a7b8c9d0e1", "Brufen", 2500);
        let mut cart = empty_cart();
        cart.push_item(CartItem::snapshot(&a, 2).unwrap()).unwrap();
        cart.push_item(CartItem::snapshot(&b, 1).unwrap()).unwrap();

        assert!(cart.remove_drug(&a.id).unwrap());
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.subtotal.amount_cents, 2500);
    }

    #[test]
    fn test_remove_drug_removes_all_matching_lines() {
        let d = drug("6418a6c7e9d2b1f3a4c5d6e7", "Panadol", 1000);
        let mut cart = empty_cart();
        cart.push_item(CartItem::snapshot(&d, 1).unwrap()).unwrap();
        cart.push_item(CartItem::snapshot(&d, 3).unwrap()).unwrap();

        assert!(cart.remove_drug(&d.id).unwrap());
        assert!(cart.is_empty());
        assert!(cart.subtotal.is_zero());
    }

    #[test]
    fn test_remove_missing_drug() {
        let mut cart = empty_cart();
        let absent = DrugId::new("70f1b2c3d4e5f6a7b8c9d0e1");
        assert!(!cart.remove_drug(&absent).unwrap());
    }

    #[test]
    fn test_finalize() {
        let mut cart = empty_cart();
        cart.finalize();
        assert!(cart.purchased);
    }

    #[test]
    fn test_document_field_names() {
        let d = drug("6418a6c7e9d2b1f3a4c5d6e7", "Panadol", 1000);
        let mut cart = empty_cart();
        cart.push_item(CartItem::snapshot(&d, 2).unwrap()).unwrap();

        let value = serde_json::to_value(&cart).unwrap();
        assert!(value.get("_id").is_some());
        assert!(value.get("user_uid").is_some());
        assert!(value.get("purchased").is_some());
        assert!(value.get("subtotal").is_some());
        let item = &value["items"][0];
        assert!(item.get("drugId").is_some());
        assert!(item.get("drug_name").is_some());
        assert!(item.get("image").is_some());
    }
}
