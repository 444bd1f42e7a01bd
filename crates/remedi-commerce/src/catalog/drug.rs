//! Drug record types.

use crate::ids::DrugId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Availability status of a drug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DrugStatus {
    /// In stock and purchasable.
    Available,
    /// Temporarily out of stock.
    OutOfStock,
    /// No longer produced. Records default here until stock is confirmed.
    #[default]
    Discontinued,
}

impl DrugStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrugStatus::Available => "available",
            DrugStatus::OutOfStock => "out_of_stock",
            DrugStatus::Discontinued => "discontinued",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "available" => Some(DrugStatus::Available),
            "out_of_stock" => Some(DrugStatus::OutOfStock),
            "discontinued" => Some(DrugStatus::Discontinued),
            _ => None,
        }
    }
}

/// A dosage form a drug is sold in (e.g., tablet, syrup), with its image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrugForm {
    /// Form type, e.g. "tablet".
    pub form: String,
    /// Image reference shown in listings and cart lines.
    pub image: String,
}

/// A drug in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Drug {
    /// Unique drug identifier (ObjectId hex).
    #[serde(rename = "_id")]
    pub id: DrugId,
    /// Trade name. Unique across the catalog.
    pub drug_name: String,
    /// Dosage forms this drug is sold in.
    pub forms: Vec<DrugForm>,
    /// Strength, e.g. "500 mg".
    pub strength: String,
    /// Active ingredients.
    pub active_ingredients: Vec<String>,
    /// Availability status.
    #[serde(default)]
    pub status: DrugStatus,
    /// Unit price.
    #[serde(default = "default_price")]
    pub price: Money,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Drug {
    /// Create a new drug record from its input shape.
    ///
    /// The id is assigned by the persistence layer.
    pub fn from_input(id: DrugId, input: NewDrug) -> Self {
        let now = current_timestamp();
        Self {
            id,
            drug_name: input.drug_name,
            forms: input.forms,
            strength: input.strength,
            active_ingredients: input.active_ingredients,
            status: input.status.unwrap_or_default(),
            price: input.price.unwrap_or_else(default_price),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the drug can currently be purchased.
    pub fn is_available(&self) -> bool {
        self.status == DrugStatus::Available
    }

    /// Image of the first listed form, used for cart line snapshots.
    pub fn primary_image(&self) -> &str {
        self.forms.first().map(|f| f.image.as_str()).unwrap_or("")
    }
}

/// Default unit price: 1 EGP.
fn default_price() -> Money {
    Money::new(100, Currency::EGP)
}

/// Input shape for creating a drug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDrug {
    pub drug_name: String,
    pub forms: Vec<DrugForm>,
    pub strength: String,
    pub active_ingredients: Vec<String>,
    #[serde(default)]
    pub status: Option<DrugStatus>,
    #[serde(default)]
    pub price: Option<Money>,
}

/// Partial update for a drug. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrugUpdate {
    #[serde(default)]
    pub drug_name: Option<String>,
    #[serde(default)]
    pub forms: Option<Vec<DrugForm>>,
    #[serde(default)]
    pub strength: Option<String>,
    #[serde(default)]
    pub active_ingredients: Option<Vec<String>>,
    #[serde(default)]
    pub status: Option<DrugStatus>,
    #[serde(default)]
    pub price: Option<Money>,
}

impl DrugUpdate {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.drug_name.is_none()
            && self.forms.is_none()
            && self.strength.is_none()
            && self.active_ingredients.is_none()
            && self.status.is_none()
            && self.price.is_none()
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
