//! Catalog query builder.

use crate::catalog::Drug;
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

/// Default page size for catalog listings.
pub const DEFAULT_PER_PAGE: i64 = 20;

/// Upper bound on page size.
pub const MAX_PER_PAGE: i64 = 100;

/// A paginated, filtered catalog query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrugQuery {
    /// Case-insensitive name substring.
    pub name: Option<String>,
    /// Dosage form filter (matches any of the drug's forms).
    pub form: Option<String>,
    /// Active ingredient filter.
    pub active_ingredient: Option<String>,
    /// Current page (1-indexed).
    pub page: i64,
    /// Items per page.
    pub per_page: i64,
}

impl Default for DrugQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl DrugQuery {
    /// Create an unfiltered first-page query.
    pub fn new() -> Self {
        Self {
            name: None,
            form: None,
            active_ingredient: None,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Filter by name substring, case-insensitive.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.name = Some(name);
        }
        self
    }

    /// Filter by dosage form.
    pub fn with_form(mut self, form: impl Into<String>) -> Self {
        self.form = Some(form.into());
        self
    }

    /// Filter by active ingredient.
    pub fn with_active_ingredient(mut self, ingredient: impl Into<String>) -> Self {
        self.active_ingredient = Some(ingredient.into());
        self
    }

    /// Set pagination, clamping to sane bounds.
    pub fn with_pagination(mut self, page: i64, per_page: i64) -> Self {
        self.page = page.max(1);
        self.per_page = per_page.clamp(1, MAX_PER_PAGE);
        self
    }

    /// Number of documents to skip.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    /// Compile the filters into a store filter document.
    pub fn to_filter(&self) -> Document {
        let mut filter = doc! {};
        if let Some(form) = &self.form {
            filter.insert("forms.form", form.clone());
        }
        if let Some(ingredient) = &self.active_ingredient {
            filter.insert("active_ingredients", ingredient.clone());
        }
        if let Some(name) = &self.name {
            filter.insert("drug_name", doc! { "$regex": name.clone(), "$options": "i" });
        }
        filter
    }
}

/// One page of catalog results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrugPage {
    /// Drugs on this page.
    pub data: Vec<Drug>,
    /// Total matching drugs across all pages.
    pub total: i64,
    /// The page that was returned (1-indexed).
    pub page: i64,
    /// Total number of pages.
    pub pages: i64,
}

impl DrugPage {
    /// Assemble a page, deriving the page count from the total.
    pub fn new(data: Vec<Drug>, total: i64, query: &DrugQuery) -> Self {
        let pages = if total == 0 {
            0
        } else {
            (total + query.per_page - 1) / query.per_page
        };
        Self {
            data,
            total,
            page: query.page,
            pages,
        }
    }

    /// True when the requested page lies past the end of the listing.
    pub fn out_of_range(&self) -> bool {
        self.pages > 0 && self.page > self.pages
    }
}
