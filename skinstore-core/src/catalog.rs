//! Skin catalog shown in the storefront carousel
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

const BUILTIN_CATALOG: &str = include_str!("../data/skins.json");

/// A single purchasable skin.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogItem {
    pub id: u32,
    pub name: String,
    /// Price in SOL, kept as a decimal so it never passes through a float
    pub unit_price: Decimal,
    pub image_ref: String,
}

/// Fixed, ordered list of skins. Order is the carousel traversal order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("JSON parsing error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog is empty")]
    Empty,
    #[error("duplicate catalog id {0}")]
    DuplicateId(u32),
    #[error("item {id} has a negative price")]
    NegativePrice { id: u32 },
}

impl Catalog {
    /// Build a catalog from already-parsed items.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty, ids repeat, or a price is negative.
    pub fn new(items: Vec<CatalogItem>) -> Result<Self, CatalogError> {
        if items.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id) {
                return Err(CatalogError::DuplicateId(item.id));
            }
            if item.unit_price.is_sign_negative() && !item.unit_price.is_zero() {
                return Err(CatalogError::NegativePrice { id: item.id });
            }
        }
        Ok(Self { items })
    }

    /// Load a catalog from a JSON document of the form `{ "items": [...] }`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: Self = serde_json::from_str(json)?;
        Self::new(raw.items)
    }

    /// The eight skins bundled with the storefront.
    ///
    /// # Errors
    ///
    /// Returns an error only if the embedded catalog is malformed.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    #[must_use]
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find an item by id.
    #[must_use]
    pub fn find(&self, id: u32) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Item at a carousel position.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CatalogItem> {
        self.items.get(index)
    }
}
