//! Grocery items and their validation rules

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Store group holding every grocery item
pub const GROUP: &str = "grocery-list";

/// Prefix shared by every item key inside [`GROUP`]
pub const KEY_PREFIX: &str = "grocery-list:item:";

/// Store key for an item name
pub fn item_key(name: &str) -> String {
    format!("{}{}", KEY_PREFIX, name)
}

/// A single entry on the grocery list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroceryItem {
    /// Unique item name, also the store key suffix
    pub name: String,
    /// How many to buy, always positive
    pub quantity: u64,
    /// Whether the item has been picked up; absent means not completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
}

impl GroceryItem {
    /// Build a validated item.
    pub fn new(
        name: impl Into<String>,
        quantity: i64,
        status: Option<bool>,
    ) -> Result<Self, ValidationError> {
        let name = validate_name("name", name.into())?;
        let quantity = validate_quantity(quantity)?;
        Ok(Self {
            name,
            quantity,
            status,
        })
    }

    /// Whether the item is marked as completed
    pub fn is_completed(&self) -> bool {
        self.status.unwrap_or(false)
    }

    /// Human-readable status word
    pub fn status_label(&self) -> &'static str {
        if self.is_completed() {
            "completed"
        } else {
            "not completed"
        }
    }

    /// Store key for this item
    pub fn key(&self) -> String {
        item_key(&self.name)
    }
}

/// Reject empty names. `field` names the request field being checked.
pub fn validate_name(field: &str, name: String) -> Result<String, ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::new(field, "Item name is required"));
    }
    Ok(name)
}

/// Reject zero and negative quantities
pub fn validate_quantity(quantity: i64) -> Result<u64, ValidationError> {
    if quantity <= 0 {
        return Err(ValidationError::new(
            "quantity",
            "Quantity must be a positive integer",
        ));
    }
    Ok(quantity as u64)
}

/// Validate a raw JSON number as a quantity.
///
/// Integral floats such as `2.0` or `1e2` count as integers. Fractional
/// values and integers outside the `i64` range are rejected along with
/// non-positive ones.
pub fn quantity_from_json(value: &serde_json::Number) -> Result<i64, ValidationError> {
    let quantity = value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .filter(|f| *f >= 1.0 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    });

    match quantity {
        Some(q) => validate_quantity(q).map(|_| q),
        None => Err(ValidationError::new(
            "quantity",
            "Quantity must be a positive integer",
        )),
    }
}
