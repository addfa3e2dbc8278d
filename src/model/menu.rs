use crate::error::CafeError;
use crate::model::MenuItemId;
use serde::{Deserialize, Serialize};

/// Category used when a menu item is created without one.
pub const DEFAULT_CATEGORY: &str = "Other";

/// Something a customer can order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub price: f64,
    pub category: String,
}

impl MenuItem {
    pub fn new(
        id: MenuItemId,
        name: impl Into<String>,
        price: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            category: category.into(),
        }
    }
}

/// Payload for creating a menu item, as typed into the staff form.
///
/// `price` stays text until [`MenuItemCreate::validate`] so that malformed input
/// is rejected instead of turning into `NaN`.
#[derive(Debug, Clone, Default)]
pub struct MenuItemCreate {
    pub name: String,
    pub price: String,
    pub category: String,
}

impl MenuItemCreate {
    pub fn new(
        name: impl Into<String>,
        price: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            category: category.into(),
        }
    }

    /// Check the payload and build the item under `id`.
    ///
    /// # Errors
    /// `InvalidArgument` when the name or price is blank, or the price is not a
    /// finite, non-negative number.
    pub fn validate(self, id: MenuItemId) -> Result<MenuItem, CafeError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CafeError::InvalidArgument("menu item name is required".into()));
        }

        let price_text = self.price.trim();
        if price_text.is_empty() {
            return Err(CafeError::InvalidArgument("menu item price is required".into()));
        }
        let price: f64 = price_text.parse().map_err(|_| {
            CafeError::InvalidArgument(format!("price '{price_text}' is not a number"))
        })?;
        if !price.is_finite() || price < 0.0 {
            return Err(CafeError::InvalidArgument(format!(
                "price '{price_text}' must be a non-negative amount"
            )));
        }

        let category = match self.category.trim() {
            "" => DEFAULT_CATEGORY,
            category => category,
        };

        Ok(MenuItem::new(id, name, price, category))
    }
}

/// The menu a fresh store is seeded with.
pub fn default_menu() -> Vec<MenuItemCreate> {
    vec![
        MenuItemCreate::new("Coffee", "2.00", "Drinks"),
        MenuItemCreate::new("Sandwich", "5.00", "Food"),
        MenuItemCreate::new("Cake", "3.00", "Desserts"),
    ]
}
