//! Menu Model
//!
//! One menu document per restaurant, embedding its categories and items.
//! Items reference restaurant-scoped [`Modifier`](super::modifier::Modifier)s
//! by id; the catalog enforces that every reference resolves within the same
//! restaurant.

use serde::{Deserialize, Serialize};

use crate::types::Id;

/// Menu category (embedded in Menu)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub description: Option<String>,
    /// Display position within the menu
    pub index: i32,
}

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: Id,
    pub name: String,
    /// Price in currency unit, non-negative
    pub price: f64,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    /// Modifier references (restaurant-scoped)
    #[serde(default)]
    pub modifiers: Vec<Id>,
    /// Lifetime units sold
    #[serde(default)]
    pub sold: i64,
    pub vegan: Option<bool>,
    pub is_spicy: Option<bool>,
    pub spice_level: Option<i32>,
    /// Weekday availability filter (0 = Sunday); `None` = every day
    pub index_days_available: Option<Vec<u8>>,
}

/// Menu aggregate (one per restaurant)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Menu {
    pub restaurant_id: Id,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub items: Vec<MenuItem>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Menu {
    /// New empty menu for a restaurant
    pub fn new(restaurant_id: Id, now: i64) -> Self {
        Self {
            restaurant_id,
            categories: Vec::new(),
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Find an item by id
    pub fn item(&self, item_id: &Id) -> Option<&MenuItem> {
        self.items.iter().find(|item| &item.id == item_id)
    }

    pub fn item_mut(&mut self, item_id: &Id) -> Option<&mut MenuItem> {
        self.items.iter_mut().find(|item| &item.id == item_id)
    }
}

/// Create item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub vegan: Option<bool>,
    pub is_spicy: Option<bool>,
    pub spice_level: Option<i32>,
    pub index_days_available: Option<Vec<u8>>,
}

/// Update item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub vegan: Option<bool>,
    pub is_spicy: Option<bool>,
    pub spice_level: Option<i32>,
    pub index_days_available: Option<Vec<u8>>,
}
