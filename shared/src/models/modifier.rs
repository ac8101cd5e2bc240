//! Modifier Model
//!
//! A modifier is a named group of selectable options attached to a menu item
//! ("Size", "Toppings"). Options carry their own price and quantity rules.

use serde::{Deserialize, Serialize};

use crate::types::Id;

/// Modifier option (embedded in Modifier)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifierOption {
    pub id: Id,
    pub name: String,
    /// Price in currency unit, non-negative
    pub price: f64,
    /// Whether a selected quantity above 1 is allowed
    #[serde(default)]
    pub multiple: bool,
    /// Per-option ceiling on the selected quantity
    pub max: Option<u32>,
    /// Weekday availability filter (0 = Sunday); `None` = every day
    pub index_days_available: Option<Vec<u8>>,
    pub is_spicy: Option<bool>,
    pub spice_level: Option<i32>,
    pub vegan: Option<bool>,
}

/// Modifier entity (restaurant-scoped)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Modifier {
    pub id: Id,
    pub restaurant_id: Id,
    pub name: String,
    /// At least one option must be selected when the owning item is ordered
    pub required: bool,
    /// Whether more than one option may be selected
    pub multiple: bool,
    /// Ceiling on the summed quantities of all selected options
    pub max: Option<u32>,
    /// Embedded options, in display order
    #[serde(default)]
    pub options: Vec<ModifierOption>,
    pub index_days_available: Option<Vec<u8>>,
}

impl Modifier {
    /// Find an option by id
    pub fn option(&self, option_id: &Id) -> Option<&ModifierOption> {
        self.options.iter().find(|opt| &opt.id == option_id)
    }
}

/// Create modifier payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifierCreate {
    pub name: String,
    pub required: Option<bool>,
    pub multiple: Option<bool>,
    pub max: Option<u32>,
    pub options: Option<Vec<ModifierOption>>,
    pub index_days_available: Option<Vec<u8>>,
}

/// Update modifier payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModifierUpdate {
    pub name: Option<String>,
    pub required: Option<bool>,
    pub multiple: Option<bool>,
    pub max: Option<u32>,
    pub options: Option<Vec<ModifierOption>>,
    pub index_days_available: Option<Vec<u8>>,
}
