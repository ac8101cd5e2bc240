//! Cart input types
//!
//! The raw order request a client submits. Field spellings follow the wire
//! body (`_id`, camelCase); everything is loosely typed on purpose - the
//! assembler validates each field at the boundary and works on resolved
//! catalog snapshots afterwards, never on these inputs directly.

use serde::{Deserialize, Serialize};

/// One selected option within a modifier selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionSelection {
    #[serde(rename = "_id")]
    pub option_id: String,
    pub quantity: i64,
}

/// Selected options for one of the item's modifiers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifierSelection {
    #[serde(rename = "_id")]
    pub modifier_id: String,
    #[serde(default)]
    pub options: Vec<OptionSelection>,
}

/// One cart line: a menu item reference with quantity and selections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(rename = "_id")]
    pub item_id: String,
    pub quantity: i64,
    #[serde(default)]
    pub modifiers: Vec<ModifierSelection>,
}

/// Inbound order request body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderInput {
    pub restaurant_id: String,
    pub items: Vec<CartLine>,
    pub tip: Option<f64>,
    pub message_to_kitchen: Option<String>,
}

impl CreateOrderInput {
    /// Convenience constructor for tests and internal callers
    pub fn new(restaurant_id: impl Into<String>, items: Vec<CartLine>) -> Self {
        Self {
            restaurant_id: restaurant_id.into(),
            items,
            tip: None,
            message_to_kitchen: None,
        }
    }
}
