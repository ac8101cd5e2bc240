//! Order Model
//!
//! The persisted order aggregate. Items are full snapshots of the menu state
//! at assembly time (name, price, selected modifiers and options), so later
//! catalog edits never change historical orders. Pricing is computed once at
//! creation; afterwards only the status and its history may change.

use serde::{Deserialize, Serialize};

use crate::types::Id;

/// Order status lifecycle
///
/// Forward progression `pending -> confirmed -> preparing -> ready ->
/// dispatched -> delivered`, with `rejected`/`cancelled` reachable from any
/// non-terminal state. `delivered`, `rejected` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Dispatched,
    Delivered,
    Rejected,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Dispatched => "dispatched",
            Self::Delivered => "delivered",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Rejected | Self::Cancelled)
    }

    /// Position in the forward progression; terminal failures have none
    fn rank(&self) -> Option<u8> {
        match self {
            Self::Pending => Some(0),
            Self::Confirmed => Some(1),
            Self::Preparing => Some(2),
            Self::Ready => Some(3),
            Self::Dispatched => Some(4),
            Self::Delivered => Some(5),
            Self::Rejected | Self::Cancelled => None,
        }
    }

    /// Whether moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if self.is_terminal() || *self == next {
            return false;
        }
        match next {
            Self::Rejected | Self::Cancelled => true,
            _ => match (self.rank(), next.rank()) {
                (Some(from), Some(to)) => to == from + 1,
                _ => false,
            },
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the append-only status history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// Position within the history, starting at 0
    pub index: u32,
    /// Millis since the previous update (or since creation for the first)
    pub time_since_previous: i64,
    pub old_status: OrderStatus,
    pub new_status: OrderStatus,
    /// Unix millis
    pub timestamp: i64,
}

/// Snapshotted option selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemOption {
    pub option_id: Id,
    pub name: String,
    /// Price per unit at assembly time
    pub price: f64,
    pub quantity: u32,
}

/// Snapshotted modifier selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemModifier {
    pub modifier_id: Id,
    pub name: String,
    pub required: bool,
    pub multiple: bool,
    pub max: Option<u32>,
    pub options: Vec<OrderItemOption>,
}

/// Snapshotted order line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub item_id: Id,
    pub name: String,
    /// Item price at assembly time
    pub price: f64,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub quantity: u32,
    pub modifiers: Vec<OrderItemModifier>,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Id,
    pub user_id: Id,
    pub tenant_id: String,
    pub restaurant_id: Id,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    /// Sum of line totals plus tip and service fee, fixed at creation
    pub total_price: f64,
    /// What the employee pays after the company contribution
    pub discounted_price: f64,
    pub tip: Option<f64>,
    pub message_to_kitchen: Option<String>,
    #[serde(default)]
    pub status_updates: Vec<StatusUpdate>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_progression_is_legal() {
        let chain = [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Dispatched,
            OrderStatus::Delivered,
        ];
        for pair in chain.windows(2) {
            assert!(
                pair[0].can_transition_to(pair[1]),
                "{} -> {} should be legal",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_skipping_ahead_is_illegal() {
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Preparing));
        assert!(!OrderStatus::Confirmed.can_transition_to(OrderStatus::Dispatched));
        assert!(!OrderStatus::Ready.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn test_moving_backwards_is_illegal() {
        assert!(!OrderStatus::Preparing.can_transition_to(OrderStatus::Confirmed));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn test_reject_and_cancel_from_any_non_terminal() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Dispatched,
        ] {
            assert!(status.can_transition_to(OrderStatus::Rejected));
            assert!(status.can_transition_to(OrderStatus::Cancelled));
        }
    }

    #[test]
    fn test_terminal_states_are_immutable() {
        for terminal in [
            OrderStatus::Delivered,
            OrderStatus::Rejected,
            OrderStatus::Cancelled,
        ] {
            assert!(terminal.is_terminal());
            for next in [
                OrderStatus::Pending,
                OrderStatus::Confirmed,
                OrderStatus::Cancelled,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Dispatched).unwrap();
        assert_eq!(json, "\"dispatched\"");
    }
}
