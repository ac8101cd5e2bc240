//! Company (Tenant) Model

use serde::{Deserialize, Serialize};

use crate::types::Id;

/// Per-tenant order constraints
///
/// All limits are optional; an absent limit is unlimited. The contribution
/// percentage is the share of an order's value the company covers on behalf
/// of the employee (0-100).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderPolicy {
    pub max_orders_per_day: Option<u32>,
    pub max_orders_per_month: Option<u32>,
    /// Ceiling on the number of distinct order lines
    pub max_per_order: Option<u32>,
    /// Ceiling on a single order's total value, boundary inclusive
    pub max_order_shekels: Option<f64>,
    pub company_contribution_percentage: Option<f64>,
}

/// Company entity
///
/// Tenants are keyed by `tenant_id`, a plain string identifier carried on
/// every order they own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub tenant_id: String,
    pub name: String,
    pub address: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    /// Restaurants this company orders from
    #[serde(default)]
    pub restaurants: Vec<Id>,
    /// Employee account references
    #[serde(default)]
    pub members: Vec<Id>,
    #[serde(default)]
    pub policy: OrderPolicy,
}
