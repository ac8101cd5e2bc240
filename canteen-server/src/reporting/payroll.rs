//! Payroll aggregation
//!
//! Groups a tenant's orders by employee over a date range so the company
//! console can bill meal deductions. Orders still pending, or that never
//! happened (cancelled/rejected), are excluded. Spreadsheet export is a
//! front-end concern and stays out of this crate.

use std::collections::HashMap;

use serde::Serialize;
use shared::models::OrderStatus;
use shared::{AppResult, Id};

use crate::orders::pricing::{to_decimal, to_f64};
use crate::orders::OrderStore;
use crate::utils::validation::{validate_required_text, MAX_NAME_LEN};

/// One order line within a payroll entry
#[derive(Debug, Clone, Serialize)]
pub struct PayrollOrder {
    pub order_id: Id,
    pub total_price: f64,
    /// Employee-payable amount, the value billed through payroll
    pub discounted_price: f64,
    pub created_at: i64,
}

/// Per-employee payroll summary
#[derive(Debug, Clone, Default, Serialize)]
pub struct PayrollEntry {
    /// Sum of the employee-payable amounts
    pub total_value: f64,
    pub order_count: u32,
    pub orders: Vec<PayrollOrder>,
}

/// Payroll details grouped by user id for a tenant and date range
///
/// The range is half-open `[start_millis, end_millis)`.
pub async fn payroll_by_date(
    orders: &OrderStore,
    tenant_id: &str,
    start_millis: i64,
    end_millis: i64,
) -> AppResult<HashMap<String, PayrollEntry>> {
    validate_required_text(tenant_id, "tenantId", MAX_NAME_LEN)?;

    let range = orders
        .find_by_tenant_between(tenant_id, start_millis, end_millis)
        .await?;

    let mut payroll: HashMap<String, PayrollEntry> = HashMap::new();
    for order in range {
        if matches!(
            order.status,
            OrderStatus::Cancelled | OrderStatus::Rejected | OrderStatus::Pending
        ) {
            continue;
        }

        let entry = payroll.entry(order.user_id.to_string()).or_default();
        entry.total_value = to_f64(to_decimal(entry.total_value) + to_decimal(order.discounted_price));
        entry.order_count += 1;
        entry.orders.push(PayrollOrder {
            order_id: order.id,
            total_price: order.total_price,
            discounted_price: order.discounted_price,
            created_at: order.created_at,
        });
    }

    Ok(payroll)
}
