//! Tenant policy - company directory and order policy enforcement
//!
//! Companies own an [`OrderPolicy`] capping how their employees may order.
//! Enforcement is a pure function over pre-loaded counts so the whole check
//! can run before anything is persisted.

use shared::models::{Company, Order, OrderPolicy};
use shared::{AppError, AppResult};

use crate::db::Storage;
use crate::orders::pricing::to_decimal;
use crate::utils::validation::{validate_required_text, MAX_NAME_LEN};

/// Pre-loaded order counts for the policy windows
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderCounts {
    /// Orders the user created today (business-timezone calendar day)
    pub today: u64,
    /// Orders the user created this calendar month
    pub this_month: u64,
}

/// Company lookups keyed by tenant id
#[derive(Clone)]
pub struct CompanyDirectory {
    storage: Storage,
}

impl CompanyDirectory {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Point lookup by tenant id
    pub async fn find_by_tenant(&self, tenant_id: &str) -> AppResult<Option<Company>> {
        Ok(self.storage.get_company(tenant_id)?)
    }

    /// Store (insert or replace) a company record
    pub async fn upsert(&self, company: Company) -> AppResult<Company> {
        validate_required_text(&company.tenant_id, "tenantId", MAX_NAME_LEN)?;
        validate_required_text(&company.name, "company.name", MAX_NAME_LEN)?;
        if let Some(pct) = company.policy.company_contribution_percentage
            && !(0.0..=100.0).contains(&pct)
        {
            return Err(AppError::validation(format!(
                "companyContributionPercentage must be between 0 and 100, got {pct}"
            )));
        }

        self.storage.put_company(&company)?;
        Ok(company)
    }
}

/// Enforce a tenant's order policy against an assembled candidate order
///
/// Fails fast on the first violation; check order is deterministic:
/// daily count, monthly count, order value, line count. The counts come from
/// a count-then-insert read and are advisory: two concurrent submissions can
/// both pass before either is persisted.
pub fn check_policy(policy: &OrderPolicy, counts: &OrderCounts, candidate: &Order) -> AppResult<()> {
    if let Some(max) = policy.max_orders_per_day
        && counts.today >= max as u64
    {
        return Err(AppError::policy(format!(
            "Daily order limit reached (max {max} per day)"
        )));
    }

    if let Some(max) = policy.max_orders_per_month
        && counts.this_month >= max as u64
    {
        return Err(AppError::policy(format!(
            "Monthly order limit reached (max {max} per month)"
        )));
    }

    if let Some(cap) = policy.max_order_shekels
        && to_decimal(candidate.total_price) > to_decimal(cap)
    {
        return Err(AppError::policy(format!(
            "Order exceeds per-order value limit ({} > {cap})",
            candidate.total_price
        )));
    }

    if let Some(max) = policy.max_per_order
        && candidate.items.len() as u32 > max
    {
        return Err(AppError::policy(format!(
            "Order exceeds per-order item limit ({} lines, max {max})",
            candidate.items.len()
        )));
    }

    Ok(())
}
