//! Company stats
//!
//! Month and week revenue totals with percentage change against the
//! previous period, for the company console dashboard. Weeks start Monday
//! in the business timezone. Cancelled and rejected orders never count.

use chrono_tz::Tz;
use serde::Serialize;
use shared::models::OrderStatus;
use shared::{AppError, AppResult};

use crate::orders::pricing::{to_decimal, to_f64};
use crate::orders::OrderStore;
use crate::policy::CompanyDirectory;
use crate::utils::time::{month_bounds, prev_month_bounds, prev_week_bounds, week_bounds};

/// Company console dashboard figures
#[derive(Debug, Clone, Serialize)]
pub struct CompanyStats {
    pub this_month_total: f64,
    pub month_change_percentage: f64,
    pub this_week_total: f64,
    pub week_change_percentage: f64,
}

/// Month/week revenue for a tenant at `now_millis`
pub async fn company_stats(
    companies: &CompanyDirectory,
    orders: &OrderStore,
    tenant_id: &str,
    now_millis: i64,
    tz: Tz,
) -> AppResult<CompanyStats> {
    companies.find_by_tenant(tenant_id).await?.ok_or_else(|| {
        AppError::not_found(format!("Company with tenantId {tenant_id} not found"))
    })?;

    let (month_start, _) = month_bounds(now_millis, tz);
    let (prev_month_start, prev_month_end) = prev_month_bounds(now_millis, tz);
    let (week_start, _) = week_bounds(now_millis, tz);
    let (prev_week_start, prev_week_end) = prev_week_bounds(now_millis, tz);

    let this_month_total =
        revenue_for_period(orders, tenant_id, month_start, now_millis + 1).await?;
    let last_month_total =
        revenue_for_period(orders, tenant_id, prev_month_start, prev_month_end).await?;
    let this_week_total = revenue_for_period(orders, tenant_id, week_start, now_millis + 1).await?;
    let last_week_total =
        revenue_for_period(orders, tenant_id, prev_week_start, prev_week_end).await?;

    Ok(CompanyStats {
        this_month_total,
        month_change_percentage: calc_percentage_change(this_month_total, last_month_total),
        this_week_total,
        week_change_percentage: calc_percentage_change(this_week_total, last_week_total),
    })
}

/// Summed order revenue for a tenant within `[from, to)` millis
async fn revenue_for_period(
    orders: &OrderStore,
    tenant_id: &str,
    from: i64,
    to: i64,
) -> AppResult<f64> {
    let range = orders.find_by_tenant_between(tenant_id, from, to).await?;
    let total = range
        .iter()
        .filter(|order| {
            !matches!(order.status, OrderStatus::Cancelled | OrderStatus::Rejected)
        })
        .map(|order| to_decimal(order.total_price))
        .sum();
    Ok(to_f64(total))
}

/// Percentage change between two period totals
///
/// A previous total of 0 counts as a 100% increase for any positive current
/// total, and 0% when both are 0.
fn calc_percentage_change(this_value: f64, last_value: f64) -> f64 {
    if last_value == 0.0 {
        if this_value == 0.0 { 0.0 } else { 100.0 }
    } else {
        (this_value - last_value) / last_value * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Storage;
    use chrono::NaiveDateTime;
    use shared::models::{Company, Order, OrderPolicy};
    use shared::Id;

    const TZ: Tz = chrono_tz::Asia::Jerusalem;

    fn millis_of(s: &str) -> i64 {
        let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
        naive
            .and_local_timezone(TZ)
            .latest()
            .unwrap()
            .timestamp_millis()
    }

    fn order_at(tenant: &str, total: f64, created_at: i64, status: OrderStatus) -> Order {
        Order {
            id: Id::generate(),
            user_id: Id::parse("user-1", "userId").unwrap(),
            tenant_id: tenant.to_string(),
            restaurant_id: Id::parse("rest-1", "restaurantId").unwrap(),
            items: vec![],
            status,
            total_price: total,
            discounted_price: total,
            tip: None,
            message_to_kitchen: None,
            status_updates: vec![],
            created_at,
            updated_at: created_at,
        }
    }

    async fn seed_company(storage: &Storage) -> CompanyDirectory {
        let companies = CompanyDirectory::new(storage.clone());
        companies
            .upsert(Company {
                tenant_id: "acme".to_string(),
                name: "Acme Ltd".to_string(),
                address: None,
                contact_email: None,
                contact_phone: None,
                restaurants: vec![],
                members: vec![],
                policy: OrderPolicy::default(),
            })
            .await
            .unwrap();
        companies
    }

    #[tokio::test]
    async fn test_month_and_week_totals() {
        let storage = Storage::open_in_memory().unwrap();
        let companies = seed_company(&storage).await;
        let orders = OrderStore::new(storage.clone());

        // now: Wednesday 2024-03-13 noon
        let now = millis_of("2024-03-13 12:00:00");

        // This week (and month)
        storage
            .insert_order(&order_at(
                "acme",
                100.0,
                millis_of("2024-03-12 10:00:00"),
                OrderStatus::Delivered,
            ))
            .unwrap();
        // Earlier this month, previous week
        storage
            .insert_order(&order_at(
                "acme",
                50.0,
                millis_of("2024-03-05 10:00:00"),
                OrderStatus::Delivered,
            ))
            .unwrap();
        // Previous month
        storage
            .insert_order(&order_at(
                "acme",
                75.0,
                millis_of("2024-02-10 10:00:00"),
                OrderStatus::Delivered,
            ))
            .unwrap();
        // Cancelled never counts
        storage
            .insert_order(&order_at(
                "acme",
                999.0,
                millis_of("2024-03-12 11:00:00"),
                OrderStatus::Cancelled,
            ))
            .unwrap();

        let stats = company_stats(&companies, &orders, "acme", now, TZ)
            .await
            .unwrap();

        assert_eq!(stats.this_month_total, 150.0);
        assert_eq!(stats.month_change_percentage, 100.0);
        assert_eq!(stats.this_week_total, 100.0);
        assert_eq!(stats.week_change_percentage, 100.0);
    }

    #[tokio::test]
    async fn test_zero_previous_period_counts_as_full_growth() {
        assert_eq!(calc_percentage_change(0.0, 0.0), 0.0);
        assert_eq!(calc_percentage_change(10.0, 0.0), 100.0);
        assert_eq!(calc_percentage_change(50.0, 100.0), -50.0);
    }

    #[tokio::test]
    async fn test_unknown_tenant_fails() {
        let storage = Storage::open_in_memory().unwrap();
        let companies = CompanyDirectory::new(storage.clone());
        let orders = OrderStore::new(storage);

        let err = company_stats(&companies, &orders, "ghost", 0, TZ)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), shared::ErrorKind::NotFound);
    }
}
