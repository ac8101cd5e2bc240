//! Order Store - persistence and queries over assembled orders
//!
//! Orders are inserted exactly once by the assembler; afterwards only
//! [`OrderStore::update_status`] touches them. Reporting and console
//! consumers read through the paginated finders.

use shared::models::{Order, OrderStatus, StatusUpdate};
use shared::{AppError, AppResult, Id};

use crate::db::Storage;
use crate::utils::time::now_millis;

/// Fixed page size for console pagination
pub const MAX_ORDERS_PER_REQUEST: usize = 40;

/// One page of orders plus pagination metadata
#[derive(Debug, Clone)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub total_count: u64,
    pub max_pages: u64,
}

impl OrderPage {
    fn new(orders: Vec<Order>, total_count: u64) -> Self {
        let max_pages = total_count.div_ceil(MAX_ORDERS_PER_REQUEST as u64);
        Self {
            orders,
            total_count,
            max_pages,
        }
    }
}

/// Persistence of assembled orders
#[derive(Clone)]
pub struct OrderStore {
    storage: Storage,
}

impl OrderStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    // ========== Writes ==========

    /// Persist a freshly assembled order, assigning id and timestamps
    pub async fn save(&self, mut order: Order) -> AppResult<Order> {
        let now = now_millis();
        order.id = Id::generate();
        order.created_at = now;
        order.updated_at = now;

        self.storage.insert_order(&order)?;
        Ok(order)
    }

    /// Move an order to a new status, appending to its history
    ///
    /// Illegal transitions (backwards, skipping ahead, or out of a terminal
    /// state) are rejected; pricing fields are never touched.
    pub async fn update_status(&self, order_id: &Id, new_status: OrderStatus) -> AppResult<Order> {
        let mut order = self.get(order_id).await?;

        if !order.status.can_transition_to(new_status) {
            return Err(AppError::validation(format!(
                "Cannot change order {order_id} status from {} to {new_status}",
                order.status
            )));
        }

        let now = now_millis();
        let previous_at = order
            .status_updates
            .last()
            .map(|update| update.timestamp)
            .unwrap_or(order.created_at);

        order.status_updates.push(StatusUpdate {
            index: order.status_updates.len() as u32,
            time_since_previous: now - previous_at,
            old_status: order.status,
            new_status,
            timestamp: now,
        });
        order.status = new_status;
        order.updated_at = now;

        self.storage.update_order(&order)?;
        Ok(order)
    }

    // ========== Point Reads ==========

    /// Get an order by id
    pub async fn get(&self, order_id: &Id) -> AppResult<Order> {
        self.storage
            .get_order(order_id.as_str())?
            .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))
    }

    /// Count a user's orders created within `[from, to)` millis
    ///
    /// Advisory only: the count-then-insert pattern has no transaction
    /// spanning the subsequent save, so two concurrent submissions can both
    /// observe a count below the limit.
    pub async fn count_user_orders_between(
        &self,
        user_id: &Id,
        from: i64,
        to: i64,
    ) -> AppResult<u64> {
        Ok(self.storage.count_orders_by_user_between(
            user_id.as_str(),
            from.max(0) as u64,
            to.max(0) as u64,
        )?)
    }

    // ========== Paginated Finders (newest first, page size 40) ==========

    /// A tenant's order history page; `page` starts at 1
    pub async fn find_by_tenant(&self, tenant_id: &str, page: u64) -> AppResult<OrderPage> {
        let total = self.storage.count_orders_by_tenant(tenant_id)?;
        let orders = self.storage.orders_by_tenant_desc(
            tenant_id,
            page_offset(page),
            MAX_ORDERS_PER_REQUEST,
        )?;
        Ok(OrderPage::new(orders, total))
    }

    /// A restaurant's order history page; `page` starts at 1
    pub async fn find_by_restaurant(&self, restaurant_id: &Id, page: u64) -> AppResult<OrderPage> {
        let total = self
            .storage
            .count_orders_by_restaurant(restaurant_id.as_str())?;
        let orders = self.storage.orders_by_restaurant_desc(
            restaurant_id.as_str(),
            page_offset(page),
            MAX_ORDERS_PER_REQUEST,
        )?;
        Ok(OrderPage::new(orders, total))
    }

    /// A user's order history page; `page` starts at 1
    pub async fn find_by_user(&self, user_id: &Id, page: u64) -> AppResult<OrderPage> {
        let total = self.storage.count_orders_by_user(user_id.as_str())?;
        let orders = self.storage.orders_by_user_desc(
            user_id.as_str(),
            page_offset(page),
            MAX_ORDERS_PER_REQUEST,
        )?;
        Ok(OrderPage::new(orders, total))
    }

    // ========== Reporting Reads ==========

    /// A user's currently active orders (pending or confirmed), newest first
    pub async fn find_active(&self, user_id: &Id) -> AppResult<Vec<Order>> {
        let orders = self
            .storage
            .orders_by_user_desc(user_id.as_str(), 0, usize::MAX)?;
        Ok(orders
            .into_iter()
            .filter(|order| {
                matches!(order.status, OrderStatus::Pending | OrderStatus::Confirmed)
            })
            .collect())
    }

    /// A tenant's orders created within `[from, to)` millis, oldest first
    pub async fn find_by_tenant_between(
        &self,
        tenant_id: &str,
        from: i64,
        to: i64,
    ) -> AppResult<Vec<Order>> {
        Ok(self.storage.orders_by_tenant_between(
            tenant_id,
            from.max(0) as u64,
            to.max(0) as u64,
        )?)
    }
}

/// First index of a 1-based page
fn page_offset(page: u64) -> usize {
    let page = page.max(1);
    ((page - 1) as usize).saturating_mul(MAX_ORDERS_PER_REQUEST)
}
