//! redb-based storage for catalog, tenant and order data
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `menus` | `restaurant_id` | `Menu` | One menu document per restaurant |
//! | `modifiers` | `(restaurant_id, modifier_id)` | `Modifier` | Restaurant-scoped modifiers |
//! | `companies` | `tenant_id` | `Company` | Tenant records with order policy |
//! | `orders` | `order_id` | `Order` | Persisted order aggregates |
//! | `orders_by_user` | `(user_id, created_at, order_id)` | `()` | User history / daily counts |
//! | `orders_by_tenant` | `(tenant_id, created_at, order_id)` | `()` | Console pagination / payroll |
//! | `orders_by_restaurant` | `(restaurant_id, created_at, order_id)` | `()` | Restaurant console |
//!
//! Values are JSON-serialized; index tables carry empty values and exist for
//! their key ordering. `created_at` in index keys is Unix millis, so a range
//! scan over `(key, from, "")..(key, to, "")` yields the half-open window
//! `[from, to)` and reverse iteration yields newest-first.
//!
//! # Durability
//!
//! redb commits are persistent as soon as `commit()` returns (copy-on-write
//! with atomic pointer swap), so the database file is always in a consistent
//! state even across unclean shutdowns.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use shared::models::{Company, Menu, Modifier, Order};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table for menus: key = restaurant_id, value = JSON-serialized Menu
const MENUS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("menus");

/// Table for modifiers: key = (restaurant_id, modifier_id), value = JSON-serialized Modifier
const MODIFIERS_TABLE: TableDefinition<(&str, &str), &[u8]> = TableDefinition::new("modifiers");

/// Table for companies: key = tenant_id, value = JSON-serialized Company
const COMPANIES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("companies");

/// Table for orders: key = order_id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Index: key = (user_id, created_at_millis, order_id), value = empty
const ORDERS_BY_USER_TABLE: TableDefinition<(&str, u64, &str), ()> =
    TableDefinition::new("orders_by_user");

/// Index: key = (tenant_id, created_at_millis, order_id), value = empty
const ORDERS_BY_TENANT_TABLE: TableDefinition<(&str, u64, &str), ()> =
    TableDefinition::new("orders_by_tenant");

/// Index: key = (restaurant_id, created_at_millis, order_id), value = empty
const ORDERS_BY_RESTAURANT_TABLE: TableDefinition<(&str, u64, &str), ()> =
    TableDefinition::new("orders_by_restaurant");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Order not found: {0}")]
    OrderNotFound(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Embedded storage backed by redb
#[derive(Clone)]
pub struct Storage {
    db: Arc<Database>,
}

impl Storage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    /// Open the database file under a data directory, creating the directory
    /// if needed (see `Config::data_dir`)
    pub fn open_in_dir(data_dir: impl AsRef<Path>) -> StorageResult<Self> {
        let dir = data_dir.as_ref();
        std::fs::create_dir_all(dir)?;
        Self::open(dir.join("canteen.redb"))
    }

    /// Open an in-memory database (tests and ephemeral tooling)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    /// Create all tables so later read transactions never hit a missing table
    fn init_tables(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(MENUS_TABLE)?;
            let _ = write_txn.open_table(MODIFIERS_TABLE)?;
            let _ = write_txn.open_table(COMPANIES_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(ORDERS_BY_USER_TABLE)?;
            let _ = write_txn.open_table(ORDERS_BY_TENANT_TABLE)?;
            let _ = write_txn.open_table(ORDERS_BY_RESTAURANT_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    // ========== Menu Operations ==========

    /// Store (insert or replace) a restaurant's menu
    pub fn put_menu(&self, menu: &Menu) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(MENUS_TABLE)?;
            let value = serde_json::to_vec(menu)?;
            table.insert(menu.restaurant_id.as_str(), value.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get a restaurant's menu
    pub fn get_menu(&self, restaurant_id: &str) -> StorageResult<Option<Menu>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MENUS_TABLE)?;

        match table.get(restaurant_id)? {
            Some(value) => {
                let menu: Menu = serde_json::from_slice(value.value())?;
                Ok(Some(menu))
            }
            None => Ok(None),
        }
    }

    /// Get all menus
    pub fn get_all_menus(&self) -> StorageResult<Vec<Menu>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MENUS_TABLE)?;

        let mut menus = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let menu: Menu = serde_json::from_slice(value.value())?;
            menus.push(menu);
        }
        Ok(menus)
    }

    // ========== Modifier Operations ==========

    /// Store (insert or replace) a modifier
    pub fn put_modifier(&self, modifier: &Modifier) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(MODIFIERS_TABLE)?;
            let key = (modifier.restaurant_id.as_str(), modifier.id.as_str());
            let value = serde_json::to_vec(modifier)?;
            table.insert(key, value.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get a modifier scoped to a restaurant
    pub fn get_modifier(
        &self,
        restaurant_id: &str,
        modifier_id: &str,
    ) -> StorageResult<Option<Modifier>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MODIFIERS_TABLE)?;

        match table.get((restaurant_id, modifier_id))? {
            Some(value) => {
                let modifier: Modifier = serde_json::from_slice(value.value())?;
                Ok(Some(modifier))
            }
            None => Ok(None),
        }
    }

    /// Get all modifiers of a restaurant
    pub fn get_modifiers_for_restaurant(
        &self,
        restaurant_id: &str,
    ) -> StorageResult<Vec<Modifier>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MODIFIERS_TABLE)?;

        let mut modifiers = Vec::new();
        for result in table.range((restaurant_id, "")..)? {
            let (key, value) = result?;
            if key.value().0 != restaurant_id {
                break;
            }
            let modifier: Modifier = serde_json::from_slice(value.value())?;
            modifiers.push(modifier);
        }
        Ok(modifiers)
    }

    /// Remove a modifier
    pub fn remove_modifier(&self, restaurant_id: &str, modifier_id: &str) -> StorageResult<bool> {
        let write_txn = self.db.begin_write()?;
        let existed = {
            let mut table = write_txn.open_table(MODIFIERS_TABLE)?;
            table.remove((restaurant_id, modifier_id))?.is_some()
        };
        write_txn.commit()?;
        Ok(existed)
    }

    // ========== Company Operations ==========

    /// Store (insert or replace) a company record
    pub fn put_company(&self, company: &Company) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(COMPANIES_TABLE)?;
            let value = serde_json::to_vec(company)?;
            table.insert(company.tenant_id.as_str(), value.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get a company by tenant id
    pub fn get_company(&self, tenant_id: &str) -> StorageResult<Option<Company>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COMPANIES_TABLE)?;

        match table.get(tenant_id)? {
            Some(value) => {
                let company: Company = serde_json::from_slice(value.value())?;
                Ok(Some(company))
            }
            None => Ok(None),
        }
    }

    // ========== Order Operations ==========

    /// Insert a new order and its index entries in one transaction
    pub fn insert_order(&self, order: &Order) -> StorageResult<()> {
        let created_at = order.created_at as u64;
        let write_txn = self.db.begin_write()?;
        {
            let mut orders = write_txn.open_table(ORDERS_TABLE)?;
            let value = serde_json::to_vec(order)?;
            orders.insert(order.id.as_str(), value.as_slice())?;

            let mut by_user = write_txn.open_table(ORDERS_BY_USER_TABLE)?;
            by_user.insert((order.user_id.as_str(), created_at, order.id.as_str()), ())?;

            let mut by_tenant = write_txn.open_table(ORDERS_BY_TENANT_TABLE)?;
            by_tenant.insert((order.tenant_id.as_str(), created_at, order.id.as_str()), ())?;

            let mut by_restaurant = write_txn.open_table(ORDERS_BY_RESTAURANT_TABLE)?;
            by_restaurant.insert(
                (order.restaurant_id.as_str(), created_at, order.id.as_str()),
                (),
            )?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Replace an existing order document
    ///
    /// Index entries are keyed by `created_at`, which never changes after
    /// insert, so only the document itself is rewritten.
    pub fn update_order(&self, order: &Order) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut orders = write_txn.open_table(ORDERS_TABLE)?;
            if orders.get(order.id.as_str())?.is_none() {
                return Err(StorageError::OrderNotFound(order.id.to_string()));
            }
            let value = serde_json::to_vec(order)?;
            orders.insert(order.id.as_str(), value.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get an order by id
    pub fn get_order(&self, order_id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        match table.get(order_id)? {
            Some(value) => {
                let order: Order = serde_json::from_slice(value.value())?;
                Ok(Some(order))
            }
            None => Ok(None),
        }
    }

    // ========== Order Index Scans ==========

    /// Count a user's orders created within `[from, to)` millis
    pub fn count_orders_by_user_between(
        &self,
        user_id: &str,
        from: u64,
        to: u64,
    ) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_BY_USER_TABLE)?;

        let mut count = 0u64;
        let range_start = (user_id, from, "");
        let range_end = (user_id, to, "");
        for result in table.range(range_start..range_end)? {
            result?;
            count += 1;
        }
        Ok(count)
    }

    /// Total number of orders under a user
    pub fn count_orders_by_user(&self, user_id: &str) -> StorageResult<u64> {
        self.count_orders_by_user_between(user_id, 0, u64::MAX)
    }

    /// Total number of orders under a tenant
    pub fn count_orders_by_tenant(&self, tenant_id: &str) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_BY_TENANT_TABLE)?;

        let mut count = 0u64;
        let range_start = (tenant_id, 0u64, "");
        let range_end = (tenant_id, u64::MAX, "");
        for result in table.range(range_start..range_end)? {
            result?;
            count += 1;
        }
        Ok(count)
    }

    /// Total number of orders under a restaurant
    pub fn count_orders_by_restaurant(&self, restaurant_id: &str) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_BY_RESTAURANT_TABLE)?;

        let mut count = 0u64;
        let range_start = (restaurant_id, 0u64, "");
        let range_end = (restaurant_id, u64::MAX, "");
        for result in table.range(range_start..range_end)? {
            result?;
            count += 1;
        }
        Ok(count)
    }

    /// A user's orders, newest first, with offset/limit
    pub fn orders_by_user_desc(
        &self,
        user_id: &str,
        offset: usize,
        limit: usize,
    ) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(ORDERS_BY_USER_TABLE)?;

        let range_start = (user_id, 0u64, "");
        let range_end = (user_id, u64::MAX, "");
        let mut order_ids = Vec::new();
        for result in index.range(range_start..range_end)?.rev().skip(offset) {
            let (key, _) = result?;
            order_ids.push(key.value().2.to_string());
            if order_ids.len() >= limit {
                break;
            }
        }
        drop(index);

        self.load_orders(&read_txn, &order_ids)
    }

    /// A tenant's orders, newest first, with offset/limit
    pub fn orders_by_tenant_desc(
        &self,
        tenant_id: &str,
        offset: usize,
        limit: usize,
    ) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(ORDERS_BY_TENANT_TABLE)?;

        let range_start = (tenant_id, 0u64, "");
        let range_end = (tenant_id, u64::MAX, "");
        let mut order_ids = Vec::new();
        for result in index.range(range_start..range_end)?.rev().skip(offset) {
            let (key, _) = result?;
            order_ids.push(key.value().2.to_string());
            if order_ids.len() >= limit {
                break;
            }
        }
        drop(index);

        self.load_orders(&read_txn, &order_ids)
    }

    /// A restaurant's orders, newest first, with offset/limit
    pub fn orders_by_restaurant_desc(
        &self,
        restaurant_id: &str,
        offset: usize,
        limit: usize,
    ) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(ORDERS_BY_RESTAURANT_TABLE)?;

        let range_start = (restaurant_id, 0u64, "");
        let range_end = (restaurant_id, u64::MAX, "");
        let mut order_ids = Vec::new();
        for result in index.range(range_start..range_end)?.rev().skip(offset) {
            let (key, _) = result?;
            order_ids.push(key.value().2.to_string());
            if order_ids.len() >= limit {
                break;
            }
        }
        drop(index);

        self.load_orders(&read_txn, &order_ids)
    }

    /// A tenant's orders created within `[from, to)` millis, oldest first
    pub fn orders_by_tenant_between(
        &self,
        tenant_id: &str,
        from: u64,
        to: u64,
    ) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(ORDERS_BY_TENANT_TABLE)?;

        let range_start = (tenant_id, from, "");
        let range_end = (tenant_id, to, "");
        let mut order_ids = Vec::new();
        for result in index.range(range_start..range_end)? {
            let (key, _) = result?;
            order_ids.push(key.value().2.to_string());
        }
        drop(index);

        self.load_orders(&read_txn, &order_ids)
    }

    /// Resolve a list of order ids to documents, preserving order
    fn load_orders(
        &self,
        read_txn: &redb::ReadTransaction,
        order_ids: &[String],
    ) -> StorageResult<Vec<Order>> {
        let table = read_txn.open_table(ORDERS_TABLE)?;
        let mut orders = Vec::with_capacity(order_ids.len());
        for order_id in order_ids {
            if let Some(value) = table.get(order_id.as_str())? {
                let order: Order = serde_json::from_slice(value.value())?;
                orders.push(order);
            }
        }
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{OrderStatus, Order};
    use shared::Id;

    fn make_order(user: &str, tenant: &str, restaurant: &str, created_at: i64) -> Order {
        Order {
            id: Id::generate(),
            user_id: Id::parse(user, "userId").unwrap(),
            tenant_id: tenant.to_string(),
            restaurant_id: Id::parse(restaurant, "restaurantId").unwrap(),
            items: vec![],
            status: OrderStatus::Pending,
            total_price: 10.0,
            discounted_price: 10.0,
            tip: None,
            message_to_kitchen: None,
            status_updates: vec![],
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn test_open_in_dir_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("state").join("db");
        let storage = Storage::open_in_dir(&nested).unwrap();

        storage
            .insert_order(&make_order("user-1", "acme", "rest-1", 1))
            .unwrap();
        assert!(nested.join("canteen.redb").exists());
    }

    #[test]
    fn test_insert_and_get_order() {
        let storage = Storage::open_in_memory().unwrap();
        let order = make_order("user-1", "acme", "rest-1", 1_000);
        storage.insert_order(&order).unwrap();

        let loaded = storage.get_order(order.id.as_str()).unwrap().unwrap();
        assert_eq!(loaded.id, order.id);
        assert_eq!(loaded.tenant_id, "acme");
        assert_eq!(loaded.total_price, 10.0);
    }

    #[test]
    fn test_count_orders_by_user_between_is_half_open() {
        let storage = Storage::open_in_memory().unwrap();
        for t in [100, 200, 300] {
            storage
                .insert_order(&make_order("user-1", "acme", "rest-1", t))
                .unwrap();
        }

        assert_eq!(
            storage
                .count_orders_by_user_between("user-1", 100, 300)
                .unwrap(),
            2
        );
        assert_eq!(
            storage
                .count_orders_by_user_between("user-1", 100, 301)
                .unwrap(),
            3
        );
        assert_eq!(
            storage
                .count_orders_by_user_between("user-2", 0, u64::MAX)
                .unwrap(),
            0
        );
    }

    #[test]
    fn test_tenant_scan_is_newest_first() {
        let storage = Storage::open_in_memory().unwrap();
        for t in [100, 300, 200] {
            storage
                .insert_order(&make_order("user-1", "acme", "rest-1", t))
                .unwrap();
        }
        storage
            .insert_order(&make_order("user-1", "other", "rest-1", 999))
            .unwrap();

        let orders = storage.orders_by_tenant_desc("acme", 0, 10).unwrap();
        let stamps: Vec<i64> = orders.iter().map(|o| o.created_at).collect();
        assert_eq!(stamps, vec![300, 200, 100]);

        let offset_page = storage.orders_by_tenant_desc("acme", 1, 1).unwrap();
        assert_eq!(offset_page.len(), 1);
        assert_eq!(offset_page[0].created_at, 200);
    }

    #[test]
    fn test_update_order_requires_existing() {
        let storage = Storage::open_in_memory().unwrap();
        let order = make_order("user-1", "acme", "rest-1", 100);

        let err = storage.update_order(&order).unwrap_err();
        assert!(matches!(err, StorageError::OrderNotFound(_)));

        storage.insert_order(&order).unwrap();
        let mut updated = order.clone();
        updated.status = OrderStatus::Confirmed;
        storage.update_order(&updated).unwrap();

        let loaded = storage.get_order(order.id.as_str()).unwrap().unwrap();
        assert_eq!(loaded.status, OrderStatus::Confirmed);
    }

    #[test]
    fn test_menu_and_modifier_round_trip() {
        let storage = Storage::open_in_memory().unwrap();
        let restaurant_id = Id::parse("rest-1", "restaurantId").unwrap();
        let menu = shared::models::Menu::new(restaurant_id.clone(), 1_000);
        storage.put_menu(&menu).unwrap();

        assert!(storage.get_menu("rest-1").unwrap().is_some());
        assert!(storage.get_menu("rest-2").unwrap().is_none());

        let modifier = shared::models::Modifier {
            id: Id::parse("mod-1", "modifierId").unwrap(),
            restaurant_id,
            name: "Toppings".to_string(),
            required: false,
            multiple: true,
            max: None,
            options: vec![],
            index_days_available: None,
        };
        storage.put_modifier(&modifier).unwrap();

        assert!(storage.get_modifier("rest-1", "mod-1").unwrap().is_some());
        assert!(storage.get_modifier("rest-2", "mod-1").unwrap().is_none());
        assert_eq!(
            storage.get_modifiers_for_restaurant("rest-1").unwrap().len(),
            1
        );
        assert!(storage.remove_modifier("rest-1", "mod-1").unwrap());
        assert!(!storage.remove_modifier("rest-1", "mod-1").unwrap());
    }
}
