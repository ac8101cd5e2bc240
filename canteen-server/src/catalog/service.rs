//! Catalog Service - menu and modifier management with in-memory caching
//!
//! Write-through persistence: every mutation lands in storage first, then in
//! the cache. Point lookups (`find_item`, `find_modifier`) are served from
//! memory; call [`CatalogService::warmup`] once at startup to prime the cache
//! from storage.
//!
//! The order assembler only ever reads from this service. Catalog editing
//! flows (restaurant manager console) call the mutation methods.

use parking_lot::RwLock;
use shared::models::{
    Menu, MenuItem, MenuItemCreate, MenuItemUpdate, Modifier, ModifierCreate, ModifierUpdate,
};
use shared::{AppError, AppResult, Id};
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::Storage;
use crate::utils::time::now_millis;
use crate::utils::validation::{validate_required_text, MAX_NAME_LEN};

/// Unified catalog service for menus and modifiers
#[derive(Clone)]
pub struct CatalogService {
    storage: Storage,
    /// Menus cache: restaurant_id -> Menu
    menus: Arc<RwLock<HashMap<String, Menu>>>,
    /// Modifiers cache: (restaurant_id, modifier_id) -> Modifier
    modifiers: Arc<RwLock<HashMap<(String, String), Modifier>>>,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let menus_count = self.menus.read().len();
        let modifiers_count = self.modifiers.read().len();
        f.debug_struct("CatalogService")
            .field("menus_count", &menus_count)
            .field("modifiers_count", &modifiers_count)
            .finish()
    }
}

impl CatalogService {
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            menus: Arc::new(RwLock::new(HashMap::new())),
            modifiers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    // =========================================================================
    // Warmup
    // =========================================================================

    /// Load all menus and modifiers into the memory cache
    pub async fn warmup(&self) -> AppResult<()> {
        let menus = self.storage.get_all_menus()?;

        let mut modifier_cache = HashMap::new();
        for menu in &menus {
            let restaurant_id = menu.restaurant_id.to_string();
            for modifier in self
                .storage
                .get_modifiers_for_restaurant(&restaurant_id)?
            {
                modifier_cache.insert(
                    (restaurant_id.clone(), modifier.id.to_string()),
                    modifier,
                );
            }
        }

        let menu_count = menus.len();
        let modifier_count = modifier_cache.len();

        {
            let mut cache = self.menus.write();
            cache.clear();
            for menu in menus {
                cache.insert(menu.restaurant_id.to_string(), menu);
            }
        }
        {
            let mut cache = self.modifiers.write();
            *cache = modifier_cache;
        }

        tracing::info!(
            "CatalogService: loaded {} menus, {} modifiers",
            menu_count,
            modifier_count
        );
        Ok(())
    }

    // =========================================================================
    // Point Lookups (served from cache)
    // =========================================================================

    /// Get a restaurant's full menu
    pub fn menu(&self, restaurant_id: &Id) -> Option<Menu> {
        self.menus.read().get(restaurant_id.as_str()).cloned()
    }

    /// Find a menu item within a restaurant's menu
    pub fn find_item(&self, restaurant_id: &Id, item_id: &Id) -> Option<MenuItem> {
        self.menus
            .read()
            .get(restaurant_id.as_str())
            .and_then(|menu| menu.item(item_id))
            .cloned()
    }

    /// Find a modifier scoped to a restaurant
    pub fn find_modifier(&self, restaurant_id: &Id, modifier_id: &Id) -> Option<Modifier> {
        self.modifiers
            .read()
            .get(&(restaurant_id.to_string(), modifier_id.to_string()))
            .cloned()
    }

    // =========================================================================
    // Menu Mutations (write-through)
    // =========================================================================

    /// Add an item to a restaurant's menu, creating the menu if needed
    pub async fn create_item(
        &self,
        restaurant_id: &Id,
        payload: MenuItemCreate,
    ) -> AppResult<MenuItem> {
        validate_required_text(&payload.name, "item.name", MAX_NAME_LEN)?;
        if payload.price < 0.0 || !payload.price.is_finite() {
            return Err(AppError::validation(format!(
                "Invalid price for item {}",
                payload.name
            )));
        }

        let now = now_millis();
        let mut menu = self
            .menu(restaurant_id)
            .unwrap_or_else(|| Menu::new(restaurant_id.clone(), now));

        let item = MenuItem {
            id: Id::generate(),
            name: payload.name,
            price: payload.price,
            description: payload.description,
            image_url: payload.image_url,
            category: payload.category,
            modifiers: Vec::new(),
            sold: 0,
            vegan: payload.vegan,
            is_spicy: payload.is_spicy,
            spice_level: payload.spice_level,
            index_days_available: payload.index_days_available,
        };

        menu.items.push(item.clone());
        menu.updated_at = now;
        self.store_menu(menu)?;
        Ok(item)
    }

    /// Update an existing menu item
    pub async fn update_item(
        &self,
        restaurant_id: &Id,
        item_id: &Id,
        payload: MenuItemUpdate,
    ) -> AppResult<MenuItem> {
        let mut menu = self
            .menu(restaurant_id)
            .ok_or_else(|| AppError::not_found(format!("Menu for restaurant {restaurant_id}")))?;

        let item = menu
            .item_mut(item_id)
            .ok_or_else(|| AppError::not_found(format!("Item {item_id} not found in the menu")))?;

        if let Some(name) = payload.name {
            validate_required_text(&name, "item.name", MAX_NAME_LEN)?;
            item.name = name;
        }
        if let Some(price) = payload.price {
            if price < 0.0 || !price.is_finite() {
                return Err(AppError::validation(format!(
                    "Invalid price for item {item_id}"
                )));
            }
            item.price = price;
        }
        if let Some(description) = payload.description {
            item.description = Some(description);
        }
        if let Some(image_url) = payload.image_url {
            item.image_url = Some(image_url);
        }
        if let Some(category) = payload.category {
            item.category = Some(category);
        }
        if let Some(vegan) = payload.vegan {
            item.vegan = Some(vegan);
        }
        if let Some(is_spicy) = payload.is_spicy {
            item.is_spicy = Some(is_spicy);
        }
        if let Some(spice_level) = payload.spice_level {
            item.spice_level = Some(spice_level);
        }
        if let Some(days) = payload.index_days_available {
            item.index_days_available = Some(days);
        }

        let updated = item.clone();
        menu.updated_at = now_millis();
        self.store_menu(menu)?;
        Ok(updated)
    }

    /// Remove an item from a restaurant's menu
    pub async fn remove_item(&self, restaurant_id: &Id, item_id: &Id) -> AppResult<bool> {
        let mut menu = self
            .menu(restaurant_id)
            .ok_or_else(|| AppError::not_found(format!("Menu for restaurant {restaurant_id}")))?;

        let before = menu.items.len();
        menu.items.retain(|item| &item.id != item_id);
        if menu.items.len() == before {
            return Ok(false);
        }
        menu.updated_at = now_millis();
        self.store_menu(menu)?;
        Ok(true)
    }

    // =========================================================================
    // Modifier Mutations (write-through)
    // =========================================================================

    /// Store (insert or replace) a restaurant-scoped modifier
    pub async fn upsert_modifier(&self, modifier: Modifier) -> AppResult<Modifier> {
        validate_required_text(&modifier.name, "modifier.name", MAX_NAME_LEN)?;
        for option in &modifier.options {
            validate_required_text(&option.name, "option.name", MAX_NAME_LEN)?;
            if option.price < 0.0 || !option.price.is_finite() {
                return Err(AppError::validation(format!(
                    "Invalid price for option {}",
                    option.name
                )));
            }
        }

        self.storage.put_modifier(&modifier)?;
        self.modifiers.write().insert(
            (modifier.restaurant_id.to_string(), modifier.id.to_string()),
            modifier.clone(),
        );
        Ok(modifier)
    }

    /// Create a restaurant-scoped modifier from a payload
    pub async fn create_modifier(
        &self,
        restaurant_id: &Id,
        payload: ModifierCreate,
    ) -> AppResult<Modifier> {
        let modifier = Modifier {
            id: Id::generate(),
            restaurant_id: restaurant_id.clone(),
            name: payload.name,
            required: payload.required.unwrap_or(false),
            multiple: payload.multiple.unwrap_or(false),
            max: payload.max,
            options: payload.options.unwrap_or_default(),
            index_days_available: payload.index_days_available,
        };
        self.upsert_modifier(modifier).await
    }

    /// Update an existing modifier
    pub async fn update_modifier(
        &self,
        restaurant_id: &Id,
        modifier_id: &Id,
        payload: ModifierUpdate,
    ) -> AppResult<Modifier> {
        let mut modifier = self
            .find_modifier(restaurant_id, modifier_id)
            .ok_or_else(|| AppError::not_found(format!("Modifier {modifier_id} not found")))?;

        if let Some(name) = payload.name {
            modifier.name = name;
        }
        if let Some(required) = payload.required {
            modifier.required = required;
        }
        if let Some(multiple) = payload.multiple {
            modifier.multiple = multiple;
        }
        if let Some(max) = payload.max {
            modifier.max = Some(max);
        }
        if let Some(options) = payload.options {
            modifier.options = options;
        }
        if let Some(days) = payload.index_days_available {
            modifier.index_days_available = Some(days);
        }

        self.upsert_modifier(modifier).await
    }

    /// Remove a modifier and detach it from every item on the menu
    pub async fn remove_modifier(&self, restaurant_id: &Id, modifier_id: &Id) -> AppResult<bool> {
        let existed = self
            .storage
            .remove_modifier(restaurant_id.as_str(), modifier_id.as_str())?;
        self.modifiers
            .write()
            .remove(&(restaurant_id.to_string(), modifier_id.to_string()));

        if existed && let Some(mut menu) = self.menu(restaurant_id) {
            for item in &mut menu.items {
                item.modifiers.retain(|id| id != modifier_id);
            }
            menu.updated_at = now_millis();
            self.store_menu(menu)?;
        }
        Ok(existed)
    }

    /// Attach a modifier to a menu item
    ///
    /// The modifier must already exist within the same restaurant; a
    /// reference into another restaurant's scope is an association error.
    pub async fn link_modifier(
        &self,
        restaurant_id: &Id,
        item_id: &Id,
        modifier_id: &Id,
    ) -> AppResult<()> {
        if self.find_modifier(restaurant_id, modifier_id).is_none() {
            return Err(AppError::association(format!(
                "Modifier {modifier_id} is not defined for restaurant {restaurant_id}"
            )));
        }

        let mut menu = self
            .menu(restaurant_id)
            .ok_or_else(|| AppError::not_found(format!("Menu for restaurant {restaurant_id}")))?;
        let item = menu
            .item_mut(item_id)
            .ok_or_else(|| AppError::not_found(format!("Item {item_id} not found in the menu")))?;

        if !item.modifiers.contains(modifier_id) {
            item.modifiers.push(modifier_id.clone());
        }
        menu.updated_at = now_millis();
        self.store_menu(menu)?;
        Ok(())
    }

    /// Detach a modifier from a menu item
    pub async fn unlink_modifier(
        &self,
        restaurant_id: &Id,
        item_id: &Id,
        modifier_id: &Id,
    ) -> AppResult<()> {
        let mut menu = self
            .menu(restaurant_id)
            .ok_or_else(|| AppError::not_found(format!("Menu for restaurant {restaurant_id}")))?;
        let item = menu
            .item_mut(item_id)
            .ok_or_else(|| AppError::not_found(format!("Item {item_id} not found in the menu")))?;

        item.modifiers.retain(|id| id != modifier_id);
        menu.updated_at = now_millis();
        self.store_menu(menu)?;
        Ok(())
    }

    /// Persist a menu and refresh its cache entry
    fn store_menu(&self, menu: Menu) -> AppResult<()> {
        self.storage.put_menu(&menu)?;
        self.menus
            .write()
            .insert(menu.restaurant_id.to_string(), menu);
        Ok(())
    }
}
