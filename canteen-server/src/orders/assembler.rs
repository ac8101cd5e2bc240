//! Order Assembler
//!
//! Takes an authenticated user/tenant pair and a raw cart, validates the
//! cart against the restaurant's menu, prices it, enforces the tenant's
//! order policy and persists the result.
//!
//! Everything up to the final save is pure computation over catalog and
//! policy snapshots - no side effects - so a transient storage failure on
//! save can be retried by resubmitting the whole request without
//! double-charging.

use std::sync::Arc;

use shared::models::{
    MenuItem, Modifier, Order, OrderItem, OrderItemModifier, OrderItemOption, OrderPolicy,
    OrderStatus,
};
use shared::order::{CartLine, CreateOrderInput, ModifierSelection, OptionSelection};
use shared::{AppError, AppResult, Id};

use crate::catalog::CatalogService;
use crate::core::Config;
use crate::orders::pricing;
use crate::orders::store::OrderStore;
use crate::policy::{check_policy, CompanyDirectory, OrderCounts};
use crate::utils::logger::{Logger, TracingLogger};
use crate::utils::time::{day_bounds, month_bounds, now_millis};
use crate::utils::validation::{
    validate_non_negative_money, validate_optional_text, validate_quantity,
    validate_required_text, MAX_NAME_LEN, MAX_NOTE_LEN,
};

/// Assembles raw carts into persisted orders
#[derive(Clone)]
pub struct OrderAssembler {
    catalog: CatalogService,
    companies: CompanyDirectory,
    orders: OrderStore,
    logger: Arc<dyn Logger>,
    service_fee: f64,
    tz: chrono_tz::Tz,
}

impl std::fmt::Debug for OrderAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderAssembler")
            .field("service_fee", &self.service_fee)
            .field("tz", &self.tz)
            .finish()
    }
}

impl OrderAssembler {
    pub fn new(
        catalog: CatalogService,
        companies: CompanyDirectory,
        orders: OrderStore,
        config: &Config,
    ) -> Self {
        Self {
            catalog,
            companies,
            orders,
            logger: Arc::new(TracingLogger),
            service_fee: config.service_fee,
            tz: config.timezone,
        }
    }

    /// Replace the logger (tests inject a recording or no-op logger)
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Assemble and persist a new order
    ///
    /// `user_id` and `tenant_id` come from the caller's session context,
    /// the rest from the request body. Any validation or policy failure
    /// aborts the whole assembly; nothing is persisted on failure.
    pub async fn assemble(
        &self,
        user_id: &str,
        tenant_id: &str,
        input: CreateOrderInput,
    ) -> AppResult<Order> {
        let user_id = Id::parse(user_id, "userId")?;
        validate_required_text(tenant_id, "tenantId", MAX_NAME_LEN)?;
        let tenant_id = tenant_id.trim();
        let restaurant_id = Id::parse(&input.restaurant_id, "restaurantId")?;

        if input.items.is_empty() {
            return Err(AppError::validation("Order must have at least one item"));
        }

        let tip = match input.tip {
            Some(tip) => Some(validate_non_negative_money(tip, "tip")?),
            None => None,
        };
        validate_optional_text(&input.message_to_kitchen, "messageToKitchen", MAX_NOTE_LEN)?;

        // Resolve and snapshot every cart line against the menu
        let mut items = Vec::with_capacity(input.items.len());
        for line in &input.items {
            items.push(self.assemble_order_item(&restaurant_id, line)?);
        }

        let total_price = pricing::order_total(&items, tip.unwrap_or(0.0), self.service_fee);

        let company = self
            .companies
            .find_by_tenant(tenant_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Company with tenantId {tenant_id} not found"))
            })?;

        let now = now_millis();
        let counts = self.load_order_counts(&user_id, &company.policy, now).await?;

        let candidate = Order {
            id: Id::generate(),
            user_id,
            tenant_id: tenant_id.to_string(),
            restaurant_id,
            items,
            status: OrderStatus::Pending,
            total_price,
            discounted_price: pricing::employee_price(
                total_price,
                company.policy.company_contribution_percentage,
            ),
            tip,
            message_to_kitchen: input.message_to_kitchen,
            status_updates: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        if let Err(err) = check_policy(&company.policy, &counts, &candidate) {
            self.logger.warn(&format!(
                "Rejected order for user {}: {err}",
                candidate.user_id
            ));
            return Err(err);
        }

        match self.orders.save(candidate).await {
            Ok(order) => {
                self.logger
                    .info(&format!("Created order {} for user {}", order.id, order.user_id));
                Ok(order)
            }
            Err(err) => {
                self.logger.error(&format!("Failed to save order: {err}"));
                Err(err)
            }
        }
    }

    /// Load only the counts the policy actually needs
    async fn load_order_counts(
        &self,
        user_id: &Id,
        policy: &OrderPolicy,
        now: i64,
    ) -> AppResult<OrderCounts> {
        let mut counts = OrderCounts::default();
        if policy.max_orders_per_day.is_some() {
            let (start, end) = day_bounds(now, self.tz);
            counts.today = self
                .orders
                .count_user_orders_between(user_id, start, end)
                .await?;
        }
        if policy.max_orders_per_month.is_some() {
            let (start, end) = month_bounds(now, self.tz);
            counts.this_month = self
                .orders
                .count_user_orders_between(user_id, start, end)
                .await?;
        }
        Ok(counts)
    }

    /// Resolve one cart line into a snapshotted order item
    fn assemble_order_item(&self, restaurant_id: &Id, line: &CartLine) -> AppResult<OrderItem> {
        let item_id = Id::parse(&line.item_id, "item._id")?;

        let menu_item = self.catalog.find_item(restaurant_id, &item_id).ok_or_else(|| {
            AppError::not_found(format!(
                "Item {item_id} not found in the restaurant's menu"
            ))
        })?;

        let quantity = validate_quantity(line.quantity, "item.quantity")?;

        let mut modifiers = Vec::with_capacity(line.modifiers.len());
        for selection in &line.modifiers {
            modifiers.push(self.assemble_modifier(restaurant_id, &menu_item, selection)?);
        }

        // Required modifiers the cart line skipped entirely
        for modifier_id in &menu_item.modifiers {
            if modifiers.iter().any(|m| &m.modifier_id == modifier_id) {
                continue;
            }
            if let Some(modifier) = self.catalog.find_modifier(restaurant_id, modifier_id)
                && modifier.required
            {
                return Err(AppError::validation(format!(
                    "Modifier {} is required for item {}",
                    modifier.name, menu_item.name
                )));
            }
        }

        Ok(OrderItem {
            item_id: menu_item.id.clone(),
            name: menu_item.name.clone(),
            price: menu_item.price,
            description: menu_item.description.clone(),
            image_url: menu_item.image_url.clone(),
            category: menu_item.category.clone(),
            quantity,
            modifiers,
        })
    }

    /// Resolve a modifier selection against the item's declared modifiers
    fn assemble_modifier(
        &self,
        restaurant_id: &Id,
        menu_item: &MenuItem,
        selection: &ModifierSelection,
    ) -> AppResult<OrderItemModifier> {
        let modifier_id = Id::parse(&selection.modifier_id, "modifier._id")?;

        if !menu_item.modifiers.contains(&modifier_id) {
            return Err(AppError::association(format!(
                "Modifier {modifier_id} is not associated with item {}",
                menu_item.name
            )));
        }

        let modifier = self
            .catalog
            .find_modifier(restaurant_id, &modifier_id)
            .ok_or_else(|| AppError::not_found(format!("Modifier {modifier_id} not found")))?;

        let mut options = Vec::with_capacity(selection.options.len());
        if selection.options.is_empty() {
            if modifier.required {
                return Err(AppError::validation(format!(
                    "Modifier {} is required but no options were selected",
                    modifier.name
                )));
            }
        } else {
            if !modifier.multiple && selection.options.len() > 1 {
                return Err(AppError::constraint(format!(
                    "Modifier {} does not allow multiple selections",
                    modifier.name
                )));
            }

            let mut total_option_quantity: u64 = 0;
            for option_selection in &selection.options {
                let option = assemble_option(&modifier, option_selection)?;
                total_option_quantity += option.quantity as u64;
                options.push(option);
            }

            if let Some(max) = modifier.max
                && total_option_quantity > max as u64
            {
                return Err(AppError::constraint(format!(
                    "Total quantity of options selected for modifier {} exceeds the maximum of {max}",
                    modifier.name
                )));
            }
        }

        Ok(OrderItemModifier {
            modifier_id: modifier.id.clone(),
            name: modifier.name.clone(),
            required: modifier.required,
            multiple: modifier.multiple,
            max: modifier.max,
            options,
        })
    }
}

/// Resolve one option selection within a modifier
fn assemble_option(
    modifier: &Modifier,
    selection: &OptionSelection,
) -> AppResult<OrderItemOption> {
    let option_id = Id::parse(&selection.option_id, "option._id")?;

    let option = modifier.option(&option_id).ok_or_else(|| {
        AppError::not_found(format!(
            "Option {option_id} not found in modifier {}",
            modifier.name
        ))
    })?;

    let quantity = validate_quantity(selection.quantity, "option.quantity")?;

    if !option.multiple && quantity > 1 {
        return Err(AppError::constraint(format!(
            "Option {} in modifier {} does not allow multiple quantities",
            option.name, modifier.name
        )));
    }

    if let Some(max) = option.max
        && quantity > max
    {
        return Err(AppError::constraint(format!(
            "Quantity for option {} in modifier {} exceeds the maximum of {max}",
            option.name, modifier.name
        )));
    }

    Ok(OrderItemOption {
        option_id: option.id.clone(),
        name: option.name.clone(),
        price: option.price,
        quantity,
    })
}
