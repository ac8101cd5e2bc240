//! End-to-end order flow over in-memory storage
//!
//! Seeds a catalog and a tenant, then drives the full path an order takes:
//! assembly, status lifecycle, console pagination, active-order fetch,
//! payroll and stats.

use std::sync::Arc;

use canteen_server::orders::pricing;
use canteen_server::reporting::{company_stats, payroll_by_date};
use canteen_server::utils::logger::NullLogger;
use canteen_server::{
    CatalogService, CompanyDirectory, Config, ErrorKind, Id, OrderAssembler, OrderStore, Storage,
};
use shared::models::{
    Company, MenuItem, MenuItemCreate, Modifier, ModifierOption, OrderPolicy, OrderStatus,
};
use shared::order::{CartLine, CreateOrderInput, ModifierSelection, OptionSelection};

const TZ: chrono_tz::Tz = chrono_tz::Asia::Jerusalem;

struct TestApp {
    catalog: CatalogService,
    companies: CompanyDirectory,
    orders: OrderStore,
    assembler: OrderAssembler,
    restaurant_id: Id,
}

fn config() -> Config {
    Config {
        data_dir: "unused".to_string(),
        timezone: TZ,
        service_fee: 2.0,
        environment: "test".to_string(),
    }
}

async fn test_app(policy: OrderPolicy) -> TestApp {
    let storage = Storage::open_in_memory().unwrap();
    let catalog = CatalogService::new(storage.clone());
    let companies = CompanyDirectory::new(storage.clone());
    let orders = OrderStore::new(storage);

    companies
        .upsert(Company {
            tenant_id: "acme".to_string(),
            name: "Acme Ltd".to_string(),
            address: Some("12 Herzl St".to_string()),
            contact_email: Some("office@acme.example".to_string()),
            contact_phone: None,
            restaurants: vec![],
            members: vec![],
            policy,
        })
        .await
        .unwrap();

    let assembler = OrderAssembler::new(
        catalog.clone(),
        companies.clone(),
        orders.clone(),
        &config(),
    )
    .with_logger(Arc::new(NullLogger));

    TestApp {
        catalog,
        companies,
        orders,
        assembler,
        restaurant_id: Id::parse("rest-1", "restaurantId").unwrap(),
    }
}

async fn seed_item(app: &TestApp, name: &str, price: f64) -> MenuItem {
    app.catalog
        .create_item(
            &app.restaurant_id,
            MenuItemCreate {
                name: name.to_string(),
                price,
                description: None,
                image_url: None,
                category: Some("Mains".to_string()),
                vegan: None,
                is_spicy: None,
                spice_level: None,
                index_days_available: None,
            },
        )
        .await
        .unwrap()
}

async fn seed_toppings(app: &TestApp, item: &MenuItem) -> Modifier {
    let modifier = app
        .catalog
        .upsert_modifier(Modifier {
            id: Id::generate(),
            restaurant_id: app.restaurant_id.clone(),
            name: "Toppings".to_string(),
            required: false,
            multiple: true,
            max: Some(4),
            options: vec![
                ModifierOption {
                    id: Id::generate(),
                    name: "Amba".to_string(),
                    price: 1.5,
                    multiple: true,
                    max: None,
                    index_days_available: None,
                    is_spicy: None,
                    spice_level: None,
                    vegan: Some(true),
                },
                ModifierOption {
                    id: Id::generate(),
                    name: "Feta".to_string(),
                    price: 4.0,
                    multiple: false,
                    max: None,
                    index_days_available: None,
                    is_spicy: None,
                    spice_level: None,
                    vegan: Some(false),
                },
            ],
            index_days_available: None,
        })
        .await
        .unwrap();
    app.catalog
        .link_modifier(&app.restaurant_id, &item.id, &modifier.id)
        .await
        .unwrap();
    modifier
}

fn order_body(app: &TestApp, lines: Vec<CartLine>) -> CreateOrderInput {
    CreateOrderInput::new(app.restaurant_id.to_string(), lines)
}

#[tokio::test]
async fn test_full_order_lifecycle() {
    let app = test_app(OrderPolicy {
        company_contribution_percentage: Some(50.0),
        ..Default::default()
    })
    .await;

    let item = seed_item(&app, "Shakshuka", 38.0).await;
    let toppings = seed_toppings(&app, &item).await;
    let amba = toppings.options[0].id.clone();
    let feta = toppings.options[1].id.clone();

    let mut body = order_body(
        &app,
        vec![CartLine {
            item_id: item.id.to_string(),
            quantity: 2,
            modifiers: vec![ModifierSelection {
                modifier_id: toppings.id.to_string(),
                options: vec![
                    OptionSelection {
                        option_id: amba.to_string(),
                        quantity: 2,
                    },
                    OptionSelection {
                        option_id: feta.to_string(),
                        quantity: 1,
                    },
                ],
            }],
        }],
    );
    body.tip = Some(5.0);
    body.message_to_kitchen = Some("extra crispy".to_string());

    let order = app.assembler.assemble("user-1", "acme", body).await.unwrap();

    // (38 + 1.5×2 + 4) × 2 + 5 tip + 2 fee = 97
    assert_eq!(order.total_price, 97.0);
    assert_eq!(order.discounted_price, 48.5);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.message_to_kitchen.as_deref(), Some("extra crispy"));

    // The persisted line total matches the pricing helper
    assert_eq!(pricing::line_total(&order.items[0]), 90.0);

    // Kitchen walks the order forward
    for status in [
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Dispatched,
        OrderStatus::Delivered,
    ] {
        app.orders.update_status(&order.id, status).await.unwrap();
    }

    let delivered = app.orders.get(&order.id).await.unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert_eq!(delivered.status_updates.len(), 5);
    assert_eq!(delivered.status_updates[0].old_status, OrderStatus::Pending);
    assert_eq!(
        delivered.status_updates[4].new_status,
        OrderStatus::Delivered
    );
    // History indexes are contiguous
    for (i, update) in delivered.status_updates.iter().enumerate() {
        assert_eq!(update.index, i as u32);
    }
    // Pricing never recomputed along the way
    assert_eq!(delivered.total_price, 97.0);
    assert_eq!(delivered.discounted_price, 48.5);

    // Delivered orders are no longer active
    let user = Id::parse("user-1", "userId").unwrap();
    assert!(app.orders.find_active(&user).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_console_pagination_and_active_orders() {
    let app = test_app(OrderPolicy::default()).await;
    let item = seed_item(&app, "Falafel", 20.0).await;

    for i in 0..45 {
        let user = format!("user-{}", i % 3);
        app.assembler
            .assemble(
                &user,
                "acme",
                order_body(
                    &app,
                    vec![CartLine {
                        item_id: item.id.to_string(),
                        quantity: 1,
                        modifiers: vec![],
                    }],
                ),
            )
            .await
            .unwrap();
    }

    let page1 = app.orders.find_by_tenant("acme", 1).await.unwrap();
    assert_eq!(page1.orders.len(), 40);
    assert_eq!(page1.total_count, 45);
    assert_eq!(page1.max_pages, 2);
    // Newest first
    for pair in page1.orders.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }

    let page2 = app.orders.find_by_tenant("acme", 2).await.unwrap();
    assert_eq!(page2.orders.len(), 5);

    let by_restaurant = app
        .orders
        .find_by_restaurant(&app.restaurant_id, 1)
        .await
        .unwrap();
    assert_eq!(by_restaurant.total_count, 45);

    let user0 = Id::parse("user-0", "userId").unwrap();
    let by_user = app.orders.find_by_user(&user0, 1).await.unwrap();
    assert_eq!(by_user.total_count, 15);

    // All fresh orders are still pending, so they are all active
    assert_eq!(app.orders.find_active(&user0).await.unwrap().len(), 15);
}

#[tokio::test]
async fn test_payroll_and_stats_roll_up() {
    let app = test_app(OrderPolicy {
        company_contribution_percentage: Some(40.0),
        ..Default::default()
    })
    .await;
    let item = seed_item(&app, "Meorav", 48.0).await;

    let mut order_ids = Vec::new();
    for user in ["user-1", "user-1", "user-2"] {
        let order = app
            .assembler
            .assemble(
                user,
                "acme",
                order_body(
                    &app,
                    vec![CartLine {
                        item_id: item.id.to_string(),
                        quantity: 1,
                        modifiers: vec![],
                    }],
                ),
            )
            .await
            .unwrap();
        order_ids.push(order.id);
    }

    // Confirm two orders, cancel the third
    app.orders
        .update_status(&order_ids[0], OrderStatus::Confirmed)
        .await
        .unwrap();
    app.orders
        .update_status(&order_ids[1], OrderStatus::Confirmed)
        .await
        .unwrap();
    app.orders
        .update_status(&order_ids[2], OrderStatus::Cancelled)
        .await
        .unwrap();

    // Each order: 48 + 2 fee = 50 total, employee pays 30
    let payroll = payroll_by_date(&app.orders, "acme", 0, i64::MAX).await.unwrap();
    assert_eq!(payroll.len(), 1);
    let entry = &payroll["user-1"];
    assert_eq!(entry.order_count, 2);
    assert_eq!(entry.total_value, 60.0);

    let now = canteen_server::utils::time::now_millis();
    let stats = company_stats(&app.companies, &app.orders, "acme", now, TZ)
        .await
        .unwrap();
    // Cancelled orders never count toward revenue
    assert_eq!(stats.this_month_total, 100.0);
    assert_eq!(stats.this_week_total, 100.0);
}

#[tokio::test]
async fn test_failed_assembly_persists_nothing() {
    let app = test_app(OrderPolicy {
        max_order_shekels: Some(40.0),
        ..Default::default()
    })
    .await;
    let item = seed_item(&app, "Steak", 120.0).await;

    let err = app
        .assembler
        .assemble(
            "user-1",
            "acme",
            order_body(
                &app,
                vec![CartLine {
                    item_id: item.id.to_string(),
                    quantity: 1,
                    modifiers: vec![],
                }],
            ),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Policy);

    let page = app.orders.find_by_tenant("acme", 1).await.unwrap();
    assert_eq!(page.total_count, 0);
}

#[tokio::test]
async fn test_storage_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("canteen.redb");

    let order_id;
    {
        let storage = Storage::open(&path).unwrap();
        let catalog = CatalogService::new(storage.clone());
        let companies = CompanyDirectory::new(storage.clone());
        let orders = OrderStore::new(storage);
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

        let restaurant_id = Id::parse("rest-1", "restaurantId").unwrap();
        let item = catalog
            .create_item(
                &restaurant_id,
                MenuItemCreate {
                    name: "Soup".to_string(),
                    price: 24.0,
                    description: None,
                    image_url: None,
                    category: None,
                    vegan: Some(true),
                    is_spicy: None,
                    spice_level: None,
                    index_days_available: None,
                },
            )
            .await
            .unwrap();

        let assembler = OrderAssembler::new(catalog, companies, orders, &config())
            .with_logger(Arc::new(NullLogger));
        let order = assembler
            .assemble(
                "user-1",
                "acme",
                CreateOrderInput::new(
                    restaurant_id.to_string(),
                    vec![CartLine {
                        item_id: item.id.to_string(),
                        quantity: 1,
                        modifiers: vec![],
                    }],
                ),
            )
            .await
            .unwrap();
        order_id = order.id;
    }

    // Fresh handles over the same file see everything
    let storage = Storage::open(&path).unwrap();
    let catalog = CatalogService::new(storage.clone());
    catalog.warmup().await.unwrap();
    let orders = OrderStore::new(storage);

    let restaurant_id = Id::parse("rest-1", "restaurantId").unwrap();
    assert!(catalog.menu(&restaurant_id).is_some());

    let reloaded = orders.get(&order_id).await.unwrap();
    assert_eq!(reloaded.total_price, 26.0);
    assert_eq!(reloaded.status, OrderStatus::Pending);
}
