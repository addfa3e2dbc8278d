use cafe_orders::config::CafeConfig;
use cafe_orders::error::CafeError;
use cafe_orders::lifecycle::CafeSystem;
use cafe_orders::model::{
    Cart, CartLine, MenuItem, MenuItemCreate, MenuItemId, Order, OrderId, OrderStatus, Table,
    TableId, TableStatus,
};
use cafe_orders::report::ReportPeriod;
use cafe_orders::storage::{KeyValueStore, MemoryStore, ORDERS_KEY, TABLES_KEY};
use chrono::{Duration, Utc};
use std::sync::Arc;

/// Watcher effectively idle so tests drive sync themselves.
fn quiet_config() -> CafeConfig {
    CafeConfig {
        poll_interval_ms: 3_600_000,
        push_updates: false,
        sound_alerts: false,
        ..CafeConfig::default()
    }
}

async fn start(store: Arc<MemoryStore>) -> CafeSystem {
    CafeSystem::start(store, quiet_config(), None)
        .await
        .expect("Failed to start system")
}

#[tokio::test]
async fn test_espresso_checkout_occupies_table() {
    let store = Arc::new(MemoryStore::new());
    let system = start(store.clone()).await;

    let espresso = system
        .client
        .add_menu_item(MenuItemCreate::new("Espresso", "3.50", "Drinks"))
        .await
        .expect("Failed to add menu item");
    let table = system.client.add_table().await.expect("Failed to add table");
    assert_eq!(table.number, 1);

    let mut cart = Cart::new();
    cart.add(&espresso);
    cart.add(&espresso);
    assert_eq!(cart.total(), 7.0);

    let order_id = system
        .client
        .place_order(table.id, &mut cart)
        .await
        .expect("Failed to place order");
    assert!(cart.is_empty());

    let order = system
        .client
        .order(order_id)
        .await
        .expect("Failed to get order")
        .expect("Order not found");
    assert_eq!(order.total, 7.0);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.table_number, 1);
    assert_eq!(order.items[0].quantity, 2);

    let tables = system.client.tables().await.unwrap();
    assert_eq!(tables[0].status, TableStatus::Occupied);

    // Both changed collections reached the store.
    let stored: Vec<Order> =
        serde_json::from_str(&store.get(ORDERS_KEY).await.unwrap().unwrap()).unwrap();
    assert_eq!(stored, vec![order]);
    let stored: Vec<Table> =
        serde_json::from_str(&store.get(TABLES_KEY).await.unwrap().unwrap()).unwrap();
    assert_eq!(stored[0].status, TableStatus::Occupied);

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_order_lifecycle_and_table_release() {
    let system = start(Arc::new(MemoryStore::new())).await;
    let client = &system.client;

    let table = client.add_table().await.unwrap();
    let coffee = client.menu_items().await.unwrap()[0].clone();

    let mut cart = Cart::new();
    cart.add(&coffee);
    let first = client.place_order(table.id, &mut cart).await.unwrap();
    cart.add(&coffee);
    let second = client.place_order(table.id, &mut cart).await.unwrap();

    let order = client
        .update_order_status(first, OrderStatus::Preparing)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Preparing);

    // Another order is still open at the table.
    client
        .update_order_status(first, OrderStatus::Completed)
        .await
        .unwrap();
    assert_eq!(client.tables().await.unwrap()[0].status, TableStatus::Occupied);

    client
        .update_order_status(second, OrderStatus::Completed)
        .await
        .unwrap();
    assert_eq!(client.tables().await.unwrap()[0].status, TableStatus::Available);
    assert!(client.snapshot().await.unwrap().active_orders().is_empty());

    // Completed is terminal.
    let result = client.update_order_status(first, OrderStatus::Ready).await;
    assert!(matches!(result, Err(CafeError::InvalidState(_))));

    let messages: Vec<String> = client
        .notifications()
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.message)
        .collect();
    assert_eq!(
        messages,
        vec![
            "Order #2 for Table 1 completed".to_string(),
            "Order #1 for Table 1 completed".to_string(),
            "Order #1 is being prepared".to_string(),
        ]
    );
    assert_eq!(client.unread_count().await.unwrap(), 3);

    client.mark_all_read().await.unwrap();
    assert_eq!(client.unread_count().await.unwrap(), 0);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_rejections_leave_state_alone() {
    let system = start(Arc::new(MemoryStore::new())).await;
    let client = &system.client;

    let result = client
        .add_menu_item(MenuItemCreate::new("Scone", "-1", "Food"))
        .await;
    assert!(matches!(result, Err(CafeError::InvalidArgument(_))));
    let result = client
        .add_menu_item(MenuItemCreate::new("   ", "2.00", "Food"))
        .await;
    assert!(matches!(result, Err(CafeError::InvalidArgument(_))));
    assert_eq!(client.menu_items().await.unwrap().len(), 3);

    let coffee = client.menu_items().await.unwrap()[0].clone();
    let mut cart = Cart::new();
    cart.add(&coffee);
    let result = client.place_order(TableId(42), &mut cart).await;
    assert!(matches!(result, Err(CafeError::NotFound(_))));
    assert_eq!(cart.lines().len(), 1);

    assert!(matches!(
        client.delete_table(TableId(42)).await,
        Err(CafeError::NotFound(_))
    ));
    assert!(matches!(
        client.update_order_status(OrderId(42), OrderStatus::Ready).await,
        Err(CafeError::NotFound(_))
    ));

    let snapshot = client.snapshot().await.unwrap();
    assert!(snapshot.orders.is_empty());
    assert!(snapshot.tables.is_empty());
    assert!(snapshot.notifications.is_empty());

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_table_and_menu_management() {
    let system = start(Arc::new(MemoryStore::new())).await;
    let client = &system.client;

    let first = client.add_table().await.unwrap();
    let second = client.add_table().await.unwrap();
    assert_eq!((first.number, second.number), (1, 2));

    client.delete_table(first.id).await.unwrap();
    // Numbers follow the current count.
    let third = client.add_table().await.unwrap();
    assert_eq!(third.number, 2);
    assert_ne!(third.id, second.id);

    let table = client
        .update_table_status(second.id, "occupied".parse().unwrap())
        .await
        .unwrap();
    assert_eq!(table.status, TableStatus::Occupied);

    let tea = client
        .add_menu_item(MenuItemCreate::new(" Tea ", "2.25", ""))
        .await
        .unwrap();
    assert_eq!(tea.name, "Tea");
    assert_eq!(tea.category, "Other");

    client.delete_menu_item(MenuItemId(1)).await.unwrap();
    let names: Vec<String> = client
        .menu_items()
        .await
        .unwrap()
        .into_iter()
        .map(|item| item.name)
        .collect();
    assert_eq!(names, vec!["Sandwich", "Cake", "Tea"]);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_daily_report_counts_only_today() {
    let store = Arc::new(MemoryStore::new());
    let cake = MenuItem::new(MenuItemId(3), "Cake", 10.0, "Desserts");
    let sandwich = MenuItem::new(MenuItemId(2), "Sandwich", 5.0, "Food");

    let mut today = Order::new(
        OrderId(1),
        TableId(1),
        1,
        vec![CartLine::from_item(&cake, 1)],
        Utc::now(),
    );
    today.status = OrderStatus::Completed;
    let yesterday = Order::new(
        OrderId(2),
        TableId(1),
        1,
        vec![CartLine::from_item(&sandwich, 1)],
        Utc::now() - Duration::days(1),
    );
    store
        .set(ORDERS_KEY, serde_json::to_string(&[today, yesterday]).unwrap())
        .await
        .unwrap();

    let system = start(store).await;

    let report = system.client.report(ReportPeriod::Daily).await.unwrap();
    assert_eq!(report.total_orders, 1);
    assert_eq!(report.total_revenue, 10.0);
    assert_eq!(report.completed_orders, 1);
    assert_eq!(report.avg_order_value, 10.0);
    assert_eq!(report.top_items.len(), 1);
    assert_eq!(report.top_items[0].name, "Cake");

    let report = system.client.report(ReportPeriod::All).await.unwrap();
    assert_eq!(report.total_orders, 2);
    assert_eq!(report.total_revenue, 15.0);

    // Orders found in the store at startup are not news.
    assert!(system.client.sync().await.unwrap().is_empty());

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_empty_report_has_zero_average() {
    let system = start(Arc::new(MemoryStore::new())).await;

    let report = system.client.report(ReportPeriod::All).await.unwrap();
    assert_eq!(report.total_orders, 0);
    assert_eq!(report.avg_order_value, 0.0);
    assert!(report.top_items.is_empty());

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_sessions_sharing_a_store_see_new_orders_once() {
    let store = Arc::new(MemoryStore::new());
    let staff = start(store.clone()).await;
    let customer = start(store).await;

    let table = customer.client.add_table().await.unwrap();
    let coffee = customer.client.menu_items().await.unwrap()[0].clone();
    let mut cart = Cart::new();
    cart.add(&coffee);
    let order_id = customer.client.place_order(table.id, &mut cart).await.unwrap();

    let found = staff.client.sync().await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, order_id);
    assert_eq!(staff.client.tables().await.unwrap().len(), 1);

    // Polling again on unchanged data adds nothing.
    assert!(staff.client.sync().await.unwrap().is_empty());
    let notifications = staff.client.notifications().await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].message, "New order #1 from Table 1");

    // A status change elsewhere does not resurface the order.
    customer
        .client
        .update_order_status(order_id, OrderStatus::Preparing)
        .await
        .unwrap();
    assert!(staff.client.sync().await.unwrap().is_empty());
    let order = staff.client.order(order_id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Preparing);

    staff.shutdown().await.unwrap();
    customer.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_restart_restores_state_and_continues_ids() {
    let store = Arc::new(MemoryStore::new());

    let system = start(store.clone()).await;
    let table = system.client.add_table().await.unwrap();
    let coffee = system.client.menu_items().await.unwrap()[0].clone();
    let mut cart = Cart::new();
    cart.add(&coffee);
    system.client.place_order(table.id, &mut cart).await.unwrap();
    system.shutdown().await.unwrap();

    let system = start(store).await;
    let snapshot = system.client.snapshot().await.unwrap();
    assert_eq!(snapshot.tables.len(), 1);
    assert_eq!(snapshot.orders.len(), 1);
    // Menu is not seeded twice.
    assert_eq!(snapshot.menu_items.len(), 3);

    let table = system.client.add_table().await.unwrap();
    assert_eq!(table.id, TableId(2));
    cart.add(&coffee);
    let order_id = system.client.place_order(table.id, &mut cart).await.unwrap();
    assert_eq!(order_id, OrderId(2));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_start_rejects_zero_poll_interval() {
    let config = CafeConfig {
        poll_interval_ms: 0,
        ..quiet_config()
    };
    let result = CafeSystem::start(Arc::new(MemoryStore::new()), config, None).await;
    assert!(matches!(result, Err(CafeError::InvalidArgument(_))));
}

#[tokio::test]
async fn test_largest_stored_order_id_still_starts() {
    let store = Arc::new(MemoryStore::new());
    let coffee = MenuItem::new(MenuItemId(1), "Coffee", 2.0, "Drinks");
    let table = Table::new(TableId(1), 1);
    let stored = Order::new(
        OrderId(u32::MAX),
        table.id,
        table.number,
        vec![CartLine::from_item(&coffee, 1)],
        Utc::now(),
    );
    store
        .set(TABLES_KEY, serde_json::to_string(&[table.clone()]).unwrap())
        .await
        .unwrap();
    store
        .set(ORDERS_KEY, serde_json::to_string(&[stored]).unwrap())
        .await
        .unwrap();

    let system = start(store).await;
    assert_eq!(system.client.orders().await.unwrap().len(), 1);

    // Every order id is taken, so checkout is refused and the cart kept.
    let mut cart = Cart::new();
    cart.add(&coffee);
    let result = system.client.place_order(table.id, &mut cart).await;
    assert!(matches!(result, Err(CafeError::InvalidState(_))));
    assert_eq!(cart.lines().len(), 1);
    assert_eq!(system.client.orders().await.unwrap().len(), 1);

    system.shutdown().await.unwrap();
}
