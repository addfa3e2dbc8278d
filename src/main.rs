//! Demo session: seed a café, take an order and serve it.

use anyhow::Context;
use cafe_orders::config::CafeConfig;
use cafe_orders::lifecycle::{setup_tracing, CafeSystem};
use cafe_orders::model::{Cart, OrderStatus};
use cafe_orders::report::ReportPeriod;
use cafe_orders::storage::MemoryStore;
use cafe_orders::watcher::LogAlert;
use std::sync::Arc;
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();

    let config = CafeConfig::from_env().context("loading configuration")?;
    info!(?config, "Starting cafe demo");

    let store = Arc::new(MemoryStore::new());
    let system = CafeSystem::start(store, config.clone(), Some(Arc::new(LogAlert))).await?;
    let client = &system.client;

    for _ in 0..3 {
        let table = client.add_table().await?;
        info!(table = table.number, url = %table.order_url(&config.base_url), "Table ready");
    }

    let span = tracing::info_span!("customer", table = 2);
    let order_id = async {
        let tables = client.tables().await?;
        let table = tables.get(1).context("table 2 missing")?;
        let menu = client.menu_items().await?;

        let mut cart = Cart::new();
        for item in &menu {
            cart.add(item);
        }
        if let Some(coffee) = menu.first() {
            cart.update_quantity(coffee.id, 1);
        }
        info!(lines = cart.lines().len(), total = cart.total(), "Checking out");

        let order_id = client.place_order(table.id, &mut cart).await?;
        anyhow::Ok(order_id)
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("staff", %order_id);
    async {
        for status in [
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Served,
            OrderStatus::Completed,
        ] {
            let order = client.update_order_status(order_id, status).await?;
            info!(status = %order.status, "Order updated");
        }
        client.mark_all_read().await?;
        anyhow::Ok(())
    }
    .instrument(span)
    .await?;

    let report = client.report(ReportPeriod::Daily).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    system.shutdown().await?;
    info!("Demo completed");
    Ok(())
}
