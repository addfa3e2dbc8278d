//! # Sales Reporting
//!
//! Client-side aggregation over the order collection. A [`ReportPeriod`] picks
//! the timestamp window, [`build_report`] folds the matching orders into a
//! [`SalesReport`].
//!
//! Calendar windows (daily, monthly) are evaluated in the caller's time zone:
//! pass `Local::now()` for the café's wall clock, or any other
//! `DateTime<Tz>` in tests.

use crate::error::CafeError;
use crate::model::{Order, OrderStatus};
use chrono::{DateTime, Datelike, Duration, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

/// How many best sellers a report lists.
pub const TOP_ITEMS_LIMIT: usize = 5;

/// Timestamp window applied before aggregating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    /// Same calendar date as now.
    Daily,
    /// The last 7×24 hours.
    Weekly,
    /// Same calendar month and year as now.
    Monthly,
    All,
}

impl ReportPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportPeriod::Daily => "daily",
            ReportPeriod::Weekly => "weekly",
            ReportPeriod::Monthly => "monthly",
            ReportPeriod::All => "all",
        }
    }

    /// Whether an order placed at `timestamp` falls inside this window.
    pub fn contains<Tz: TimeZone, Tz2: TimeZone>(
        &self,
        timestamp: &DateTime<Tz2>,
        now: &DateTime<Tz>,
    ) -> bool {
        let local = timestamp.with_timezone(&now.timezone());
        match self {
            ReportPeriod::Daily => local.date_naive() == now.date_naive(),
            ReportPeriod::Weekly => local >= now.clone() - Duration::days(7),
            ReportPeriod::Monthly => local.year() == now.year() && local.month() == now.month(),
            ReportPeriod::All => true,
        }
    }
}

impl Display for ReportPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportPeriod {
    type Err = CafeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(ReportPeriod::Daily),
            "weekly" => Ok(ReportPeriod::Weekly),
            "monthly" => Ok(ReportPeriod::Monthly),
            "all" => Ok(ReportPeriod::All),
            other => Err(CafeError::InvalidArgument(format!(
                "unknown report period '{other}'"
            ))),
        }
    }
}

/// Aggregate sales of one item name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopItem {
    pub name: String,
    pub quantity: u32,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    pub period: ReportPeriod,
    pub total_orders: usize,
    pub total_revenue: f64,
    pub completed_orders: usize,
    /// Zero when there are no orders.
    pub avg_order_value: f64,
    pub top_items: Vec<TopItem>,
}

/// Aggregate `orders` placed within `period` as seen from `now`.
pub fn build_report<Tz: TimeZone>(
    orders: &[Order],
    period: ReportPeriod,
    now: &DateTime<Tz>,
) -> SalesReport {
    let selected: Vec<&Order> = orders
        .iter()
        .filter(|order| period.contains(&order.timestamp, now))
        .collect();

    let total_orders = selected.len();
    let total_revenue: f64 = selected.iter().map(|order| order.total).sum();
    let completed_orders = selected
        .iter()
        .filter(|order| order.status == OrderStatus::Completed)
        .count();
    let avg_order_value = if total_orders == 0 {
        0.0
    } else {
        total_revenue / total_orders as f64
    };

    SalesReport {
        period,
        total_orders,
        total_revenue,
        completed_orders,
        avg_order_value,
        top_items: top_items(&selected),
    }
}

/// Best sellers by quantity. `sort_by` is stable, so equal quantities keep
/// the order in which the names were first seen.
fn top_items(orders: &[&Order]) -> Vec<TopItem> {
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut items: Vec<TopItem> = Vec::new();

    for line in orders.iter().flat_map(|order| order.items.iter()) {
        let idx = *position.entry(line.name.as_str()).or_insert_with(|| {
            items.push(TopItem {
                name: line.name.clone(),
                quantity: 0,
                revenue: 0.0,
            });
            items.len() - 1
        });
        items[idx].quantity = items[idx].quantity.saturating_add(line.quantity);
        items[idx].revenue += line.subtotal();
    }

    items.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    items.truncate(TOP_ITEMS_LIMIT);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CartLine, MenuItemId, OrderId, TableId};
    use chrono::{FixedOffset, Utc};

    fn line(name: &str, price: f64, quantity: u32) -> CartLine {
        CartLine {
            menu_item_id: MenuItemId(1),
            name: name.to_string(),
            price,
            quantity,
        }
    }

    fn order_at<Tz: TimeZone>(
        id: u32,
        at: DateTime<Tz>,
        items: Vec<CartLine>,
        status: OrderStatus,
    ) -> Order {
        let mut order = Order::new(OrderId(id), TableId(1), 1, items, at.with_timezone(&Utc));
        order.status = status;
        order
    }

    fn noon() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 3, 15, 12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_empty_report_has_zero_average() {
        let report = build_report(&[], ReportPeriod::All, &noon());
        assert_eq!(report.total_orders, 0);
        assert_eq!(report.total_revenue, 0.0);
        assert_eq!(report.avg_order_value, 0.0);
        assert!(report.top_items.is_empty());
    }

    #[test]
    fn test_daily_only_counts_today() {
        let now = noon();
        let orders = vec![
            order_at(1, now, vec![line("Latte", 5.0, 2)], OrderStatus::Completed),
            order_at(
                2,
                now - Duration::days(1),
                vec![line("Cake", 5.0, 1)],
                OrderStatus::Pending,
            ),
        ];

        let report = build_report(&orders, ReportPeriod::Daily, &now);
        assert_eq!(report.total_orders, 1);
        assert_eq!(report.total_revenue, 10.0);
        assert_eq!(report.completed_orders, 1);
        assert_eq!(report.avg_order_value, 10.0);
    }

    #[test]
    fn test_daily_uses_callers_calendar_date() {
        // 23:30 UTC on the 14th is already the 15th at UTC+2.
        let late = Utc.with_ymd_and_hms(2026, 3, 14, 23, 30, 0).unwrap();
        let orders = vec![order_at(1, late, vec![line("Tea", 2.0, 1)], OrderStatus::Pending)];

        assert_eq!(build_report(&orders, ReportPeriod::Daily, &noon()).total_orders, 1);
        let utc_noon = noon().with_timezone(&Utc);
        assert_eq!(build_report(&orders, ReportPeriod::Daily, &utc_noon).total_orders, 0);
    }

    #[test]
    fn test_weekly_and_monthly_windows() {
        let now = noon();
        let orders = vec![
            order_at(1, now - Duration::days(6), vec![line("Tea", 2.0, 1)], OrderStatus::Served),
            order_at(2, now - Duration::days(8), vec![line("Tea", 2.0, 1)], OrderStatus::Served),
            order_at(3, now - Duration::days(40), vec![line("Tea", 2.0, 1)], OrderStatus::Served),
        ];

        assert_eq!(build_report(&orders, ReportPeriod::Weekly, &now).total_orders, 1);
        // 15 March minus 8 days is still March; minus 40 days is February.
        assert_eq!(build_report(&orders, ReportPeriod::Monthly, &now).total_orders, 2);
        assert_eq!(build_report(&orders, ReportPeriod::All, &now).total_orders, 3);
    }

    #[test]
    fn test_weekly_window_includes_exactly_seven_days_ago() {
        let now = noon();
        let orders = vec![
            order_at(1, now - Duration::days(7), vec![line("Tea", 2.0, 1)], OrderStatus::Served),
            order_at(
                2,
                now - Duration::days(7) - Duration::seconds(1),
                vec![line("Tea", 2.0, 1)],
                OrderStatus::Served,
            ),
        ];

        let report = build_report(&orders, ReportPeriod::Weekly, &now);
        assert_eq!(report.total_orders, 1);
    }

    #[test]
    fn test_top_items_ranked_with_stable_ties() {
        let now = noon();
        let orders = vec![
            order_at(
                1,
                now,
                vec![line("Bagel", 3.0, 2), line("Latte", 4.0, 1), line("Scone", 2.5, 2)],
                OrderStatus::Pending,
            ),
            order_at(
                2,
                now,
                vec![line("Latte", 4.0, 3), line("Muffin", 2.0, 1), line("Tea", 2.0, 1)],
                OrderStatus::Pending,
            ),
            order_at(3, now, vec![line("Juice", 3.0, 1)], OrderStatus::Pending),
        ];

        let report = build_report(&orders, ReportPeriod::All, &now);
        let names: Vec<&str> = report.top_items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Latte", "Bagel", "Scone", "Muffin", "Tea"]);

        let latte = &report.top_items[0];
        assert_eq!(latte.quantity, 4);
        assert_eq!(latte.revenue, 16.0);
    }

    #[test]
    fn test_top_item_quantity_saturates() {
        let now = noon();
        let orders = vec![
            order_at(1, now, vec![line("Latte", 4.0, u32::MAX)], OrderStatus::Served),
            order_at(2, now, vec![line("Latte", 4.0, 2)], OrderStatus::Served),
        ];

        let report = build_report(&orders, ReportPeriod::All, &now);
        assert_eq!(report.top_items.len(), 1);
        assert_eq!(report.top_items[0].quantity, u32::MAX);
    }

    #[test]
    fn test_period_parsing() {
        assert_eq!("Weekly".parse::<ReportPeriod>().unwrap(), ReportPeriod::Weekly);
        assert!(matches!(
            "yearly".parse::<ReportPeriod>(),
            Err(CafeError::InvalidArgument(_))
        ));
    }
}
