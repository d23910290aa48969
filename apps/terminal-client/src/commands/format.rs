//! Listing formatters for the reporting commands.
//!
//! Fixed-width columns, one header row, rows in the order the table
//! returns them (oldest first). Formatting is pure string building so the
//! reporting commands stay trivially testable.

use crate::models::{AnomalyRecord, Fill, Order};

const TIME_FORMAT: &str = "%H:%M:%S%.3f";

/// Format the open-orders listing.
#[must_use]
pub fn format_orders(orders: &[Order]) -> String {
    if orders.is_empty() {
        return "No open orders.".to_string();
    }

    let mut lines = vec![format!(
        "{:<15}  {:<10}  {:<4}  {:>9}  {:>12}  {:<16}  {:>9}",
        "ORDER ID", "INSTRUMENT", "SIDE", "QUANTITY", "PRICE", "STATUS", "FILLED"
    )];
    for order in orders {
        let side = order.side.to_string();
        let price = order.price.to_string();
        let status = order.status.to_string();
        lines.push(format!(
            "{:<15}  {:<10}  {:<4}  {:>9}  {:>12}  {:<16}  {:>9}",
            order.client_order_id.as_str(),
            order.instrument.as_str(),
            side,
            order.quantity,
            price,
            status,
            order.filled_quantity
        ));
    }
    lines.join("\n")
}

/// Format the trade-history listing.
#[must_use]
pub fn format_trades(fills: &[Fill]) -> String {
    if fills.is_empty() {
        return "No trades.".to_string();
    }

    let mut lines = vec![format!(
        "{:<12}  {:<15}  {:<10}  {:<4}  {:>9}  {:>12}",
        "TIME", "ORDER ID", "INSTRUMENT", "SIDE", "QUANTITY", "PRICE"
    )];
    for fill in fills {
        let time = fill.executed_at.format(TIME_FORMAT).to_string();
        let side = fill.side.to_string();
        let price = fill.price.to_string();
        lines.push(format!(
            "{:<12}  {:<15}  {:<10}  {:<4}  {:>9}  {:>12}",
            time,
            fill.client_order_id.as_str(),
            fill.instrument.as_str(),
            side,
            fill.quantity,
            price
        ));
    }
    lines.join("\n")
}

/// Format the errors listing: venue rejects followed by protocol anomalies.
#[must_use]
pub fn format_errors(rejected: &[Order], anomalies: &[AnomalyRecord]) -> String {
    if rejected.is_empty() && anomalies.is_empty() {
        return "No errors.".to_string();
    }

    let mut lines = Vec::new();

    if !rejected.is_empty() {
        lines.push("Rejected orders:".to_string());
        for order in rejected {
            lines.push(format!(
                "  {:<15}  {:<10}  {}",
                order.client_order_id.as_str(),
                order.instrument.as_str(),
                order.reject_reason.as_deref().unwrap_or("(no reason)")
            ));
        }
    }

    if !anomalies.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("Protocol anomalies:".to_string());
        for anomaly in anomalies {
            let time = anomaly.occurred_at.format(TIME_FORMAT).to_string();
            let kind = anomaly.kind.to_string();
            lines.push(format!(
                "  {:<12}  {:<15}  {:<16}  {}",
                time,
                anomaly.client_order_id.as_str(),
                kind,
                anomaly.detail
            ));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnomalyKind, ClientOrderId, InstrumentId, OrderSide};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn make_order(id: &str) -> Order {
        Order::new(
            ClientOrderId::new(id),
            InstrumentId::new("FOO"),
            OrderSide::Buy,
            100,
            Decimal::new(1050, 2),
        )
    }

    #[test]
    fn empty_listings_say_so() {
        assert_eq!(format_orders(&[]), "No open orders.");
        assert_eq!(format_trades(&[]), "No trades.");
        assert_eq!(format_errors(&[], &[]), "No errors.");
    }

    #[test]
    fn orders_listing_has_header_and_rows() {
        let listing = format_orders(&[make_order("093015-000001"), make_order("093015-000002")]);
        let lines: Vec<&str> = listing.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ORDER ID"));
        assert!(lines[1].contains("093015-000001"));
        assert!(lines[1].contains("PENDING"));
        assert!(lines[1].contains("10.50"));
        assert!(lines[2].contains("093015-000002"));
    }

    #[test]
    fn trades_listing_shows_each_fill() {
        let fill = Fill {
            client_order_id: ClientOrderId::new("093015-000001"),
            instrument: InstrumentId::new("FOO"),
            side: OrderSide::Sell,
            quantity: 40,
            price: Decimal::new(1050, 2),
            executed_at: Utc::now(),
        };

        let listing = format_trades(&[fill]);
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("TIME"));
        assert!(lines[1].contains("SELL"));
        assert!(lines[1].contains("40"));
    }

    #[test]
    fn errors_listing_shows_rejects_and_anomalies() {
        let mut rejected = make_order("093015-000001");
        rejected.reject_reason = Some("unknown instrument".to_string());

        let anomaly = AnomalyRecord {
            occurred_at: Utc::now(),
            client_order_id: ClientOrderId::new("093015-000002"),
            kind: AnomalyKind::OverFill,
            detail: "fill of 60 exceeds remaining quantity 40".to_string(),
        };

        let listing = format_errors(&[rejected], &[anomaly]);
        assert!(listing.contains("Rejected orders:"));
        assert!(listing.contains("unknown instrument"));
        assert!(listing.contains("Protocol anomalies:"));
        assert!(listing.contains("OVER_FILL"));
    }

    #[test]
    fn errors_listing_with_only_anomalies_skips_reject_section() {
        let anomaly = AnomalyRecord {
            occurred_at: Utc::now(),
            client_order_id: ClientOrderId::new("ghost"),
            kind: AnomalyKind::Orphan,
            detail: "accepted event for unknown order".to_string(),
        };

        let listing = format_errors(&[], &[anomaly]);
        assert!(!listing.contains("Rejected orders:"));
        assert!(listing.contains("Protocol anomalies:"));
    }
}
