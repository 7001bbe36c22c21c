// src/application/usecase/orders_usecase.rs
// Order view model: merge the three order sources into one active list,
// and derive the wallet's filled orders for the current market.

use std::collections::HashMap;

use crate::domain::models::{Order, OrderStatus};

/// Merge backend, on-chain and session-cached orders, deduplicated by id.
///
/// Remote orders insert first, on-chain reads never overwrite an existing
/// entry, and session-cached orders always overwrite: the session cache is
/// the most recent local optimistic view of orders the user just placed or
/// cancelled, which may not yet be reflected server-side. The result is
/// filtered to active orders and sorted by timestamp for display.
pub fn merge_active_orders(
    remote: &[Order],
    onchain: &[Order],
    session_cache: &[Order],
) -> Vec<Order> {
    let mut by_id: HashMap<String, Order> = HashMap::new();

    for order in remote.iter().chain(onchain.iter()) {
        by_id
            .entry(order.id.clone())
            .or_insert_with(|| order.clone());
    }
    for order in session_cache {
        by_id.insert(order.id.clone(), order.clone());
    }

    let mut active: Vec<Order> = by_id
        .into_values()
        .filter(|o| o.status.is_active())
        .collect();
    active.sort_by_key(|o| o.timestamp);
    active
}

/// Filled orders belonging to this wallet on this market only. The triple
/// filter keeps another wallet's or another market's fills out of the view.
/// Address comparison is case-insensitive (mixed-case hex checksums).
pub fn filled_orders_for_market(orders: &[Order], market: &str, trader: &str) -> Vec<Order> {
    orders
        .iter()
        .filter(|o| {
            o.status == OrderStatus::Filled
                && o.market == market
                && o.trader.eq_ignore_ascii_case(trader)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::OrderSide;

    fn order(id: &str, status: OrderStatus) -> Order {
        Order {
            id: id.to_string(),
            market: "ETH-PERP".to_string(),
            side: OrderSide::Long,
            quantity: 1.0,
            filled_quantity: 0.0,
            price: Some(10.0),
            status,
            trader: "0xAbC".to_string(),
            timestamp: 0,
            expiry_time: None,
        }
    }

    #[test]
    fn session_cache_overrides_remote_snapshot() {
        let remote = vec![order("1", OrderStatus::Pending)];
        let session = vec![order("1", OrderStatus::Cancelled)];
        let merged = merge_active_orders(&remote, &[], &session);
        // The session cache marked it cancelled, so it drops out entirely.
        assert!(merged.is_empty());
    }

    #[test]
    fn onchain_orders_do_not_overwrite_remote() {
        let mut remote = order("1", OrderStatus::PartiallyFilled);
        remote.filled_quantity = 0.4;
        let onchain = order("1", OrderStatus::Pending);
        let merged = merge_active_orders(&[remote], &[onchain], &[]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].filled_quantity, 0.4);
        assert_eq!(merged[0].status, OrderStatus::PartiallyFilled);
    }

    #[test]
    fn inactive_orders_are_filtered_out() {
        let remote = vec![
            order("1", OrderStatus::Pending),
            order("2", OrderStatus::Filled),
            order("3", OrderStatus::Expired),
        ];
        let merged = merge_active_orders(&remote, &[], &[]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, "1");
    }

    #[test]
    fn merge_is_sorted_by_timestamp() {
        let mut a = order("a", OrderStatus::Pending);
        a.timestamp = 20;
        let mut b = order("b", OrderStatus::Pending);
        b.timestamp = 10;
        let merged = merge_active_orders(&[a, b], &[], &[]);
        assert_eq!(merged[0].id, "b");
        assert_eq!(merged[1].id, "a");
    }

    #[test]
    fn filled_orders_filter_by_market_and_trader() {
        let mut mine = order("1", OrderStatus::Filled);
        mine.trader = "0xABC".to_string();
        let mut other_wallet = order("2", OrderStatus::Filled);
        other_wallet.trader = "0xDEF".to_string();
        let mut other_market = order("3", OrderStatus::Filled);
        other_market.market = "BTC-PERP".to_string();
        let unfilled = order("4", OrderStatus::Pending);

        let fills = filled_orders_for_market(
            &[mine, other_wallet, other_market, unfilled],
            "ETH-PERP",
            "0xabc",
        );
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].id, "1");
    }
}
