// src/application/usecase/quote_usecase.rs
// Depth-aware fill estimation for market orders, plus the reactive
// engine that keeps the latest quote current without letting a stale
// depth fetch overwrite a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::application::usecase::pricing_usecase::resolve_current_price;
use crate::domain::errors::AppResult;
use crate::domain::models::{
    DepthLevel, DepthSnapshot, OrderSide, OrderType, PriceContext, QuoteResult, SizeMode,
};
use crate::domain::repository::DepthSource;

/// Depth levels requested per quote refresh.
pub const QUOTE_DEPTH_LEVELS: usize = 50;

/// Estimate the fill for the entered amount against a depth snapshot.
///
/// Limit orders are deterministic: the trigger price (or the resolved
/// reference price when unset) fills the whole amount at one level.
/// Market orders walk the relevant side of the book best-price-first,
/// consuming whole levels until the remaining target fits inside one,
/// and flag `partial` when visible depth runs out.
pub fn compute_quote(
    side: OrderSide,
    order_type: OrderType,
    amount: f64,
    mode: SizeMode,
    ctx: &PriceContext,
    depth: &DepthSnapshot,
) -> QuoteResult {
    if !amount.is_finite() || amount <= 0.0 {
        return QuoteResult::no_liquidity();
    }

    if order_type.is_limit() {
        let price = match order_type.trigger_price().filter(|p| *p > 0.0) {
            Some(trigger) => trigger,
            None => resolve_current_price(side, order_type, ctx),
        };
        let units = match mode {
            SizeMode::Usd => amount / price,
            SizeMode::Units => amount,
        };
        return QuoteResult {
            price,
            units,
            value: units * price,
            partial: false,
            levels_used: 1,
        };
    }

    // A buyer walks up the ask ladder; a seller walks down the bid ladder.
    let mut levels: Vec<DepthLevel> = match side {
        OrderSide::Long => &depth.asks,
        OrderSide::Short => &depth.bids,
    }
    .iter()
    .copied()
    .filter(|l| l.price > 0.0 && l.size > 0.0)
    .collect();

    if levels.is_empty() {
        return QuoteResult::no_liquidity();
    }

    // Best price first makes greedy consumption correct.
    match side {
        OrderSide::Long => levels.sort_by(|a, b| a.price.total_cmp(&b.price)),
        OrderSide::Short => levels.sort_by(|a, b| b.price.total_cmp(&a.price)),
    }

    // Remaining target is a notional in USD mode, a unit count otherwise.
    let mut remaining = amount;
    let mut total_units = 0.0;
    let mut total_cost = 0.0;
    let mut levels_used = 0;

    for level in &levels {
        let capacity = match mode {
            SizeMode::Usd => level.price * level.size,
            SizeMode::Units => level.size,
        };

        if capacity >= remaining {
            let units = match mode {
                SizeMode::Usd => remaining / level.price,
                SizeMode::Units => remaining,
            };
            total_units += units;
            total_cost += units * level.price;
            levels_used += 1;
            remaining = 0.0;
            break;
        }

        total_units += level.size;
        total_cost += level.size * level.price;
        levels_used += 1;
        remaining -= capacity;
    }

    let price = if total_units > 0.0 {
        total_cost / total_units
    } else {
        0.0
    };

    QuoteResult {
        price,
        units: total_units,
        value: total_cost,
        partial: remaining > 0.0,
        levels_used,
    }
}

/// Reactive quote holder. Each `refresh` supersedes any in-flight one: if
/// the depth fetch of an older refresh resolves after a newer refresh
/// began, its result is discarded instead of applied, so a slow stale
/// quote can never overwrite a newer one.
pub struct QuoteEngine {
    depth_source: Arc<dyn DepthSource>,
    generation: AtomicU64,
    latest: Mutex<Option<QuoteResult>>,
    depth_levels: usize,
}

impl QuoteEngine {
    pub fn new(depth_source: Arc<dyn DepthSource>) -> Self {
        Self {
            depth_source,
            generation: AtomicU64::new(0),
            latest: Mutex::new(None),
            depth_levels: QUOTE_DEPTH_LEVELS,
        }
    }

    /// Last quote that survived supersession, if any.
    pub fn latest(&self) -> Option<QuoteResult> {
        *self.latest.lock().unwrap()
    }

    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.latest.lock().unwrap() = None;
    }

    /// Fetch depth and recompute. Returns `Ok(None)` when this refresh was
    /// superseded by a newer one while its depth fetch was in flight.
    pub async fn refresh(
        &self,
        market: &str,
        side: OrderSide,
        order_type: OrderType,
        amount: f64,
        mode: SizeMode,
        ctx: &PriceContext,
    ) -> AppResult<Option<QuoteResult>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let snapshot = self
            .depth_source
            .depth(market, self.depth_levels)
            .await
            .map_err(crate::domain::errors::AppError::Venue)?;

        if self.generation.load(Ordering::SeqCst) != generation {
            log::debug!("quote refresh superseded for {}", market);
            return Ok(None);
        }

        let quote = compute_quote(side, order_type, amount, mode, ctx, &snapshot);

        let mut latest = self.latest.lock().unwrap();
        if self.generation.load(Ordering::SeqCst) != generation {
            return Ok(None);
        }
        *latest = Some(quote);
        Ok(Some(quote))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> DepthSnapshot {
        DepthSnapshot {
            asks: vec![
                DepthLevel { price: 10.0, size: 5.0 },
                DepthLevel { price: 11.0, size: 10.0 },
            ],
            bids: vec![
                DepthLevel { price: 9.0, size: 4.0 },
                DepthLevel { price: 8.0, size: 6.0 },
            ],
        }
    }

    fn quote_units(side: OrderSide, amount: f64) -> QuoteResult {
        compute_quote(
            side,
            OrderType::Market,
            amount,
            SizeMode::Units,
            &PriceContext::default(),
            &book(),
        )
    }

    #[test]
    fn market_buy_with_deep_book() {
        let q = quote_units(OrderSide::Long, 8.0);
        assert_eq!(q.units, 8.0);
        assert_eq!(q.value, 5.0 * 10.0 + 3.0 * 11.0);
        assert!((q.price - 83.0 / 8.0).abs() < 1e-12);
        assert!(!q.partial);
        assert_eq!(q.levels_used, 2);
    }

    #[test]
    fn market_buy_with_insufficient_depth() {
        let q = quote_units(OrderSide::Long, 20.0);
        assert_eq!(q.units, 15.0);
        assert_eq!(q.value, 5.0 * 10.0 + 10.0 * 11.0);
        assert!((q.price - 160.0 / 15.0).abs() < 1e-12);
        assert!(q.partial);
        assert_eq!(q.levels_used, 2);
    }

    #[test]
    fn market_sell_walks_down_the_bids() {
        let q = quote_units(OrderSide::Short, 6.0);
        assert_eq!(q.units, 6.0);
        assert_eq!(q.value, 4.0 * 9.0 + 2.0 * 8.0);
        assert_eq!(q.levels_used, 2);
        assert!(!q.partial);
    }

    #[test]
    fn usd_mode_consumes_notional() {
        // $50 buys exactly the first ask level.
        let q = compute_quote(
            OrderSide::Long,
            OrderType::Market,
            50.0,
            SizeMode::Usd,
            &PriceContext::default(),
            &book(),
        );
        assert_eq!(q.units, 5.0);
        assert_eq!(q.value, 50.0);
        assert_eq!(q.levels_used, 1);
        assert!(!q.partial);
    }

    #[test]
    fn empty_side_short_circuits() {
        let empty = DepthSnapshot::default();
        let q = compute_quote(
            OrderSide::Long,
            OrderType::Market,
            5.0,
            SizeMode::Units,
            &PriceContext::default(),
            &empty,
        );
        assert_eq!(q, QuoteResult::no_liquidity());
        assert!(!q.partial);
    }

    #[test]
    fn invalid_levels_are_skipped() {
        let dirty = DepthSnapshot {
            asks: vec![
                DepthLevel { price: 0.0, size: 100.0 },
                DepthLevel { price: 10.0, size: 0.0 },
                DepthLevel { price: 10.0, size: 2.0 },
            ],
            bids: vec![],
        };
        let q = compute_quote(
            OrderSide::Long,
            OrderType::Market,
            1.0,
            SizeMode::Units,
            &PriceContext::default(),
            &dirty,
        );
        assert_eq!(q.units, 1.0);
        assert_eq!(q.price, 10.0);
        assert_eq!(q.levels_used, 1);
    }

    #[test]
    fn buy_quote_is_monotone_in_amount() {
        let small = quote_units(OrderSide::Long, 2.0);
        let large = quote_units(OrderSide::Long, 12.0);
        assert!(large.levels_used >= small.levels_used);
        assert!(large.price >= small.price);
        // Conservation: value matches units * average price.
        assert!((large.value - large.units * large.price).abs() < 1e-9);
    }

    #[test]
    fn limit_quote_is_deterministic() {
        let q = compute_quote(
            OrderSide::Long,
            OrderType::Limit(4.0),
            20.0,
            SizeMode::Usd,
            &PriceContext::default(),
            &book(),
        );
        assert_eq!(q.price, 4.0);
        assert_eq!(q.units, 5.0);
        assert_eq!(q.value, 20.0);
        assert_eq!(q.levels_used, 1);
        assert!(!q.partial);
    }

    #[test]
    fn non_positive_amount_yields_no_quote() {
        assert_eq!(quote_units(OrderSide::Long, 0.0), QuoteResult::no_liquidity());
        assert_eq!(quote_units(OrderSide::Long, -3.0), QuoteResult::no_liquidity());
    }
}
