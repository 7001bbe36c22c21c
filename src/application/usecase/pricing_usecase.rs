// src/application/usecase/pricing_usecase.rs
// Reference price resolution across independently refreshing sources.

use crate::domain::models::{OrderSide, OrderType, PriceContext};

/// Fallback price when every source is empty. Keeps downstream math
/// defined instead of propagating NaN/Infinity.
pub const DEFAULT_PRICE: f64 = 1.0;

/// Resolve a single current price for validation and default quoting.
///
/// First source with a positive value wins:
/// 1. the user's limit trigger price,
/// 2. the side of the book the trade would actually cross at,
/// 3. mid of best bid/ask,
/// 4. live mark price from the book state feed,
/// 5. externally supplied market data price,
/// 6. tick size, then legacy last-known price,
/// 7. `DEFAULT_PRICE`.
///
/// Pure and side-effect-free. Callers must re-invoke it whenever any
/// source refreshes; the result is never cached.
pub fn resolve_current_price(side: OrderSide, order_type: OrderType, ctx: &PriceContext) -> f64 {
    if let Some(trigger) = order_type.trigger_price() {
        if trigger > 0.0 {
            return trigger;
        }
    }

    let crossing = match side {
        OrderSide::Long => ctx.best_ask,
        OrderSide::Short => ctx.best_bid,
    };
    if let Some(price) = positive(crossing) {
        return price;
    }

    if let (Some(bid), Some(ask)) = (positive(ctx.best_bid), positive(ctx.best_ask)) {
        return (bid + ask) / 2.0;
    }

    for source in [ctx.mark_price, ctx.market_price, ctx.tick_size, ctx.last_price] {
        if let Some(price) = positive(source) {
            return price;
        }
    }

    DEFAULT_PRICE
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_context() -> PriceContext {
        PriceContext {
            best_bid: Some(9.0),
            best_ask: Some(11.0),
            mark_price: Some(10.5),
            market_price: Some(10.2),
            last_price: Some(8.0),
            tick_size: Some(0.01),
        }
    }

    #[test]
    fn limit_trigger_price_is_authoritative() {
        let price = resolve_current_price(OrderSide::Long, OrderType::Limit(5.0), &full_context());
        assert_eq!(price, 5.0);
    }

    #[test]
    fn market_order_crosses_the_relevant_side() {
        let ctx = full_context();
        assert_eq!(
            resolve_current_price(OrderSide::Long, OrderType::Market, &ctx),
            11.0
        );
        assert_eq!(
            resolve_current_price(OrderSide::Short, OrderType::Market, &ctx),
            9.0
        );
    }

    #[test]
    fn mid_price_when_crossing_side_is_missing() {
        // A long with no ask cannot use tier 2, and the mid needs both
        // sides, so the mark price is next in line.
        let ctx = PriceContext {
            best_ask: None,
            ..full_context()
        };
        assert_eq!(
            resolve_current_price(OrderSide::Long, OrderType::Market, &ctx),
            10.5
        );
        // A short still crosses at the bid.
        assert_eq!(
            resolve_current_price(OrderSide::Short, OrderType::Market, &ctx),
            9.0
        );
    }

    #[test]
    fn falls_back_through_mark_and_market_price() {
        let ctx = PriceContext {
            best_bid: None,
            best_ask: None,
            mark_price: Some(10.5),
            market_price: Some(10.2),
            last_price: None,
            tick_size: None,
        };
        assert_eq!(
            resolve_current_price(OrderSide::Long, OrderType::Market, &ctx),
            10.5
        );

        let ctx = PriceContext {
            mark_price: None,
            ..ctx
        };
        assert_eq!(
            resolve_current_price(OrderSide::Long, OrderType::Market, &ctx),
            10.2
        );
    }

    #[test]
    fn defaults_to_one_when_everything_is_empty() {
        let ctx = PriceContext::default();
        assert_eq!(
            resolve_current_price(OrderSide::Long, OrderType::Market, &ctx),
            DEFAULT_PRICE
        );
    }

    #[test]
    fn zero_trigger_price_is_skipped() {
        let price = resolve_current_price(OrderSide::Long, OrderType::Limit(0.0), &full_context());
        assert_eq!(price, 11.0);
    }
}
