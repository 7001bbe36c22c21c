// src/application/usecase/margin_usecase.rs
// Display-only margin and liquidation estimates. The authoritative
// collateral check is the vault read performed before submission.

use crate::domain::models::OrderSide;

/// Default collateral ratio backing a short position.
pub const DEFAULT_COLLATERAL_RATIO: f64 = 1.5;
/// Default maintenance margin ratio.
pub const DEFAULT_MAINTENANCE_MARGIN_RATIO: f64 = 0.2;
/// Shorts are modeled as requiring 150% margin.
pub const SHORT_MARGIN_MULTIPLIER: f64 = 1.5;
/// Longs are modeled as fully collateralized.
pub const LONG_MARGIN_MULTIPLIER: f64 = 1.0;
/// Short margin requirement in basis points for the pre-trade collateral
/// check; overrides any venue default.
pub const SHORT_MARGIN_BPS: u32 = 15_000;
pub const LONG_MARGIN_BPS: u32 = 10_000;

#[derive(Debug, Clone, Copy)]
pub struct LiquidationParams {
    pub side: OrderSide,
    pub entry_price: f64,
    pub collateral_ratio: f64,
    pub maintenance_margin_ratio: f64,
}

impl LiquidationParams {
    pub fn new(side: OrderSide, entry_price: f64) -> Self {
        Self {
            side,
            entry_price,
            collateral_ratio: DEFAULT_COLLATERAL_RATIO,
            maintenance_margin_ratio: DEFAULT_MAINTENANCE_MARGIN_RATIO,
        }
    }
}

/// Estimated liquidation price for display.
///
/// Only defined for shorts in this model:
/// `((collateral_ratio + 1) * entry) / (1 + maintenance_margin_ratio)`.
/// Longs are treated as fully collateralized and return `None`. That is a
/// known modeling assumption (it disagrees with the margin multiplier
/// treating longs as leverage-eligible) and is preserved as observed.
pub fn estimate_liquidation(params: &LiquidationParams) -> Option<f64> {
    if params.entry_price <= 0.0 {
        return None;
    }
    match params.side {
        OrderSide::Long => None,
        OrderSide::Short => Some(
            ((params.collateral_ratio + 1.0) * params.entry_price)
                / (1.0 + params.maintenance_margin_ratio),
        ),
    }
}

/// Advisory margin required to place an order of the given notional.
pub fn required_margin(side: OrderSide, notional: f64) -> f64 {
    notional * margin_multiplier(side)
}

pub fn margin_multiplier(side: OrderSide) -> f64 {
    match side {
        OrderSide::Long => LONG_MARGIN_MULTIPLIER,
        OrderSide::Short => SHORT_MARGIN_MULTIPLIER,
    }
}

/// Margin requirement in basis points, as used by the fixed-point
/// pre-trade collateral check: `notional * bps / 10_000`.
pub fn margin_bps(side: OrderSide) -> u32 {
    match side {
        OrderSide::Long => LONG_MARGIN_BPS,
        OrderSide::Short => SHORT_MARGIN_BPS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_liquidation_estimate() {
        let params = LiquidationParams::new(OrderSide::Short, 100.0);
        let liq = estimate_liquidation(&params).unwrap();
        assert!((liq - 250.0 / 1.2).abs() < 1e-9, "got {liq}");
    }

    #[test]
    fn long_liquidation_is_not_applicable() {
        let params = LiquidationParams::new(OrderSide::Long, 100.0);
        assert_eq!(estimate_liquidation(&params), None);
    }

    #[test]
    fn zero_entry_price_has_no_estimate() {
        let params = LiquidationParams::new(OrderSide::Short, 0.0);
        assert_eq!(estimate_liquidation(&params), None);
    }

    #[test]
    fn margin_multipliers_by_side() {
        assert_eq!(required_margin(OrderSide::Long, 200.0), 200.0);
        assert_eq!(required_margin(OrderSide::Short, 200.0), 300.0);
        assert_eq!(margin_bps(OrderSide::Short), 15_000);
    }
}
