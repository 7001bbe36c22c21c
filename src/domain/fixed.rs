// src/domain/fixed.rs
// Fixed-point (on-chain) encoding helpers. Sizes are 18-decimal integers,
// USD prices are 6-decimal integers. All conversions go through
// rust_decimal so the final on-chain amount is never produced by
// floating-point division.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// Decimal places of on-chain order sizes.
pub const SIZE_DECIMALS: u32 = 18;
/// Decimal places of on-chain USD prices (USDC convention).
pub const PRICE_DECIMALS: u32 = 6;
/// Sizes at or below this many 18-decimal units are treated as rounding
/// dust and rejected before any chain call.
pub const DUST_SIZE_FP: i128 = 1_000;

const SIZE_SCALE: i128 = 1_000_000_000_000_000_000;

/// Encode a non-negative decimal value as an integer scaled to `decimals`
/// places. Returns `None` for negative, non-finite or out-of-range input.
pub fn to_fixed(value: f64, decimals: u32) -> Option<i128> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let mut d = Decimal::from_f64(value)?;
    d.rescale(decimals);
    // rescale saturates instead of failing when the mantissa runs out of
    // headroom; a mismatched scale means the value did not fit.
    if d.scale() != decimals {
        return None;
    }
    Some(d.mantissa())
}

/// Decode a fixed-point integer back to a display value.
pub fn from_fixed(value: i128, decimals: u32) -> f64 {
    Decimal::try_from_i128_with_scale(value, decimals)
        .ok()
        .and_then(|d| d.to_f64())
        .unwrap_or(0.0)
}

/// Convert a unit quantity to an 18-decimal on-chain size.
pub fn units_to_size_fp(units: f64) -> Option<i128> {
    to_fixed(units, SIZE_DECIMALS)
}

/// Convert a USD notional to an 18-decimal size at a 6-decimal reference
/// price, using integer scaling only: `size = usd_fp * 1e18 / price_fp`.
pub fn usd_to_size_fp(usd: f64, price_fp: i128) -> Option<i128> {
    if price_fp <= 0 {
        return None;
    }
    let usd_fp = to_fixed(usd, PRICE_DECIMALS)?;
    usd_fp.checked_mul(SIZE_SCALE).map(|n| n / price_fp)
}

/// Encode a display price at the 6-decimal USD scale.
pub fn price_to_fp(price: f64) -> Option<i128> {
    to_fixed(price, PRICE_DECIMALS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_round_trip_preserves_units() {
        let units = 12.345678901234_f64;
        let fp = units_to_size_fp(units).unwrap();
        let back = from_fixed(fp, SIZE_DECIMALS);
        assert!((back - units).abs() < 1e-12, "got {back}");
    }

    #[test]
    fn usd_conversion_uses_integer_scaling() {
        // $250 at $10.000000 -> exactly 25 units in 18-dec fixed point.
        let price_fp = price_to_fp(10.0).unwrap();
        assert_eq!(price_fp, 10_000_000);
        let size = usd_to_size_fp(250.0, price_fp).unwrap();
        assert_eq!(size, 25 * SIZE_SCALE);
    }

    #[test]
    fn rejects_negative_and_non_finite() {
        assert_eq!(to_fixed(-1.0, SIZE_DECIMALS), None);
        assert_eq!(to_fixed(f64::NAN, SIZE_DECIMALS), None);
        assert_eq!(to_fixed(f64::INFINITY, SIZE_DECIMALS), None);
        assert_eq!(usd_to_size_fp(100.0, 0), None);
    }

    #[test]
    fn price_encoding_matches_usdc_convention() {
        // 1.5 USDC at 6 decimals = 1_500_000.
        assert_eq!(price_to_fp(1.5), Some(1_500_000));
    }
}
