// src/application/usecase/submission_usecase.rs
// Trade submission orchestration: validation, fixed-point sizing, venue
// resolution, the widening-slippage retry ladder for the vAMM venue, and
// the pre-flight checked direct/gasless paths for the order-book venue.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::application::usecase::margin_usecase::margin_bps;
use crate::application::usecase::pricing_usecase::resolve_current_price;
use crate::application::usecase::quote_usecase::{compute_quote, QUOTE_DEPTH_LEVELS};
use crate::domain::errors::{classify_failure, AppResult, FailureClass, VenueError, VenueResult};
use crate::domain::fixed::{
    from_fixed, price_to_fp, units_to_size_fp, usd_to_size_fp, DUST_SIZE_FP, SIZE_DECIMALS,
};
use crate::domain::models::{
    OrderSide, OrderType, PriceContext, QuoteResult, SizeMode, TradeRequest,
};
use crate::domain::repository::{
    ChainOpenRequest, ChainPlaceRequest, ChainVenue, DepthSource, RelayMethod, RelayOrderParams,
    SessionRelay,
};
use crate::domain::service::VenueStrategy;

/// The vAMM venue needs unusually wide bounds; effective tolerance is
/// floored at 99%. Preserved as observed behavior, flagged for review.
pub const VAMM_MIN_SLIPPAGE_BPS: u32 = 9_900;
/// Protocol absolute price range, 6-decimal fixed point.
pub const ABS_MIN_PRICE_FP: i128 = 1;
pub const ABS_MAX_PRICE_FP: i128 = i64::MAX as i128;
/// Rough gas units of one placement transaction, for the advisory check.
const PLACEMENT_GAS_UNITS: u128 = 450_000;
/// Orders below this USD notional are rejected before any chain call.
pub const MIN_ORDER_NOTIONAL_USD: f64 = 10.0;

/// Hard-coded venue fallback table, keyed by market-name substring. Last
/// resort after market metadata and the on-chain directory both miss.
const FALLBACK_VENUES: &[(&str, &str)] = &[
    ("ETH", "0x8c7f2a11de4b4c4b5f3a9e01c2d85d0f5a6b9e42"),
    ("BTC", "0x3d91b07c55e84a2f88a01d6c4f27ab9d310c8f75"),
    ("SOL", "0xa45e11c09f6d42d3b0e2281fcb7a96055d134b9a"),
];

/// Price window for one on-chain attempt, relative to the reference price
/// or the protocol's absolute range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceBounds {
    Relative { lower: f64, upper: f64 },
    Absolute,
}

impl PriceBounds {
    /// Concrete 6-decimal bounds around a reference price.
    pub fn to_fp(&self, price_fp: i128) -> (i128, i128) {
        match *self {
            PriceBounds::Relative { lower, upper } => {
                let min = ((price_fp as f64) * lower) as i128;
                let max = ((price_fp as f64) * upper) as i128;
                (min.max(ABS_MIN_PRICE_FP), max.min(ABS_MAX_PRICE_FP))
            }
            PriceBounds::Absolute => (ABS_MIN_PRICE_FP, ABS_MAX_PRICE_FP),
        }
    }
}

/// The widening ladder, one entry per attempt. Attempt 1 derives from the
/// configured tolerance (floored at `VAMM_MIN_SLIPPAGE_BPS`); later
/// attempts use fixed, progressively wider windows; the fourth is already
/// the absolute range.
pub fn slippage_ladder(slippage_bps: u32) -> [PriceBounds; 4] {
    let tolerance = f64::from(slippage_bps.max(VAMM_MIN_SLIPPAGE_BPS)) / 10_000.0;
    let first = PriceBounds::Relative {
        lower: (1.0 - tolerance).max(0.01),
        upper: if tolerance >= 0.99 {
            100.0
        } else {
            1.0 + tolerance
        },
    };
    [
        first,
        PriceBounds::Relative { lower: 0.01, upper: 100.0 },
        PriceBounds::Relative { lower: 0.001, upper: 1_000.0 },
        PriceBounds::Absolute,
    ]
}

/// One extra attempt at the full protocol range after the ladder is spent.
pub const LAST_RESORT_BOUNDS: PriceBounds = PriceBounds::Absolute;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries beyond the first attempt (3 means 4 ladder attempts).
    pub max_retries: u32,
    /// Backoff between attempts is `base * 2^attempt`.
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base: Duration::from_secs(1),
        }
    }
}

/// Reject anything that must never reach a chain call.
fn validate(req: &TradeRequest, resolved_price: f64) -> VenueResult<()> {
    if req.trader.is_empty() {
        return Err(VenueError::Validation("wallet not connected".into()));
    }
    if !req.amount.is_finite() || req.amount <= 0.0 {
        return Err(VenueError::Validation("amount must be positive".into()));
    }
    if let OrderType::Limit(trigger) = req.order_type {
        if !(trigger > 0.0) {
            return Err(VenueError::Validation(
                "trigger price must be positive".into(),
            ));
        }
    }
    if !(resolved_price > 0.0) {
        return Err(VenueError::Validation(
            "no reference price available".into(),
        ));
    }
    let notional = match req.mode {
        SizeMode::Usd => req.amount,
        SizeMode::Units => req.amount * resolved_price,
    };
    if notional < MIN_ORDER_NOTIONAL_USD {
        return Err(VenueError::Validation(format!(
            "order notional {:.2} below minimum {}",
            notional, MIN_ORDER_NOTIONAL_USD
        )));
    }
    Ok(())
}

/// Convert the entered amount to an 18-decimal on-chain size at the given
/// 6-decimal reference price, rejecting dust.
fn size_for_request(req: &TradeRequest, price_fp: i128) -> VenueResult<i128> {
    let size_fp = match req.mode {
        SizeMode::Units => units_to_size_fp(req.amount),
        SizeMode::Usd => usd_to_size_fp(req.amount, price_fp),
    }
    .ok_or_else(|| VenueError::Validation("order size does not fit fixed point".into()))?;

    if size_fp <= DUST_SIZE_FP {
        return Err(VenueError::Validation(format!(
            "order size {} rounds to dust",
            from_fixed(size_fp, SIZE_DECIMALS)
        )));
    }
    Ok(size_fp)
}

fn fallback_venue(market: &str) -> Option<String> {
    let upper = market.to_uppercase();
    FALLBACK_VENUES
        .iter()
        .find(|(key, _)| upper.contains(key))
        .map(|(_, addr)| (*addr).to_string())
}

/// vAMM venue: position opens with slippage-protection bounds, retried
/// with progressively wider windows on slippage failures.
pub struct VammStrategy {
    chain: Arc<dyn ChainVenue>,
    /// Venue addresses already known from fetched market metadata.
    metadata_venues: HashMap<String, String>,
    retry: RetryPolicy,
}

impl VammStrategy {
    pub fn new(chain: Arc<dyn ChainVenue>, metadata_venues: HashMap<String, String>) -> Self {
        Self {
            chain,
            metadata_venues,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Metadata address, then directory lookup, then the fallback table.
    async fn resolve_venue(&self, market: &str) -> VenueResult<String> {
        if let Some(addr) = self.metadata_venues.get(market) {
            return Ok(addr.clone());
        }
        if let Some(addr) = self.chain.venue_by_market(market).await? {
            return Ok(addr);
        }
        fallback_venue(market).ok_or_else(|| VenueError::UnknownVenue(market.to_string()))
    }

    async fn try_open(
        &self,
        venue: &str,
        req: &TradeRequest,
        size_fp: i128,
        price_fp: i128,
        bounds: PriceBounds,
    ) -> VenueResult<String> {
        let (min_price_fp, max_price_fp) = bounds.to_fp(price_fp);
        self.chain
            .open_position(&ChainOpenRequest {
                venue: venue.to_string(),
                trader: req.trader.clone(),
                side: req.side,
                size_fp,
                leverage: req.leverage.max(1),
                min_price_fp,
                max_price_fp,
            })
            .await
    }
}

#[async_trait]
impl VenueStrategy for VammStrategy {
    fn name(&self) -> &'static str {
        "vamm"
    }

    fn resolve_price(&self, side: OrderSide, order_type: OrderType, ctx: &PriceContext) -> f64 {
        resolve_current_price(side, order_type, ctx)
    }

    async fn compute_quote(
        &self,
        _market: &str,
        side: OrderSide,
        order_type: OrderType,
        amount: f64,
        mode: SizeMode,
        ctx: &PriceContext,
    ) -> AppResult<QuoteResult> {
        // No resting book on a vAMM; the estimate is a single fill at the
        // resolved reference price.
        if !amount.is_finite() || amount <= 0.0 {
            return Ok(QuoteResult::no_liquidity());
        }
        let price = resolve_current_price(side, order_type, ctx);
        let units = match mode {
            SizeMode::Usd => amount / price,
            SizeMode::Units => amount,
        };
        Ok(QuoteResult {
            price,
            units,
            value: units * price,
            partial: false,
            levels_used: 1,
        })
    }

    async fn submit(&self, req: &TradeRequest, ctx: &PriceContext) -> VenueResult<String> {
        let price = self.resolve_price(req.side, req.order_type, ctx);
        validate(req, price)?;

        let price_fp = price_to_fp(price)
            .ok_or_else(|| VenueError::Validation("reference price does not fit".into()))?;
        let size_fp = size_for_request(req, price_fp)?;
        let venue = self.resolve_venue(&req.market).await?;

        let ladder = slippage_ladder(req.slippage_bps);
        let attempts = (self.retry.max_retries as usize + 1).min(ladder.len());
        let mut last_error = String::new();

        for (attempt, bounds) in ladder.iter().take(attempts).enumerate() {
            if attempt > 0 {
                // 2^attempt backoff before each widened retry.
                tokio::time::sleep(self.retry.backoff_base * (1 << attempt)).await;
            }
            log::info!(
                "vamm submit attempt {}/{} for {} ({:?})",
                attempt + 1,
                attempts,
                req.market,
                bounds
            );
            match self.try_open(&venue, req, size_fp, price_fp, *bounds).await {
                Ok(tx_hash) => return Ok(tx_hash),
                Err(err) => {
                    let msg = err.to_string();
                    match classify_failure(&msg) {
                        FailureClass::Slippage => {
                            log::warn!("attempt {} hit price tolerance: {}", attempt + 1, msg);
                            last_error = msg;
                        }
                        FailureClass::UserCancelled => return Err(VenueError::UserCancelled),
                        FailureClass::SessionInvalid => return Err(VenueError::Session(msg)),
                        FailureClass::Other => return Err(err),
                    }
                }
            }
        }

        // The ladder is spent; one last attempt at the full range.
        tokio::time::sleep(self.retry.backoff_base * (1 << attempts)).await;
        log::warn!("all ladder attempts failed, trying maximum price range");
        match self
            .try_open(&venue, req, size_fp, price_fp, LAST_RESORT_BOUNDS)
            .await
        {
            Ok(tx_hash) => Ok(tx_hash),
            Err(err) => {
                let msg = err.to_string();
                match classify_failure(&msg) {
                    FailureClass::UserCancelled => Err(VenueError::UserCancelled),
                    _ => Err(VenueError::Slippage(if msg.is_empty() {
                        last_error
                    } else {
                        msg
                    })),
                }
            }
        }
    }

    async fn cancel(&self, market: &str, _trader: &str, order_id: &str) -> VenueResult<String> {
        let venue = self.resolve_venue(market).await?;
        self.chain.cancel_order(&venue, order_id).await
    }
}

/// Everything the order-book path decides before a transaction is sent.
#[derive(Debug, Clone)]
pub struct PlacementPlan {
    pub venue: String,
    pub size_fp: i128,
    pub price_fp: i128,
    pub is_limit: bool,
}

/// Shared pre-flight for the order-book venue: reference price from the
/// top of the book, integer sizing, dry-run, collateral check, advisory
/// gas check. Both the direct and the gasless path run this first.
async fn preflight_book_order(
    chain: &Arc<dyn ChainVenue>,
    venue: &str,
    req: &TradeRequest,
    ctx: &PriceContext,
) -> VenueResult<PlacementPlan> {
    let resolved = resolve_current_price(req.side, req.order_type, ctx);
    validate(req, resolved)?;

    // Market orders cross the book; the size is computed against the
    // price the trade would actually execute at.
    let reference_fp = match req.side {
        OrderSide::Long => chain.best_ask(venue).await?,
        OrderSide::Short => chain.best_bid(venue).await?,
    };

    let price_fp = match req.order_type {
        OrderType::Limit(trigger) => price_to_fp(trigger)
            .ok_or_else(|| VenueError::Validation("limit price does not fit".into()))?,
        OrderType::Market => {
            if reference_fp <= 0 {
                return Err(VenueError::NoLiquidity(req.side.book_side().to_string()));
            }
            reference_fp
        }
    };

    let size_fp = size_for_request(req, price_fp)?;

    let plan = PlacementPlan {
        venue: venue.to_string(),
        size_fp,
        price_fp,
        is_limit: req.order_type.is_limit(),
    };

    // Dry-run first: a revert here costs nothing.
    chain
        .static_place_check(&ChainPlaceRequest {
            venue: plan.venue.clone(),
            trader: req.trader.clone(),
            side: req.side,
            size_fp: plan.size_fp,
            price_fp: plan.price_fp,
            is_limit: plan.is_limit,
        })
        .await
        .map_err(|e| VenueError::PreflightRevert(e.to_string()))?;

    // Mirror the on-chain collateral check to avoid a guaranteed revert.
    let notional_fp = plan.size_fp.saturating_mul(plan.price_fp) / 10_i128.pow(SIZE_DECIMALS);
    let required_fp = notional_fp.saturating_mul(i128::from(margin_bps(req.side))) / 10_000;
    let available_fp = chain.available_collateral(venue, &req.trader).await?;
    if available_fp < required_fp {
        return Err(VenueError::InsufficientCollateral {
            required: required_fp,
            available: available_fp,
        });
    }

    // Gas check is a convenience, never a hard block.
    match (chain.gas_balance(&req.trader).await, chain.gas_price().await) {
        (Ok(balance), Ok(gas_price)) => {
            let estimated = gas_price.saturating_mul(PLACEMENT_GAS_UNITS);
            if balance < estimated {
                log::warn!(
                    "gas balance {} below estimated cost {}; transaction may fail",
                    balance,
                    estimated
                );
            }
        }
        (Err(e), _) | (_, Err(e)) => {
            log::warn!("gas pre-check unavailable: {}", e);
        }
    }

    Ok(plan)
}

/// Order-book venue, direct on-chain path.
pub struct BookStrategy {
    chain: Arc<dyn ChainVenue>,
    depth: Arc<dyn DepthSource>,
    venue: String,
}

impl BookStrategy {
    pub fn new(chain: Arc<dyn ChainVenue>, depth: Arc<dyn DepthSource>, venue: String) -> Self {
        Self { chain, depth, venue }
    }
}

#[async_trait]
impl VenueStrategy for BookStrategy {
    fn name(&self) -> &'static str {
        "orderbook"
    }

    fn resolve_price(&self, side: OrderSide, order_type: OrderType, ctx: &PriceContext) -> f64 {
        resolve_current_price(side, order_type, ctx)
    }

    async fn compute_quote(
        &self,
        market: &str,
        side: OrderSide,
        order_type: OrderType,
        amount: f64,
        mode: SizeMode,
        ctx: &PriceContext,
    ) -> AppResult<QuoteResult> {
        let snapshot = self
            .depth
            .depth(market, QUOTE_DEPTH_LEVELS)
            .await
            .map_err(crate::domain::errors::AppError::Venue)?;
        Ok(compute_quote(side, order_type, amount, mode, ctx, &snapshot))
    }

    async fn submit(&self, req: &TradeRequest, ctx: &PriceContext) -> VenueResult<String> {
        let plan = preflight_book_order(&self.chain, &self.venue, req, ctx).await?;
        self.chain
            .place_order(&ChainPlaceRequest {
                venue: plan.venue.clone(),
                trader: req.trader.clone(),
                side: req.side,
                size_fp: plan.size_fp,
                price_fp: plan.price_fp,
                is_limit: plan.is_limit,
            })
            .await
            .map_err(map_submit_error)
    }

    async fn cancel(&self, _market: &str, _trader: &str, order_id: &str) -> VenueResult<String> {
        self.chain
            .cancel_order(&self.venue, order_id)
            .await
            .map_err(map_submit_error)
    }
}

fn map_submit_error(err: VenueError) -> VenueError {
    let msg = err.to_string();
    match classify_failure(&msg) {
        FailureClass::UserCancelled => VenueError::UserCancelled,
        FailureClass::Slippage => VenueError::Slippage(msg),
        FailureClass::SessionInvalid => VenueError::Session(msg),
        FailureClass::Other => err,
    }
}

/// Local view of the gasless trading session.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub session_id: String,
    /// Unix seconds.
    pub expires_at: i64,
}

/// Session state shared between the panel and the gasless strategy. The
/// panel sets it when the user enables trading; the strategy clears it
/// when the relay reports the session expired or invalid.
#[derive(Default)]
pub struct SessionStore {
    current: Mutex<Option<SessionInfo>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, info: SessionInfo) {
        *self.current.lock().unwrap() = Some(info);
    }

    pub fn clear(&self) {
        *self.current.lock().unwrap() = None;
    }

    /// The active session, if one exists and has not expired.
    pub fn active(&self) -> Option<SessionInfo> {
        let guard = self.current.lock().unwrap();
        guard
            .as_ref()
            .filter(|s| s.expires_at > Utc::now().timestamp())
            .cloned()
    }
}

/// Order-book venue, gasless relay path: the same pre-flight as the
/// direct path, then submission through the session relay instead of a
/// wallet-signed transaction. The two paths have different trust models
/// and are never silently interchanged.
pub struct GaslessStrategy {
    chain: Arc<dyn ChainVenue>,
    depth: Arc<dyn DepthSource>,
    relay: Arc<dyn SessionRelay>,
    session: Arc<SessionStore>,
    venue: String,
}

impl GaslessStrategy {
    pub fn new(
        chain: Arc<dyn ChainVenue>,
        depth: Arc<dyn DepthSource>,
        relay: Arc<dyn SessionRelay>,
        session: Arc<SessionStore>,
        venue: String,
    ) -> Self {
        Self {
            chain,
            depth,
            relay,
            session,
            venue,
        }
    }

    fn require_session(&self) -> VenueResult<SessionInfo> {
        self.session.active().ok_or(VenueError::SessionRequired)
    }

    /// Session failures invalidate the local session so the panel prompts
    /// the user to re-enable trading instead of retrying blindly.
    fn handle_relay_error(&self, err: VenueError) -> VenueError {
        let mapped = map_submit_error(err);
        if matches!(mapped, VenueError::Session(_)) {
            log::warn!("relay session invalid; clearing local session state");
            self.session.clear();
        }
        mapped
    }
}

#[async_trait]
impl VenueStrategy for GaslessStrategy {
    fn name(&self) -> &'static str {
        "gasless"
    }

    fn resolve_price(&self, side: OrderSide, order_type: OrderType, ctx: &PriceContext) -> f64 {
        resolve_current_price(side, order_type, ctx)
    }

    async fn compute_quote(
        &self,
        market: &str,
        side: OrderSide,
        order_type: OrderType,
        amount: f64,
        mode: SizeMode,
        ctx: &PriceContext,
    ) -> AppResult<QuoteResult> {
        let snapshot = self
            .depth
            .depth(market, QUOTE_DEPTH_LEVELS)
            .await
            .map_err(crate::domain::errors::AppError::Venue)?;
        Ok(compute_quote(side, order_type, amount, mode, ctx, &snapshot))
    }

    async fn submit(&self, req: &TradeRequest, ctx: &PriceContext) -> VenueResult<String> {
        let session = self.require_session()?;
        let plan = preflight_book_order(&self.chain, &self.venue, req, ctx).await?;

        let method = if plan.is_limit {
            RelayMethod::PlaceMarginLimit
        } else {
            RelayMethod::PlaceMarginMarket
        };
        let params = RelayOrderParams {
            side: req.side,
            size_fp: plan.size_fp,
            price_fp: plan.is_limit.then_some(plan.price_fp),
            order_id: None,
        };

        self.relay
            .submit(method, &plan.venue, &session.session_id, &req.trader, &params)
            .await
            .map_err(|e| self.handle_relay_error(e))
    }

    async fn cancel(&self, _market: &str, trader: &str, order_id: &str) -> VenueResult<String> {
        let session = self.require_session()?;
        let params = RelayOrderParams {
            side: OrderSide::Long,
            size_fp: 0,
            price_fp: None,
            order_id: Some(order_id.to_string()),
        };
        self.relay
            .submit(
                RelayMethod::CancelOrder,
                &self.venue,
                &session.session_id,
                trader,
                &params,
            )
            .await
            .map_err(|e| self.handle_relay_error(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_floors_configured_tolerance() {
        let ladder = slippage_ladder(50);
        // 0.5% configured, floored to 99%: lower bound 1% of price, upper
        // widened to 100x. The lower bound comes out of float subtraction,
        // so compare with a tolerance.
        match ladder[0] {
            PriceBounds::Relative { lower, upper } => {
                assert!((lower - 0.01).abs() < 1e-12, "got {lower}");
                assert_eq!(upper, 100.0);
            }
            PriceBounds::Absolute => panic!("first tier must be relative"),
        }
        assert_eq!(
            ladder[1],
            PriceBounds::Relative { lower: 0.01, upper: 100.0 }
        );
        assert_eq!(
            ladder[2],
            PriceBounds::Relative { lower: 0.001, upper: 1_000.0 }
        );
        assert_eq!(ladder[3], PriceBounds::Absolute);
    }

    #[test]
    fn bounds_convert_to_fixed_point() {
        let price_fp = 10_000_000; // $10
        let (min, max) = PriceBounds::Relative { lower: 0.01, upper: 100.0 }.to_fp(price_fp);
        assert_eq!(min, 100_000);
        assert_eq!(max, 1_000_000_000);
        let (min, max) = PriceBounds::Absolute.to_fp(price_fp);
        assert_eq!(min, ABS_MIN_PRICE_FP);
        assert_eq!(max, ABS_MAX_PRICE_FP);
    }

    #[test]
    fn fallback_table_matches_by_substring() {
        assert!(fallback_venue("ETH-PERP").is_some());
        assert!(fallback_venue("wbtc-perp").is_some());
        assert_eq!(fallback_venue("DOGE-PERP"), None);
    }

    #[test]
    fn validation_rejects_bad_requests() {
        let mut req = TradeRequest {
            market: "ETH-PERP".into(),
            trader: "0xabc".into(),
            side: OrderSide::Long,
            order_type: OrderType::Market,
            amount: 10.0,
            mode: SizeMode::Units,
            slippage_bps: 100,
            leverage: 1,
        };
        assert!(validate(&req, 10.0).is_ok());

        req.amount = 0.0;
        assert!(matches!(
            validate(&req, 10.0),
            Err(VenueError::Validation(_))
        ));

        req.amount = 10.0;
        req.order_type = OrderType::Limit(0.0);
        assert!(matches!(
            validate(&req, 10.0),
            Err(VenueError::Validation(_))
        ));

        req.order_type = OrderType::Market;
        req.trader = String::new();
        assert!(matches!(
            validate(&req, 10.0),
            Err(VenueError::Validation(_))
        ));

        req.trader = "0xabc".into();
        assert!(matches!(
            validate(&req, 0.0),
            Err(VenueError::Validation(_))
        ));
    }

    #[test]
    fn below_minimum_notional_is_rejected() {
        let req = TradeRequest {
            market: "ETH-PERP".into(),
            trader: "0xabc".into(),
            side: OrderSide::Long,
            order_type: OrderType::Market,
            amount: 0.5,
            mode: SizeMode::Units,
            slippage_bps: 100,
            leverage: 1,
        };
        // 0.5 units at $10 is a $5 order.
        assert!(matches!(
            validate(&req, 10.0),
            Err(VenueError::Validation(_))
        ));
        // The same notional entered directly in USD mode.
        let usd = TradeRequest {
            amount: 5.0,
            mode: SizeMode::Usd,
            ..req
        };
        assert!(matches!(
            validate(&usd, 10.0),
            Err(VenueError::Validation(_))
        ));
    }

    #[test]
    fn dust_sizes_are_rejected() {
        let req = TradeRequest {
            market: "ETH-PERP".into(),
            trader: "0xabc".into(),
            side: OrderSide::Long,
            order_type: OrderType::Market,
            amount: 1e-16,
            mode: SizeMode::Units,
            slippage_bps: 100,
            leverage: 1,
        };
        assert!(matches!(
            size_for_request(&req, 10_000_000),
            Err(VenueError::Validation(_))
        ));
    }

    #[test]
    fn session_store_expiry() {
        let store = SessionStore::new();
        assert!(store.active().is_none());
        store.set(SessionInfo {
            session_id: "s1".into(),
            expires_at: Utc::now().timestamp() + 600,
        });
        assert!(store.active().is_some());
        store.set(SessionInfo {
            session_id: "s2".into(),
            expires_at: Utc::now().timestamp() - 1,
        });
        assert!(store.active().is_none());
        store.clear();
        assert!(store.active().is_none());
    }
}
