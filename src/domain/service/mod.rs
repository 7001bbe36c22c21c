// src/domain/service/mod.rs
// Domain service interfaces

use async_trait::async_trait;

use crate::domain::errors::{AppResult, VenueResult};
use crate::domain::models::{
    OrderSide, OrderType, PriceContext, QuoteResult, SizeMode, TradeRequest,
};

/// One trading venue variant (vAMM, order book, gasless relay) behind a
/// single dispatch seam. The panel talks to whichever strategy the market
/// and session state select; the variants are interchangeable.
#[async_trait]
pub trait VenueStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Pick the reference price for validation and default quoting from
    /// the latest cached source values. Pure; recomputed on every call.
    fn resolve_price(&self, side: OrderSide, order_type: OrderType, ctx: &PriceContext) -> f64;

    /// Estimate the fill for the entered amount.
    async fn compute_quote(
        &self,
        market: &str,
        side: OrderSide,
        order_type: OrderType,
        amount: f64,
        mode: SizeMode,
        ctx: &PriceContext,
    ) -> AppResult<QuoteResult>;

    /// Place the order; returns the transaction hash (or backend order id
    /// reference) on success.
    async fn submit(&self, req: &TradeRequest, ctx: &PriceContext) -> VenueResult<String>;

    /// Cancel an order owned by `trader`; returns the transaction hash.
    async fn cancel(&self, market: &str, trader: &str, order_id: &str) -> VenueResult<String>;
}
