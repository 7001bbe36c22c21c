// src/domain/repository/mod.rs
// Ports onto the external collaborators: chain venues, the order backend
// and the gasless session relay. Everything behind these traits is owned
// elsewhere (contracts, matching backend, relay service).

use async_trait::async_trait;

use crate::domain::errors::{BackendResult, VenueResult};
use crate::domain::models::{DepthSnapshot, Order, OrderSide};

/// On-chain order placement call, fixed-point encoded.
#[derive(Debug, Clone)]
pub struct ChainPlaceRequest {
    pub venue: String,
    pub trader: String,
    pub side: OrderSide,
    /// 18-decimal size.
    pub size_fp: i128,
    /// 6-decimal limit price; for market placements this is the reference
    /// price the size was computed against.
    pub price_fp: i128,
    pub is_limit: bool,
}

/// VAMM position-open call with slippage protection bounds.
#[derive(Debug, Clone)]
pub struct ChainOpenRequest {
    pub venue: String,
    pub trader: String,
    pub side: OrderSide,
    /// 18-decimal size.
    pub size_fp: i128,
    pub leverage: u32,
    /// 6-decimal acceptable price window.
    pub min_price_fp: i128,
    pub max_price_fp: i128,
}

/// Read/write surface of the on-chain contracts (order books, vaults,
/// vAMMs) as exposed through a wallet-injected provider.
#[async_trait]
pub trait ChainVenue: Send + Sync {
    /// Best bid in 6-decimal fixed point; 0 when the side is empty.
    async fn best_bid(&self, venue: &str) -> VenueResult<i128>;
    /// Best ask in 6-decimal fixed point; 0 when the side is empty.
    async fn best_ask(&self, venue: &str) -> VenueResult<i128>;
    /// Free collateral in the vault, 6-decimal fixed point.
    async fn available_collateral(&self, venue: &str, trader: &str) -> VenueResult<i128>;
    /// Dry-run of a placement; Err carries the revert reason.
    async fn static_place_check(&self, req: &ChainPlaceRequest) -> VenueResult<()>;
    /// Real placement; returns the transaction hash.
    async fn place_order(&self, req: &ChainPlaceRequest) -> VenueResult<String>;
    /// VAMM position open; returns the transaction hash.
    async fn open_position(&self, req: &ChainOpenRequest) -> VenueResult<String>;
    /// Direct on-chain cancel; returns the transaction hash.
    async fn cancel_order(&self, venue: &str, order_id: &str) -> VenueResult<String>;
    /// Orders the venue currently holds for this trader.
    async fn active_orders(&self, venue: &str, trader: &str) -> VenueResult<Vec<Order>>;
    /// Native gas currency balance in wei.
    async fn gas_balance(&self, trader: &str) -> VenueResult<u128>;
    /// Current gas price in wei.
    async fn gas_price(&self) -> VenueResult<u128>;
    /// Directory/factory lookup of the venue contract for a market.
    async fn venue_by_market(&self, market: &str) -> VenueResult<Option<String>>;
}

/// Order book depth query.
#[async_trait]
pub trait DepthSource: Send + Sync {
    async fn depth(&self, market: &str, levels: usize) -> VenueResult<DepthSnapshot>;
}

/// Signed order as the backend matching API accepts it.
#[derive(Debug, Clone)]
pub struct SignedOrderRequest {
    pub market: String,
    pub trader: String,
    pub side: OrderSide,
    pub is_limit: bool,
    pub quantity: f64,
    pub price: Option<f64>,
    pub signature: String,
    pub nonce: u64,
    pub metadata_hash: String,
}

/// Acknowledgement from the backend order API.
#[derive(Debug, Clone)]
pub struct BackendAck {
    pub order_id: String,
    pub matched: usize,
    pub tx_hash: Option<String>,
}

/// Backend order-matching API; authoritative for order lifecycle on the
/// order-book venue.
#[async_trait]
pub trait OrderBackend: Send + Sync {
    async fn submit_order(&self, req: &SignedOrderRequest) -> BackendResult<BackendAck>;
    async fn open_orders(&self, market: &str, trader: &str) -> BackendResult<Vec<Order>>;
    async fn cancel_order(&self, order_id: &str) -> BackendResult<()>;
}

/// Relay methods a gasless session may invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayMethod {
    PlaceMarginMarket,
    PlaceMarginLimit,
    CancelOrder,
}

impl RelayMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelayMethod::PlaceMarginMarket => "sessionPlaceMarginMarket",
            RelayMethod::PlaceMarginLimit => "sessionPlaceMarginLimit",
            RelayMethod::CancelOrder => "sessionCancelOrder",
        }
    }
}

/// Order parameters forwarded through the relay, fixed-point encoded.
#[derive(Debug, Clone)]
pub struct RelayOrderParams {
    pub side: OrderSide,
    pub size_fp: i128,
    pub price_fp: Option<i128>,
    pub order_id: Option<String>,
}

/// Gasless session relay: submits pre-authorized transactions on the
/// trader's behalf without a per-transaction wallet prompt.
#[async_trait]
pub trait SessionRelay: Send + Sync {
    /// Submit through an active session; returns the transaction hash.
    /// Session-specific failures map to `VenueError::Session`.
    async fn submit(
        &self,
        method: RelayMethod,
        venue: &str,
        session_id: &str,
        trader: &str,
        params: &RelayOrderParams,
    ) -> VenueResult<String>;
}
