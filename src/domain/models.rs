// src/domain/models.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of an order or position. `Long` crosses the ask ladder,
/// `Short` crosses the bid ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Long,
    Short,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Long => "buy",
            OrderSide::Short => "sell",
        }
    }

    /// Name of the book side this order consumes.
    pub fn book_side(&self) -> &'static str {
        match self {
            OrderSide::Long => "ask",
            OrderSide::Short => "bid",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderType {
    Market,
    /// Limit order carrying the user-supplied trigger price.
    Limit(f64),
}

impl OrderType {
    pub fn trigger_price(&self) -> Option<f64> {
        match self {
            OrderType::Market => None,
            OrderType::Limit(price) => Some(*price),
        }
    }

    pub fn is_limit(&self) -> bool {
        matches!(self, OrderType::Limit(_))
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OrderType::Market => write!(f, "MARKET"),
            OrderType::Limit(price) => write!(f, "LIMIT {}", price),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    PartiallyFilled,
    Filled,
    Cancelled,
    Expired,
}

impl OrderStatus {
    /// An order is active while it can still trade.
    pub fn is_active(&self) -> bool {
        !matches!(
            self,
            OrderStatus::Filled | OrderStatus::Cancelled | OrderStatus::Expired
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "PENDING"),
            OrderStatus::PartiallyFilled => write!(f, "PARTIALLY_FILLED"),
            OrderStatus::Filled => write!(f, "FILLED"),
            OrderStatus::Cancelled => write!(f, "CANCELLED"),
            OrderStatus::Expired => write!(f, "EXPIRED"),
        }
    }
}

/// An order as reported by any of the three sources (backend snapshot,
/// on-chain read, local session cache). Quantities are in human units,
/// already scaled down from on-chain fixed point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub market: String,
    pub side: OrderSide,
    pub quantity: f64,
    pub filled_quantity: f64,
    /// Limit price; `None` for unpriced market fills.
    pub price: Option<f64>,
    pub status: OrderStatus,
    pub trader: String,
    pub timestamp: i64,
    pub expiry_time: Option<i64>,
}

/// One price level of an order book depth snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthLevel {
    pub price: f64,
    pub size: f64,
}

/// Depth snapshot: asks ascending, bids descending. Treated as immutable
/// for the duration of one quote computation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepthSnapshot {
    pub bids: Vec<DepthLevel>,
    pub asks: Vec<DepthLevel>,
}

impl DepthSnapshot {
    pub fn best_bid(&self) -> Option<f64> {
        self.bids.first().map(|l| l.price).filter(|p| *p > 0.0)
    }

    pub fn best_ask(&self) -> Option<f64> {
        self.asks.first().map(|l| l.price).filter(|p| *p > 0.0)
    }
}

/// Whether the entered amount is a USD notional or a unit quantity.
/// The two modes are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeMode {
    Usd,
    Units,
}

/// Estimated fill for a requested order against a depth snapshot.
/// Ephemeral; recomputed on every relevant input change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteResult {
    /// Volume-weighted average fill price across consumed levels.
    pub price: f64,
    /// Total units that would be filled.
    pub units: f64,
    /// Total notional consumed.
    pub value: f64,
    /// Requested size exceeded visible depth.
    pub partial: bool,
    pub levels_used: usize,
}

impl QuoteResult {
    /// Marker result when the relevant side of the book is empty.
    pub fn no_liquidity() -> Self {
        Self {
            price: 0.0,
            units: 0.0,
            value: 0.0,
            partial: false,
            levels_used: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.units <= 0.0
    }
}

/// Latest cached values from the independently polling price sources.
/// Staleness across sources is tolerated; the resolver reads whatever
/// each source last published.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceContext {
    pub best_bid: Option<f64>,
    pub best_ask: Option<f64>,
    /// Live mark price from the book state feed.
    pub mark_price: Option<f64>,
    /// Externally supplied market data price.
    pub market_price: Option<f64>,
    /// Legacy last-known token price.
    pub last_price: Option<f64>,
    pub tick_size: Option<f64>,
}

/// One submit click, as captured from the panel inputs.
#[derive(Debug, Clone)]
pub struct TradeRequest {
    pub market: String,
    pub trader: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub amount: f64,
    pub mode: SizeMode,
    pub slippage_bps: u32,
    pub leverage: u32,
}

/// Terminal outcome of a submission or cancellation, already folded down
/// from the error taxonomy to what the panel displays.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub success: bool,
    pub tx_hash: Option<String>,
    pub order_id: Option<String>,
    pub error: Option<String>,
}

impl SubmitOutcome {
    pub fn ok(tx_hash: Option<String>, order_id: Option<String>) -> Self {
        Self {
            success: true,
            tx_hash,
            order_id,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            tx_hash: None,
            order_id: None,
            error: Some(error.into()),
        }
    }
}

/// Panel-level notifications, broadcast to whichever view is listening.
#[derive(Debug, Clone)]
pub enum PanelEvent {
    OrderSubmitted { tx_hash: Option<String> },
    OrderCancelled { order_id: String },
    RefreshOrders,
    SessionInvalidated,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_status_matches_lifecycle() {
        assert!(OrderStatus::Pending.is_active());
        assert!(OrderStatus::PartiallyFilled.is_active());
        assert!(!OrderStatus::Filled.is_active());
        assert!(!OrderStatus::Cancelled.is_active());
        assert!(!OrderStatus::Expired.is_active());
    }

    #[test]
    fn best_of_book_ignores_zero_prices() {
        let depth = DepthSnapshot {
            bids: vec![DepthLevel { price: 0.0, size: 3.0 }],
            asks: vec![DepthLevel { price: 10.0, size: 1.0 }],
        };
        assert_eq!(depth.best_bid(), None);
        assert_eq!(depth.best_ask(), Some(10.0));
    }
}
