// src/application/usecase/mod.rs
pub mod margin_usecase;
pub mod orders_usecase;
pub mod pricing_usecase;
pub mod quote_usecase;
pub mod submission_usecase;

// Re-export public API
pub use margin_usecase::{estimate_liquidation, required_margin, LiquidationParams};
pub use orders_usecase::{filled_orders_for_market, merge_active_orders};
pub use pricing_usecase::resolve_current_price;
pub use quote_usecase::{compute_quote, QuoteEngine};
pub use submission_usecase::{
    slippage_ladder, BookStrategy, GaslessStrategy, PriceBounds, RetryPolicy, SessionInfo,
    SessionStore, VammStrategy,
};
