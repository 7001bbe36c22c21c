// src/domain/mod.rs
pub mod errors;
pub mod fixed;
pub mod models;
pub mod repository;
pub mod service;

// Re-export common types for convenience
pub use errors::{
    classify_failure, AppError, AppResult, BackendError, BackendResult, FailureClass, VenueError,
    VenueResult,
};
pub use models::{
    DepthLevel, DepthSnapshot, Order, OrderSide, OrderStatus, OrderType, PanelEvent, PriceContext,
    QuoteResult, SizeMode, SubmitOutcome, TradeRequest,
};
