// src/adapter/mod.rs
pub mod panel;

pub use panel::TradePanel;
