// src/infrastructure/mod.rs
pub mod backend;
pub mod chain;
pub mod relay;
