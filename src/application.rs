//! Application layer - caller-facing marketplace operations

pub mod marketplace_service;

pub use marketplace_service::{MarketplaceService, ServiceError, ServiceResult};
