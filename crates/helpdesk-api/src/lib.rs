//! # helpdesk-api
//!
//! HTTP API layer for the helpdesk backend built on Axum.
//!
//! Provides the REST endpoints, the WebSocket upgrade, the gateway-header
//! identity extractor, DTOs, and error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
