//! HTTP server module
//!
//! This module handles HTTP request routing and handling:
//! - Axum router with all transcript endpoints
//! - Request handlers and the error to status code mapping
//! - Request logging with request ids
//! - CORS middleware

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use routes::create_router;
