//! # HTTP Server
//!
//! Router assembly and the per-endpoint route modules.

pub mod admin_routes;
pub mod server;
pub mod submission_routes;

pub use server::{build_router, AppState, HttpServer};
