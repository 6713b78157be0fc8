//! HTTP surface of contact-relay.
//!
//! Exposes the contact endpoint, the challenge endpoint and a health check,
//! and optionally serves the built site.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
