//! Galeria API server library.
//!
//! Exposes config, state, error handling, routes and the external provider
//! clients so integration tests and the binary entrypoint share them.

pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod integrations;
pub mod middleware;
pub mod multipart;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
