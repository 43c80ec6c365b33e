//! Adapters - Implementations of ports for specific technologies.
//!
//! - `memory` - Process-local storage
//! - `postgres` - PostgreSQL storage via sqlx
//! - `http` - axum REST API

pub mod http;
pub mod memory;
pub mod postgres;
