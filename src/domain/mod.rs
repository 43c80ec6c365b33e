//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `lecture` - Offerings, sessions, registrations and the admission rule
//! - `user` - Registered users

pub mod foundation;
pub mod lecture;
pub mod user;
