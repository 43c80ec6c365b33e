//! Lecture Registration - capacity-bounded seat registration for lecture sessions
//!
//! Users claim seats in scheduled sessions of lecture offerings. Each
//! offering has one exclusive admission section, so concurrent attempts
//! can neither overfill a session nor register a user twice for the same
//! offering.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
