//! User module.
//!
//! Users are owned by an external directory; this crate only reads them to
//! resolve the registering party and to label receipts and histories.

mod account;

pub use account::{User, MAX_USER_NAME_LENGTH};
