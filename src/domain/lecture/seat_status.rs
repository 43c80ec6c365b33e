//! Seat availability of a session.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a session still has seats.
///
/// Registrations are irrevocable, so a session only ever moves `Open -> Full`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SeatStatus {
    #[default]
    Open,
    Full,
}

impl SeatStatus {
    /// Derives the status from a capacity and occupancy pair.
    pub fn from_counts(capacity: u32, occupancy: u32) -> Self {
        if occupancy >= capacity {
            SeatStatus::Full
        } else {
            SeatStatus::Open
        }
    }

    /// Returns true while registrations can still be admitted.
    pub fn accepts_registrations(&self) -> bool {
        matches!(self, SeatStatus::Open)
    }
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SeatStatus::Open => "Open",
            SeatStatus::Full => "Full",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_status_from_counts() {
        assert_eq!(SeatStatus::from_counts(30, 0), SeatStatus::Open);
        assert_eq!(SeatStatus::from_counts(30, 29), SeatStatus::Open);
        assert_eq!(SeatStatus::from_counts(30, 30), SeatStatus::Full);
    }

    #[test]
    fn only_open_accepts_registrations() {
        assert!(SeatStatus::Open.accepts_registrations());
        assert!(!SeatStatus::Full.accepts_registrations());
    }

    #[test]
    fn serializes_snake_case() {
        assert_eq!(serde_json::to_string(&SeatStatus::Full).unwrap(), "\"full\"");
    }
}
