//! Stored booking status and the state derived from it over time.

use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What the owner decided, as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
    Canceled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Waiting => "WAITING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::Rejected => "REJECTED",
            BookingStatus::Canceled => "CANCELED",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for BookingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WAITING" => Ok(BookingStatus::Waiting),
            "APPROVED" => Ok(BookingStatus::Approved),
            "REJECTED" => Ok(BookingStatus::Rejected),
            "CANCELED" => Ok(BookingStatus::Canceled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Classification of a booking relative to "now", also used as a list filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingState {
    #[default]
    All,
    Waiting,
    Approved,
    Rejected,
    Current,
    Past,
    Future,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown state: {0}")]
pub struct UnknownState(pub String);

impl BookingState {
    /// State of a single booking. Never returns `All` or `Approved`: an
    /// approved booking is always one of `Future`, `Current` or `Past`.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use common::{BookingState, BookingStatus};
    /// let day = |d| NaiveDate::from_ymd_opt(2025, 4, d).unwrap().and_hms_opt(12, 0, 0).unwrap();
    /// let state = BookingState::derive(BookingStatus::Approved, day(10), day(12), day(11));
    /// assert_eq!(state, BookingState::Current);
    /// ```
    pub fn derive(status: BookingStatus, start: NaiveDateTime, end: NaiveDateTime, now: NaiveDateTime) -> Self {
        match status {
            // never answered before it began
            BookingStatus::Waiting if start < now => BookingState::Rejected,
            BookingStatus::Waiting => BookingState::Waiting,
            BookingStatus::Approved if start > now => BookingState::Future,
            BookingStatus::Approved if end > now => BookingState::Current,
            BookingStatus::Approved => BookingState::Past,
            BookingStatus::Rejected | BookingStatus::Canceled => BookingState::Rejected,
        }
    }

    /// Whether a booking passes this filter.
    pub fn matches(self, status: BookingStatus, start: NaiveDateTime, end: NaiveDateTime, now: NaiveDateTime) -> bool {
        match self {
            BookingState::All => true,
            BookingState::Approved => status == BookingStatus::Approved,
            wanted => Self::derive(status, start, end, now) == wanted,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingState::All => "ALL",
            BookingState::Waiting => "WAITING",
            BookingState::Approved => "APPROVED",
            BookingState::Rejected => "REJECTED",
            BookingState::Current => "CURRENT",
            BookingState::Past => "PAST",
            BookingState::Future => "FUTURE",
        }
    }
}

impl fmt::Display for BookingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for BookingState {
    type Err = UnknownState;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALL" => Ok(BookingState::All),
            "WAITING" => Ok(BookingState::Waiting),
            "APPROVED" => Ok(BookingState::Approved),
            "REJECTED" => Ok(BookingState::Rejected),
            "CURRENT" => Ok(BookingState::Current),
            "PAST" => Ok(BookingState::Past),
            "FUTURE" => Ok(BookingState::Future),
            _ => Err(UnknownState(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 4, 24).unwrap().and_hms_opt(20, 15, 47).unwrap()
    }

    #[test]
    fn waiting_turns_rejected_once_started() {
        let n = now();
        assert_eq!(BookingState::derive(BookingStatus::Waiting, n + Duration::hours(1), n + Duration::hours(2), n), BookingState::Waiting);
        assert_eq!(BookingState::derive(BookingStatus::Waiting, n - Duration::hours(1), n + Duration::hours(2), n), BookingState::Rejected);
    }

    #[test]
    fn approved_is_classified_by_time() {
        let n = now();
        let d = Duration::days(1);
        assert_eq!(BookingState::derive(BookingStatus::Approved, n + d, n + d * 2, n), BookingState::Future);
        assert_eq!(BookingState::derive(BookingStatus::Approved, n - d, n + d, n), BookingState::Current);
        assert_eq!(BookingState::derive(BookingStatus::Approved, n - d * 2, n - d, n), BookingState::Past);
        // boundaries: start == now is no longer future, end == now is already past
        assert_eq!(BookingState::derive(BookingStatus::Approved, n, n + d, n), BookingState::Current);
        assert_eq!(BookingState::derive(BookingStatus::Approved, n - d, n, n), BookingState::Past);
    }

    #[test]
    fn rejected_and_canceled_collapse() {
        let n = now();
        let d = Duration::days(1);
        assert_eq!(BookingState::derive(BookingStatus::Rejected, n + d, n + d * 2, n), BookingState::Rejected);
        assert_eq!(BookingState::derive(BookingStatus::Canceled, n - d, n + d, n), BookingState::Rejected);
    }

    #[test]
    fn approved_filter_uses_stored_status() {
        let n = now();
        let d = Duration::days(1);
        assert!(BookingState::Approved.matches(BookingStatus::Approved, n - d * 2, n - d, n));
        assert!(BookingState::Approved.matches(BookingStatus::Approved, n + d, n + d * 2, n));
        assert!(!BookingState::Approved.matches(BookingStatus::Waiting, n + d, n + d * 2, n));
        assert!(BookingState::All.matches(BookingStatus::Canceled, n, n + d, n));
        assert!(BookingState::Rejected.matches(BookingStatus::Waiting, n - d, n + d, n));
    }

    #[test]
    fn parses_state_ignoring_case() {
        assert_eq!("future".parse::<BookingState>(), Ok(BookingState::Future));
        assert_eq!("Past".parse::<BookingState>(), Ok(BookingState::Past));
        let err = "UNSUPPORTED_STATUS".parse::<BookingState>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown state: UNSUPPORTED_STATUS");
    }

    #[test]
    fn status_round_trips_through_storage_text() {
        for s in [BookingStatus::Waiting, BookingStatus::Approved, BookingStatus::Rejected, BookingStatus::Canceled] {
            assert_eq!(s.as_str().parse::<BookingStatus>(), Ok(s));
        }
        assert!("LOST".parse::<BookingStatus>().is_err());
    }
}
