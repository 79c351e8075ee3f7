//! List-level use of the booking state rules.

use chrono::NaiveDateTime;
use common::{BookingState, BookingStatus};

use super::domain::Booking;

/// Keep the bookings that pass `state`, newest start first.
pub fn select(bookings: Vec<Booking>, state: BookingState, now: NaiveDateTime) -> Vec<Booking> {
    let mut picked: Vec<Booking> = bookings
        .into_iter()
        .filter(|b| state.matches(b.status, b.start, b.end, now))
        .collect();
    picked.sort_by(|a, b| b.start.cmp(&a.start).then(b.id.cmp(&a.id)));
    picked
}

/// `(last, next)` for one item: the latest end among approved bookings that
/// have started, and the earliest start among approved ones still ahead.
pub fn last_and_next(bookings: &[Booking], now: NaiveDateTime) -> (Option<NaiveDateTime>, Option<NaiveDateTime>) {
    let approved = bookings.iter().filter(|b| b.status == BookingStatus::Approved);
    let mut last = None;
    let mut next = None;
    for b in approved {
        match b.state(now) {
            BookingState::Past | BookingState::Current => {
                if last.map_or(true, |l| b.end > l) {
                    last = Some(b.end);
                }
            }
            BookingState::Future => {
                if next.map_or(true, |n| b.start < n) {
                    next = Some(b.start);
                }
            }
            _ => {}
        }
    }
    (last, next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 4, 24).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    fn booking(id: i64, start_days: i64, end_days: i64, status: BookingStatus) -> Booking {
        let n = now();
        Booking { id, booker_id: 1, item_id: 1, start: n + Duration::days(start_days), end: n + Duration::days(end_days), status }
    }

    fn sample() -> Vec<Booking> {
        vec![
            booking(1, -10, -8, BookingStatus::Approved), // past
            booking(2, -1, 1, BookingStatus::Approved),   // current
            booking(3, 3, 4, BookingStatus::Approved),    // future
            booking(4, 5, 6, BookingStatus::Waiting),     // waiting
            booking(5, -2, 2, BookingStatus::Waiting),    // expired -> rejected
            booking(6, 7, 8, BookingStatus::Rejected),
            booking(7, 2, 3, BookingStatus::Approved),    // future, nearer
        ]
    }

    fn ids(v: &[Booking]) -> Vec<i64> {
        v.iter().map(|b| b.id).collect()
    }

    #[test]
    fn all_is_sorted_newest_first() {
        let got = select(sample(), BookingState::All, now());
        assert_eq!(ids(&got), vec![6, 4, 3, 7, 2, 5, 1]);
    }

    #[test]
    fn filters_by_derived_state() {
        let n = now();
        assert_eq!(ids(&select(sample(), BookingState::Past, n)), vec![1]);
        assert_eq!(ids(&select(sample(), BookingState::Current, n)), vec![2]);
        assert_eq!(ids(&select(sample(), BookingState::Future, n)), vec![3, 7]);
        assert_eq!(ids(&select(sample(), BookingState::Waiting, n)), vec![4]);
        assert_eq!(ids(&select(sample(), BookingState::Rejected, n)), vec![6, 5]);
        assert_eq!(ids(&select(sample(), BookingState::Approved, n)), vec![3, 7, 2, 1]);
    }

    #[test]
    fn last_and_next_dates() {
        let n = now();
        let (last, next) = last_and_next(&sample(), n);
        assert_eq!(last, Some(n + Duration::days(1)));
        assert_eq!(next, Some(n + Duration::days(2)));

        let only_waiting = vec![booking(1, 1, 2, BookingStatus::Waiting)];
        assert_eq!(last_and_next(&only_waiting, n), (None, None));
    }
}
