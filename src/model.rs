use chrono::{Days, NaiveDate};
use ulid::Ulid;

/// Half-open day range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        debug_assert!(start < end, "DateRange start must be before end");
        Self { start, end }
    }

    /// The one-day window `[day, day + 1)`.
    pub fn single_day(day: NaiveDate) -> Self {
        Self::new(day, day + Days::new(1))
    }

    /// Window length in whole days.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Half-open overlap: `[a, b)` and `[c, d)` overlap iff `a < d && c < b`.
    /// Ranges that merely touch at a boundary do not overlap.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Offset of `day` from the range start, in days. Negative when `day`
    /// precedes the range.
    pub fn day_offset(&self, day: NaiveDate) -> i64 {
        (day - self.start).num_days()
    }
}

/// Lookup key for a room-type inventory within a hotel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomKey {
    pub hotel_id: String,
    pub room_type: String,
}

impl RoomKey {
    pub fn new(hotel_id: impl Into<String>, room_type: impl Into<String>) -> Self {
        Self {
            hotel_id: hotel_id.into(),
            room_type: room_type.into(),
        }
    }
}

/// A reservation of one room-type unit. The stay occupies
/// `[arrival, departure)` — the departure day itself is free (checkout
/// semantics). Arrival strictly precedes departure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub id: Ulid,
    pub hotel_id: String,
    pub room_type: String,
    pub arrival: NaiveDate,
    pub departure: NaiveDate,
}

impl Booking {
    /// The occupied window as a half-open range.
    pub fn stay(&self) -> DateRange {
        DateRange::new(self.arrival, self.departure)
    }
}
