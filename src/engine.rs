use std::fmt;

use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::command::Command;
use crate::dates;
use crate::model::DateRange;
use crate::store::{BookingStore, StoreError};

// ── Availability math ────────────────────────────────────────────

/// Rooms left over a window: capacity minus overlapping bookings. Negative
/// when overbooked; that is representable output, not an error.
pub fn point_availability(capacity: u32, booked: u32) -> i64 {
    i64::from(capacity) - i64::from(booked)
}

/// Elementwise `capacity - booked` across a per-day occupancy series.
pub fn daily_availability(capacity: u32, daily_booked: &[u32]) -> Vec<i64> {
    daily_booked
        .iter()
        .map(|&booked| point_availability(capacity, booked))
        .collect()
}

// ── Run-length compression ───────────────────────────────────────

/// A maximal run of consecutive days sharing one availability value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub range: DateRange,
    pub available: i64,
}

impl fmt::Display for Segment {
    /// `(YYYYMMDD-YYYYMMDD,<available>)` — the end date is exclusive, the
    /// day after the run's last day.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}-{},{})",
            dates::format_date(self.range.start),
            dates::format_date(self.range.end),
            self.available
        )
    }
}

/// Collapse a per-day series starting at `start` into maximal contiguous
/// segments of equal value, in chronological order. A non-empty series
/// yields at least one segment.
pub fn compress_series(start: NaiveDate, series: &[i64]) -> Vec<Segment> {
    let Some(&first) = series.first() else {
        return Vec::new();
    };
    let mut segments = Vec::new();
    let mut run_start = 0;
    let mut run_value = first;
    for (day, &value) in series.iter().enumerate().skip(1) {
        if value != run_value {
            segments.push(segment(start, run_start, day, run_value));
            run_start = day;
            run_value = value;
        }
    }
    segments.push(segment(start, run_start, series.len(), run_value));
    segments
}

fn segment(start: NaiveDate, from: usize, to: usize, available: i64) -> Segment {
    Segment {
        range: DateRange::new(
            start + Days::new(from as u64),
            start + Days::new(to as u64),
        ),
        available,
    }
}

// ── Command execution ────────────────────────────────────────────

/// Run a parsed command against the store and produce its output lines.
///
/// Read-only, so re-execution is safe. The capacity fetch and the
/// booking-count fetch are concurrent siblings; both must land before any
/// availability is computed. Store failures propagate untouched.
pub async fn execute(command: &Command, store: &dyn BookingStore) -> Result<Vec<String>, StoreError> {
    match command {
        Command::Availability {
            hotel_id,
            room_type,
            window,
        } => {
            let (capacity, booked) = tokio::join!(
                store.capacity(hotel_id, room_type),
                store.booking_count(hotel_id, room_type, *window),
            );
            let available = point_availability(capacity?, booked?);
            debug!("availability {hotel_id}/{room_type}: {available}");
            Ok(vec![available.to_string()])
        }
        Command::Search {
            hotel_id,
            room_type,
            window,
        } => {
            let (capacity, daily) = tokio::join!(
                store.capacity(hotel_id, room_type),
                store.daily_booking_counts(hotel_id, room_type, *window),
            );
            let series = daily_availability(capacity?, &daily?);
            let segments = compress_series(window.start, &series);
            debug!(
                "search {hotel_id}/{room_type}: {} days in {} segments",
                series.len(),
                segments.len()
            );
            Ok(segments.iter().map(Segment::to_string).collect())
        }
    }
}
