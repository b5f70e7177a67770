use std::collections::HashMap;

use async_trait::async_trait;

use crate::model::{Booking, DateRange, RoomKey};

/// Read side of the booking repository. Implementations may suspend on IO;
/// every query is read-only, so repeated calls are safe.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Total rooms of `room_type` in `hotel_id`. An unknown pair is 0, not
    /// an error.
    async fn capacity(&self, hotel_id: &str, room_type: &str) -> Result<u32, StoreError>;

    /// Number of bookings whose stay overlaps `window` (half-open on both
    /// sides: a stay ending on `window.start` or starting on `window.end`
    /// is not counted).
    async fn booking_count(
        &self,
        hotel_id: &str,
        room_type: &str,
        window: DateRange,
    ) -> Result<u32, StoreError>;

    /// Per-day occupancy over `window`: index `i` counts the bookings
    /// occupying day `window.start + i`. Length is the window's day count.
    async fn daily_booking_counts(
        &self,
        hotel_id: &str,
        room_type: &str,
        window: DateRange,
    ) -> Result<Vec<u32>, StoreError>;
}

/// Repository failure. Opaque to the engine: it propagates unchanged to the
/// driver, which reports it and keeps the session alive.
#[derive(Debug)]
pub enum StoreError {
    Backend(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Backend(msg) => write!(f, "booking store error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

// ── In-memory store ──────────────────────────────────────────────

/// In-process store backing an interactive session. Populated once by
/// ingestion, then queried read-only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inventory: HashMap<RoomKey, RoomTypeRecord>,
}

#[derive(Debug, Default)]
struct RoomTypeRecord {
    capacity: u32,
    bookings: Vec<Booking>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the room count for a (hotel, room type) pair. At most one
    /// capacity value exists per pair; the last write wins.
    pub fn set_capacity(
        &mut self,
        hotel_id: impl Into<String>,
        room_type: impl Into<String>,
        capacity: u32,
    ) {
        self.inventory
            .entry(RoomKey::new(hotel_id, room_type))
            .or_default()
            .capacity = capacity;
    }

    pub fn add_booking(&mut self, booking: Booking) {
        let key = RoomKey::new(booking.hotel_id.clone(), booking.room_type.clone());
        self.inventory.entry(key).or_default().bookings.push(booking);
    }

    pub fn room_type_count(&self) -> usize {
        self.inventory.len()
    }

    pub fn booking_count_total(&self) -> usize {
        self.inventory.values().map(|r| r.bookings.len()).sum()
    }

    fn record(&self, hotel_id: &str, room_type: &str) -> Option<&RoomTypeRecord> {
        self.inventory.get(&RoomKey::new(hotel_id, room_type))
    }

    fn overlapping(
        &self,
        hotel_id: &str,
        room_type: &str,
        window: DateRange,
    ) -> impl Iterator<Item = &Booking> {
        self.record(hotel_id, room_type)
            .into_iter()
            .flat_map(|r| r.bookings.iter())
            .filter(move |b| b.stay().overlaps(&window))
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn capacity(&self, hotel_id: &str, room_type: &str) -> Result<u32, StoreError> {
        Ok(self.record(hotel_id, room_type).map_or(0, |r| r.capacity))
    }

    async fn booking_count(
        &self,
        hotel_id: &str,
        room_type: &str,
        window: DateRange,
    ) -> Result<u32, StoreError> {
        Ok(self.overlapping(hotel_id, room_type, window).count() as u32)
    }

    async fn daily_booking_counts(
        &self,
        hotel_id: &str,
        room_type: &str,
        window: DateRange,
    ) -> Result<Vec<u32>, StoreError> {
        let span = window.days() as usize;
        let mut counts = vec![0u32; span];
        for booking in self.overlapping(hotel_id, room_type, window) {
            // Clamp the stay to the window in day-index space; overlap
            // filtering guarantees a non-empty `from..to`.
            let from = window.day_offset(booking.arrival).max(0) as usize;
            let to = window.day_offset(booking.departure).min(span as i64) as usize;
            for slot in &mut counts[from..to] {
                *slot += 1;
            }
        }
        Ok(counts)
    }
}
