//! JSON data input: a hotels file (room inventory) and a bookings file,
//! loaded once at startup into a [`MemoryStore`].

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;
use ulid::Ulid;

use crate::dates::{self, DateError};
use crate::model::Booking;
use crate::store::MemoryStore;

// ── File records ─────────────────────────────────────────────────
// Only the fields the store needs are declared; the rest of each record
// (hotel name, room type descriptions, amenities) is ignored.

#[derive(Debug, Deserialize)]
struct HotelEntry {
    id: String,
    rooms: Vec<RoomEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoomEntry {
    room_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookingEntry {
    hotel_id: String,
    room_type: String,
    arrival: String,
    departure: String,
}

/// Load both input files into a fresh store.
///
/// Capacity for a (hotel, room type) pair is the number of rooms of that
/// type listed for the hotel, summed across entries with the same hotel id.
pub async fn load(hotels_path: &Path, bookings_path: &Path) -> Result<MemoryStore, IngestError> {
    let mut store = MemoryStore::new();

    let hotels: Vec<HotelEntry> = read_json(hotels_path).await?;
    let mut capacities: HashMap<(String, String), u32> = HashMap::new();
    for hotel in hotels {
        for room in hotel.rooms {
            *capacities
                .entry((hotel.id.clone(), room.room_type))
                .or_insert(0) += 1;
        }
    }
    for ((hotel_id, room_type), capacity) in capacities {
        store.set_capacity(hotel_id, room_type, capacity);
    }

    let bookings: Vec<BookingEntry> = read_json(bookings_path).await?;
    for entry in bookings {
        store.add_booking(parse_booking(entry)?);
    }

    info!(
        "loaded {} room types and {} bookings",
        store.room_type_count(),
        store.booking_count_total()
    );
    Ok(store)
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, IngestError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| IngestError::Io(path.display().to_string(), e))?;
    serde_json::from_slice(&bytes).map_err(|e| IngestError::Json(path.display().to_string(), e))
}

fn parse_booking(entry: BookingEntry) -> Result<Booking, IngestError> {
    let arrival = dates::parse_date(&entry.arrival)?;
    let departure = dates::parse_date(&entry.departure)?;
    if arrival >= departure {
        return Err(IngestError::StayInverted {
            hotel_id: entry.hotel_id,
            arrival: entry.arrival,
            departure: entry.departure,
        });
    }
    Ok(Booking {
        id: Ulid::new(),
        hotel_id: entry.hotel_id,
        room_type: entry.room_type,
        arrival,
        departure,
    })
}

#[derive(Debug)]
pub enum IngestError {
    Io(String, std::io::Error),
    Json(String, serde_json::Error),
    Date(DateError),
    /// A booking whose arrival is not strictly before its departure.
    StayInverted {
        hotel_id: String,
        arrival: String,
        departure: String,
    },
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::Io(path, err) => write!(f, "cannot read {path}: {err}"),
            IngestError::Json(path, err) => write!(f, "invalid JSON in {path}: {err}"),
            IngestError::Date(err) => write!(f, "{err}"),
            IngestError::StayInverted {
                hotel_id,
                arrival,
                departure,
            } => write!(
                f,
                "booking for {hotel_id} must arrive before departing ({arrival}..{departure})"
            ),
        }
    }
}

impl std::error::Error for IngestError {}

impl From<DateError> for IngestError {
    fn from(err: DateError) -> Self {
        IngestError::Date(err)
    }
}
