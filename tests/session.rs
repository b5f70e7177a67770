use std::path::PathBuf;

use chrono::NaiveDate;
use ulid::Ulid;

use vacancy::command::Registry;
use vacancy::dates::Clock;
use vacancy::ingest;
use vacancy::model::Booking;
use vacancy::repl::{self, PROMPT};
use vacancy::store::MemoryStore;

// ── Test infrastructure ──────────────────────────────────────

struct FixedClock(NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn booking(hotel_id: &str, room_type: &str, arrival: NaiveDate, departure: NaiveDate) -> Booking {
    Booking {
        id: Ulid::new(),
        hotel_id: hotel_id.into(),
        room_type: room_type.into(),
        arrival,
        departure,
    }
}

/// Feed a full session script to the driver and collect stdout (prompts
/// dropped) and stderr lines.
async fn run_session(
    store: &MemoryStore,
    today: NaiveDate,
    script: &str,
) -> (Vec<String>, Vec<String>) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    repl::run_session(
        script.as_bytes(),
        &mut out,
        &mut err,
        &Registry::default(),
        store,
        &FixedClock(today),
    )
    .await
    .unwrap();
    let out = String::from_utf8(out)
        .unwrap()
        .lines()
        .filter(|l| *l != PROMPT)
        .map(str::to_string)
        .collect();
    let err = String::from_utf8(err)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    (out, err)
}

fn write_fixture(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("vacancy_test_session");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(format!("{}_{name}", Ulid::new()));
    std::fs::write(&path, contents).unwrap();
    path
}

// ── Point queries ────────────────────────────────────────────

#[tokio::test]
async fn availability_over_range() {
    let mut store = MemoryStore::new();
    store.set_capacity("Hotel123", "Deluxe", 20);
    for _ in 0..10 {
        store.add_booking(booking("Hotel123", "Deluxe", d(2023, 1, 1), d(2023, 1, 5)));
    }
    let (out, err) = run_session(
        &store,
        d(2023, 1, 1),
        "Availability(Hotel123,20230101-20230105,Deluxe)\nexit\n",
    )
    .await;
    assert_eq!(out, vec!["10"]);
    assert!(err.is_empty());
}

#[tokio::test]
async fn availability_reports_overbooking_as_negative() {
    let mut store = MemoryStore::new();
    store.set_capacity("Hotel123", "Deluxe", 8);
    for _ in 0..10 {
        store.add_booking(booking("Hotel123", "Deluxe", d(2023, 1, 1), d(2023, 1, 5)));
    }
    let (out, _) = run_session(
        &store,
        d(2023, 1, 1),
        "Availability(Hotel123,20230101-20230105,Deluxe)\nexit\n",
    )
    .await;
    assert_eq!(out, vec!["-2"]);
}

#[tokio::test]
async fn availability_single_date_excludes_checkout_day() {
    let mut store = MemoryStore::new();
    store.set_capacity("H1", "SGL", 5);
    store.add_booking(booking("H1", "SGL", d(2023, 10, 2), d(2023, 10, 5)));
    // Departure day: the room is free again.
    let (out, _) = run_session(&store, d(2023, 10, 1), "Availability(H1,20231005,SGL)\nexit\n").await;
    assert_eq!(out, vec!["5"]);
    // Last occupied night.
    let (out, _) = run_session(&store, d(2023, 10, 1), "Availability(H1,20231004,SGL)\nexit\n").await;
    assert_eq!(out, vec!["4"]);
}

// ── Forward search ───────────────────────────────────────────

#[tokio::test]
async fn search_emits_unmerged_single_day_segments() {
    let mut store = MemoryStore::new();
    store.set_capacity("Hotel123", "Deluxe", 10);
    // Daily occupancy 2,3,2,4,1 over the five days from 2023-10-01.
    let stays = [
        (d(2023, 10, 1), d(2023, 10, 3)),
        (d(2023, 10, 1), d(2023, 10, 2)),
        (d(2023, 10, 2), d(2023, 10, 5)),
        (d(2023, 10, 2), d(2023, 10, 4)),
        (d(2023, 10, 4), d(2023, 10, 5)),
        (d(2023, 10, 4), d(2023, 10, 5)),
        (d(2023, 10, 4), d(2023, 10, 6)),
    ];
    for (arrival, departure) in stays {
        store.add_booking(booking("Hotel123", "Deluxe", arrival, departure));
    }
    let (out, err) = run_session(
        &store,
        d(2023, 10, 1),
        "Search(Hotel123,5,Deluxe)\nexit\n",
    )
    .await;
    assert_eq!(
        out,
        vec![
            "(20231001-20231002,8)",
            "(20231002-20231003,7)",
            "(20231003-20231004,8)",
            "(20231004-20231005,6)",
            "(20231005-20231006,9)",
        ]
    );
    assert!(err.is_empty());
}

#[tokio::test]
async fn search_merges_equal_adjacent_days() {
    let mut store = MemoryStore::new();
    store.set_capacity("H1", "SGL", 4);
    store.add_booking(booking("H1", "SGL", d(2023, 10, 3), d(2023, 10, 5)));
    let (out, _) = run_session(&store, d(2023, 10, 1), "Search(H1,7,SGL)\nexit\n").await;
    assert_eq!(
        out,
        vec![
            "(20231001-20231003,4)",
            "(20231003-20231005,3)",
            "(20231005-20231008,4)",
        ]
    );
}

#[tokio::test]
async fn search_uniform_span_is_one_segment() {
    let mut store = MemoryStore::new();
    store.set_capacity("H1", "SGL", 2);
    let (out, _) = run_session(&store, d(2023, 10, 1), "Search(H1,30,SGL)\nexit\n").await;
    assert_eq!(out, vec!["(20231001-20231031,2)"]);
}

#[tokio::test]
async fn search_span_of_one_day() {
    let mut store = MemoryStore::new();
    store.set_capacity("H1", "SGL", 2);
    store.add_booking(booking("H1", "SGL", d(2023, 10, 1), d(2023, 10, 2)));
    let (out, _) = run_session(&store, d(2023, 10, 1), "Search(H1,1,SGL)\nexit\n").await;
    assert_eq!(out, vec!["(20231001-20231002,1)"]);
}

// ── Session behavior ─────────────────────────────────────────

#[tokio::test]
async fn mixed_session_reports_errors_and_keeps_going() {
    let mut store = MemoryStore::new();
    store.set_capacity("H1", "SGL", 2);
    let script = "\
        nonsense\n\
        Availability(H1,20231005-20231005,SGL)\n\
        Search(H1,9999,SGL)\n\
        Availability(H1,20231005,SGL)\n\
        exit\n";
    let (out, err) = run_session(&store, d(2023, 10, 1), script).await;
    assert_eq!(out, vec!["2"]);
    assert_eq!(err.len(), 3);
    assert_eq!(err[0], "no matching command");
    assert!(err[1].starts_with("configuration error"));
    assert!(err[2].starts_with("configuration error"));
}

// ── Full path: JSON files → store → session ──────────────────

#[tokio::test]
async fn ingested_files_answer_queries() {
    let hotels = write_fixture(
        "hotels.json",
        r#"[
            {
                "id": "H1",
                "name": "Parkside",
                "roomTypes": [{ "code": "SGL", "description": "Single" }],
                "rooms": [
                    { "roomType": "SGL", "roomId": "101" },
                    { "roomType": "SGL", "roomId": "102" },
                    { "roomType": "SGL", "roomId": "103" }
                ]
            }
        ]"#,
    );
    let bookings = write_fixture(
        "bookings.json",
        r#"[
            { "hotelId": "H1", "roomType": "SGL", "arrival": "20231002", "departure": "20231004" },
            { "hotelId": "H1", "roomType": "SGL", "arrival": "20231003", "departure": "20231006" }
        ]"#,
    );
    let store = ingest::load(&hotels, &bookings).await.unwrap();
    let script = "\
        Availability(H1,20231003,SGL)\n\
        Search(H1,6,SGL)\n\
        exit\n";
    let (out, err) = run_session(&store, d(2023, 10, 1), script).await;
    assert_eq!(
        out,
        vec![
            "1",
            "(20231001-20231002,3)",
            "(20231002-20231003,2)",
            "(20231003-20231004,1)",
            "(20231004-20231006,2)",
            "(20231006-20231007,3)",
        ]
    );
    assert!(err.is_empty());
}
