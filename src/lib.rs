//! Room availability over a set of reservations: free-text instructions are
//! parsed into commands, booking overlaps are counted per day, and search
//! results are compressed into date ranges of equal availability.

pub mod command;
pub mod dates;
pub mod engine;
pub mod ingest;
pub mod limits;
pub mod model;
pub mod repl;
pub mod store;
