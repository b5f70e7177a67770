use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use vacancy::command::Registry;
use vacancy::dates::UtcClock;
use vacancy::{ingest, repl};

/// Manage hotel room availability and reservations from the console.
#[derive(Debug, Parser)]
#[command(name = "vacancy", version)]
struct Args {
    /// Hotels JSON file (room inventory per hotel).
    #[arg(long, value_name = "FILE")]
    hotels: PathBuf,

    /// Bookings JSON file.
    #[arg(long, value_name = "FILE")]
    bookings: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let store = ingest::load(&args.hotels, &args.bookings).await?;
    info!("store ready, accepting commands");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    repl::run_session(
        stdin,
        tokio::io::stdout(),
        tokio::io::stderr(),
        &Registry::default(),
        &store,
        &UtcClock,
    )
    .await?;
    Ok(())
}
