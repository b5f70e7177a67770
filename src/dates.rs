use chrono::{NaiveDate, Utc};

/// The 8-digit date token format shared by the command grammar, the data
/// files, and search output segments.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Parse an 8-digit `YYYYMMDD` token as a UTC calendar date.
///
/// The token must be exactly 8 ASCII digits and form a real calendar date;
/// anything else is malformed.
pub fn parse_date(token: &str) -> Result<NaiveDate, DateError> {
    if token.len() != 8 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DateError::Malformed(token.to_string()));
    }
    NaiveDate::parse_from_str(token, DATE_FORMAT)
        .map_err(|_| DateError::Malformed(token.to_string()))
}

/// Render a date back into the 8-digit token form.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Source of "today". Taken as a capability so forward-looking commands can
/// be tested against a pinned calendar.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock: the current UTC date, truncated to day granularity.
pub struct UtcClock;

impl Clock for UtcClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum DateError {
    Malformed(String),
}

impl std::fmt::Display for DateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateError::Malformed(token) => {
                write!(f, "malformed date {token:?}: expected YYYYMMDD")
            }
        }
    }
}

impl std::error::Error for DateError {}
