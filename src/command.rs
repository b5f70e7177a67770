use chrono::{Days, NaiveDate};

use crate::dates::{self, DateError};
use crate::limits::{MAX_SEARCH_SPAN_DAYS, MIN_SEARCH_SPAN_DAYS};
use crate::model::DateRange;

/// A parsed instruction, ready to execute. Parsing happens exactly once per
/// input line; execution is read-only and repeatable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Point query: rooms of `room_type` left unbooked across `window`.
    Availability {
        hotel_id: String,
        room_type: String,
        window: DateRange,
    },
    /// Forward search: per-day availability over `window`, run-length
    /// compressed into date ranges of equal value.
    Search {
        hotel_id: String,
        room_type: String,
        window: DateRange,
    },
}

#[derive(Debug, PartialEq, Eq)]
pub enum CommandError {
    /// A parameter token matched the grammar shape but is not a usable
    /// value (impossible calendar date, numeric overflow).
    Format(String),
    /// Parameters are well-formed but semantically invalid.
    Configuration(String),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Format(msg) => write!(f, "format error: {msg}"),
            CommandError::Configuration(msg) => write!(f, "configuration error: {msg}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<DateError> for CommandError {
    fn from(err: DateError) -> Self {
        CommandError::Format(err.to_string())
    }
}

// ── Grammars ─────────────────────────────────────────────────────

/// Outcome of offering an instruction to one grammar: `None` when the shape
/// does not match (another grammar may still accept it), `Some(Err)` when
/// this grammar accepts the shape but the parameters are invalid.
pub type GrammarFn = fn(&str, NaiveDate) -> Option<Result<Command, CommandError>>;

pub struct Grammar {
    pub name: &'static str,
    pub parse: GrammarFn,
}

/// `Availability(<hotelId>,<date8>|<date8>-<date8>,<roomType>)`
///
/// A single date `D` queries the one-day window `[D, D+1)`; a range queries
/// `[D1, D2)`. Equal dates are rejected, not treated as a zero-length window.
pub fn parse_availability(input: &str, _today: NaiveDate) -> Option<Result<Command, CommandError>> {
    let [hotel_id, dates_arg, room_type] = command_args(input, "availability")?;
    if !is_alphanumeric(hotel_id) || !is_alphanumeric(room_type) {
        return None;
    }
    let window = match dates_arg.split_once('-') {
        Some((from, to)) if is_date_token(from) && is_date_token(to) => parse_window(from, to),
        None if is_date_token(dates_arg) => parse_single_day(dates_arg),
        _ => return None,
    };
    Some(window.map(|window| Command::Availability {
        hotel_id: hotel_id.to_string(),
        room_type: room_type.to_string(),
        window,
    }))
}

/// `Search(<hotelId>,<spanDays>,<roomType>)`
///
/// The window is `[today, today + span)`, resolved against the clock at
/// parse time. The span must lie in `[MIN_SEARCH_SPAN_DAYS,
/// MAX_SEARCH_SPAN_DAYS]` inclusive.
pub fn parse_search(input: &str, today: NaiveDate) -> Option<Result<Command, CommandError>> {
    let [hotel_id, span_arg, room_type] = command_args(input, "search")?;
    if !is_alphanumeric(hotel_id) || !is_alphanumeric(room_type) {
        return None;
    }
    if span_arg.is_empty() || !span_arg.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(parse_span(span_arg).map(|span| Command::Search {
        hotel_id: hotel_id.to_string(),
        room_type: room_type.to_string(),
        window: DateRange::new(today, today + Days::new(u64::from(span))),
    }))
}

fn parse_window(from: &str, to: &str) -> Result<DateRange, CommandError> {
    let start = dates::parse_date(from)?;
    let end = dates::parse_date(to)?;
    if start >= end {
        return Err(CommandError::Configuration(
            "start date must be before end date".into(),
        ));
    }
    Ok(DateRange::new(start, end))
}

fn parse_single_day(token: &str) -> Result<DateRange, CommandError> {
    Ok(DateRange::single_day(dates::parse_date(token)?))
}

fn parse_span(token: &str) -> Result<u32, CommandError> {
    let span: u32 = token
        .parse()
        .map_err(|_| CommandError::Format(format!("span out of range: {token}")))?;
    if !(MIN_SEARCH_SPAN_DAYS..=MAX_SEARCH_SPAN_DAYS).contains(&span) {
        return Err(CommandError::Configuration(format!(
            "days ahead must be between {MIN_SEARCH_SPAN_DAYS} and {MAX_SEARCH_SPAN_DAYS}"
        )));
    }
    Ok(span)
}

/// Match `keyword(<a>,<b>,<c>)` case-insensitively against the whole input
/// and return the three comma-separated argument slices.
fn command_args<'a>(input: &'a str, keyword: &str) -> Option<[&'a str; 3]> {
    let rest = strip_keyword(input, keyword)?;
    let body = rest.strip_prefix('(')?.strip_suffix(')')?;
    let mut parts = body.split(',');
    let args = [parts.next()?, parts.next()?, parts.next()?];
    if parts.next().is_some() {
        return None;
    }
    Some(args)
}

/// Case-insensitive prefix strip. Keywords are plain ASCII letters.
fn strip_keyword<'a>(input: &'a str, keyword: &str) -> Option<&'a str> {
    let head = input.get(..keyword.len())?;
    head.eq_ignore_ascii_case(keyword)
        .then(|| &input[keyword.len()..])
}

fn is_alphanumeric(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_alphanumeric())
}

fn is_date_token(token: &str) -> bool {
    token.len() == 8 && token.bytes().all(|b| b.is_ascii_digit())
}

// ── Registry ─────────────────────────────────────────────────────

/// Fixed-order grammar table. Exactly one grammar must accept an
/// instruction; zero acceptances is user error, while multiple acceptances
/// mean the registered grammars are not mutually exclusive — a registry
/// configuration bug surfaced at dispatch time.
pub struct Registry {
    grammars: Vec<Grammar>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(vec![
            Grammar {
                name: "availability",
                parse: parse_availability,
            },
            Grammar {
                name: "search",
                parse: parse_search,
            },
        ])
    }
}

impl Registry {
    pub fn new(grammars: Vec<Grammar>) -> Self {
        Self { grammars }
    }

    /// Offer `input` to every registered grammar and require exactly one
    /// acceptance. An acceptance with invalid parameters still counts as an
    /// acceptance; its error surfaces only when it is the sole match.
    pub fn dispatch(&self, input: &str, today: NaiveDate) -> Result<Command, DispatchError> {
        let mut accepted: Vec<Result<Command, CommandError>> = self
            .grammars
            .iter()
            .filter_map(|grammar| (grammar.parse)(input, today))
            .collect();
        if accepted.is_empty() {
            return Err(DispatchError::NoMatch);
        }
        if accepted.len() > 1 {
            return Err(DispatchError::Ambiguous(accepted.len()));
        }
        accepted.remove(0).map_err(DispatchError::Command)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum DispatchError {
    /// No registered grammar accepts the instruction.
    NoMatch,
    /// More than one grammar accepts — grammars must be mutually exclusive.
    Ambiguous(usize),
    /// Exactly one grammar accepted, but its parameters were invalid.
    Command(CommandError),
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchError::NoMatch => write!(f, "no matching command"),
            DispatchError::Ambiguous(n) => write!(f, "ambiguous command: {n} grammars accept"),
            DispatchError::Command(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for DispatchError {}
