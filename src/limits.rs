/// Minimum number of days ahead a search may cover.
pub const MIN_SEARCH_SPAN_DAYS: u32 = 1;

/// Maximum number of days ahead a search may cover (5 years).
pub const MAX_SEARCH_SPAN_DAYS: u32 = 365 * 5;
