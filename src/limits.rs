//! Hard input limits. Requests beyond these are rejected with
//! `EngineError::LimitExceeded` before any state is touched.

/// Max bookings held on a single resource's ledger.
pub const MAX_BOOKINGS_PER_RESOURCE: usize = 10_000;

/// Widest booking range accepted, in calendar days (~10 years).
pub const MAX_RANGE_DAYS: i64 = 3_660;

/// Widest capacity pre-check window, in calendar days.
pub const MAX_QUERY_WINDOW_DAYS: i64 = 3_660;
