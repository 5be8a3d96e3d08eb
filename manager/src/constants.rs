//! Application-wide constants for intervals, limits, and defaults.

/// Scheduler tick constants
pub mod scheduler {
    /// Default interval between scheduler ticks
    pub const DEFAULT_TICK_INTERVAL_SECONDS: u64 = 60;
}

/// Maintenance window constants
pub mod maintenance {
    /// Extension applied to the end time when a forced early start would
    /// otherwise leave no remaining duration
    pub const START_NOW_GRACE_MINUTES: i64 = 60;

    /// How far ahead the upcoming-windows listing looks
    pub const UPCOMING_HORIZON_HOURS: i64 = 48;
}

/// Listing pagination constants
pub mod pagination {
    /// Page size used when the caller does not supply one
    pub const DEFAULT_PAGE_SIZE: u32 = 20;

    /// Hard cap on the page size a caller may request
    pub const MAX_PAGE_SIZE: u32 = 100;
}
