/// Rating every task holds when a session starts.
/// All tasks start equal so the first comparison carries no prior.
pub const INITIAL_RATING: f64 = 1000.0;

/// Elo K-factor: the most a single comparison can move one rating.
pub const K_FACTOR: f64 = 32.0;

/// Largest K-factor an engine accepts. A single comparison moves a rating by
/// less than K, so even a long session stays far from `f64` overflow.
pub const MAX_K_FACTOR: f64 = 1e6;

/// Rating gap at which the stronger task is expected to win ten times out of eleven.
pub const ELO_SCALE: f64 = 400.0;

/// Fewest tasks a session needs before there is anything to compare.
pub const MIN_ITEMS_TO_COMPARE: usize = 2;

/// Notice posted when a session is opened with fewer than `MIN_ITEMS_TO_COMPARE` tasks.
pub const NOT_ENOUGH_TASKS: &str = "Not enough tasks to compare.";
