/// Elo rating update for a single pairwise decision.
///
/// Both deltas are computed from the ratings as they stood before the
/// decision; callers apply them afterwards.
use crate::constants::ELO_SCALE;
use crate::types::Choice;

/// Change to apply to each side of one comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingUpdate {
    pub first: f64,
    pub second: f64,
}

/// Probability that a task rated `rating` is preferred over one rated `opponent_rating`.
pub fn expected_score(rating: f64, opponent_rating: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent_rating - rating) / ELO_SCALE))
}

/// Deltas for both tasks after `choice`, scaled by `k_factor`.
///
/// `first + second` is zero up to rounding: what one side gains the other loses.
pub fn rating_deltas(first_rating: f64, second_rating: f64, choice: Choice, k_factor: f64) -> RatingUpdate {
    let expected_first = expected_score(first_rating, second_rating);
    let expected_second = 1.0 - expected_first;

    let (actual_first, actual_second) = match choice {
        Choice::First => (1.0, 0.0),
        Choice::Second => (0.0, 1.0),
    };

    RatingUpdate {
        first: k_factor * (actual_first - expected_first),
        second: k_factor * (actual_second - expected_second),
    }
}
