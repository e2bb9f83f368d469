/// taskrank-core: rank tasks by asking "which matters more?" one pair at a time.
///
/// Every pair of tasks is compared exactly once (full round-robin) and each
/// answer moves both tasks' Elo ratings. When the schedule runs out, tasks are
/// ranked by rating. No IO here: the host supplies the questions' answers, the
/// place the ranking goes, and a way to tell the user something.
///
/// # Quick start
///
/// ```rust
/// use std::future::ready;
/// use taskrank_core::{Choice, ComparisonEngine, EngineConfig, Item, Matchup, SessionOutcome};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), taskrank_core::RankError> {
/// let engine = ComparisonEngine::new(EngineConfig::default())?;
/// let session = engine.open_session(["Buy milk", "Write report", "Call dentist"])?;
///
/// // Always prefer the longer label.
/// let mut chooser = |m: Matchup<'_>| ready(Choice::from(m.first.label().len() >= m.second.label().len()));
/// let mut show = |ranking: &[Item]| {
///     for item in ranking {
///         println!("{} (Rating: {})", item.label(), item.display_rating());
///     }
/// };
/// let mut notice = |message: &str| eprintln!("{message}");
///
/// let outcome = session.run(&mut chooser, &mut show, &mut notice).await?;
/// assert!(matches!(outcome, SessionOutcome::Ranked(_)));
/// # Ok(())
/// # }
/// ```

pub mod collab;
pub mod constants;
pub mod elo;
pub mod engine;
pub mod error;
pub mod schedule;
pub mod store;
pub mod types;

// Re-export primary public API at crate root.
pub use collab::{ChoiceProvider, NoticeChannel, RankingSink};
pub use constants::{INITIAL_RATING, K_FACTOR, MAX_K_FACTOR, NOT_ENOUGH_TASKS};
pub use elo::{RatingUpdate, expected_score, rating_deltas};
pub use engine::{ComparisonEngine, EngineConfig, EngineState, Session, SessionOutcome};
pub use error::{RankError, Result};
pub use schedule::{RoundRobin, total_comparisons};
pub use store::RatingStore;
pub use types::{Choice, Item, ItemId, Matchup};
