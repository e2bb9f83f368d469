/// Collaborators the engine talks to. Hosts implement these; the engine
/// does not care whether answers come from a terminal, a GUI or a script.
///
/// Plain closures work for all three: an `FnMut(Matchup) -> impl Future<Output = Choice>`
/// is a `ChoiceProvider`, an `FnMut(&[Item])` is a `RankingSink` and an
/// `FnMut(&str)` is a `NoticeChannel`.
use std::future::Future;

use crate::types::{Choice, Item, Matchup};

/// Asks someone which of two tasks matters more.
///
/// The returned future must eventually resolve with exactly one of the two
/// choices. Waiting is unbounded; a host that gives up drops the session.
pub trait ChoiceProvider {
    fn choose(&mut self, matchup: Matchup<'_>) -> impl Future<Output = Choice>;
}

impl<F, Fut> ChoiceProvider for F
where
    F: FnMut(Matchup<'_>) -> Fut,
    Fut: Future<Output = Choice>,
{
    fn choose(&mut self, matchup: Matchup<'_>) -> impl Future<Output = Choice> {
        self(matchup)
    }
}

/// Receives the final ranking, highest rating first. Called at most once per session.
pub trait RankingSink {
    fn publish(&mut self, ranking: &[Item]);
}

impl<F> RankingSink for F
where
    F: FnMut(&[Item]),
{
    fn publish(&mut self, ranking: &[Item]) {
        self(ranking)
    }
}

/// Fire-and-forget user-facing message.
pub trait NoticeChannel {
    fn notify(&mut self, message: &str);
}

impl<F> NoticeChannel for F
where
    F: FnMut(&str),
{
    fn notify(&mut self, message: &str) {
        self(message)
    }
}
