/// Comparison engine: drives one ranking session from first question to final order.
///
/// A session asks one question at a time, in round-robin order, applies the
/// Elo update after every answer and publishes the ranking once the schedule
/// is exhausted. Dropping a running session stops it; nothing is published.
use tracing::{debug, info, trace, warn};

use crate::collab::{ChoiceProvider, NoticeChannel, RankingSink};
use crate::constants::{INITIAL_RATING, K_FACTOR, MAX_K_FACTOR, MIN_ITEMS_TO_COMPARE, NOT_ENOUGH_TASKS};
use crate::elo::{RatingUpdate, rating_deltas};
use crate::error::{RankError, Result};
use crate::schedule::{RoundRobin, total_comparisons};
use crate::store::RatingStore;
use crate::types::{Choice, Item, ItemId, Matchup};

/// Configuration for the comparison engine.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Elo K-factor applied to every comparison.
    pub k_factor: f64,
    /// Rating every task starts with.
    pub initial_rating: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            k_factor: K_FACTOR,
            initial_rating: INITIAL_RATING,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.k_factor.is_finite() || self.k_factor <= 0.0 {
            return Err(RankError::InvalidConfig {
                field: "k_factor",
                value: self.k_factor,
                reason: "must be a positive finite number",
            });
        }
        if self.k_factor > MAX_K_FACTOR {
            return Err(RankError::InvalidConfig {
                field: "k_factor",
                value: self.k_factor,
                reason: "must be at most 1e6",
            });
        }
        if !self.initial_rating.is_finite() {
            return Err(RankError::InvalidConfig {
                field: "initial_rating",
                value: self.initial_rating,
                reason: "must be finite",
            });
        }
        Ok(())
    }
}

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    ValidatingInput,
    /// Too few tasks; terminal.
    Aborted,
    /// Waiting on (or applying) the answer to question `position` of `total`.
    Comparing { position: usize, total: usize },
    Finalizing,
    /// Ranking published; terminal.
    Done,
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// Fewer than two tasks. The notice was posted; the sink was not called.
    Aborted,
    /// Every pair was decided. Holds the ranking that was handed to the sink.
    Ranked(Vec<Item>),
}

pub struct ComparisonEngine {
    config: EngineConfig,
}

impl ComparisonEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(ComparisonEngine { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build a rating store from raw labels and wrap it in a fresh session.
    pub fn open_session<I, S>(&self, labels: I) -> Result<Session>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let store = RatingStore::initialize_with_rating(labels, self.config.initial_rating)?;
        Ok(self.session(store))
    }

    /// Wrap an existing store in a fresh session.
    pub fn session(&self, store: RatingStore) -> Session {
        Session::new(store, self.config.k_factor)
    }

    /// Run a full session over `store`. See `Session::run`.
    pub async fn run<P, S, N>(
        &self,
        store: RatingStore,
        provider: &mut P,
        sink: &mut S,
        notice: &mut N,
    ) -> Result<SessionOutcome>
    where
        P: ChoiceProvider,
        S: RankingSink,
        N: NoticeChannel,
    {
        self.session(store).run(provider, sink, notice).await
    }
}

/// One ranking session: the rating store plus the position in the schedule.
///
/// A session is single-use. It owns its store outright, so nothing else can
/// observe or mutate ratings while questions are outstanding.
pub struct Session {
    store: RatingStore,
    schedule: RoundRobin,
    total: usize,
    completed: usize,
    k_factor: f64,
    state: EngineState,
}

impl Session {
    fn new(store: RatingStore, k_factor: f64) -> Self {
        let total = total_comparisons(store.len());
        Session {
            schedule: RoundRobin::new(store.len()),
            store,
            total,
            completed: 0,
            k_factor,
            state: EngineState::Idle,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn store(&self) -> &RatingStore {
        &self.store
    }

    /// Questions this session will ask in total.
    pub fn total_comparisons(&self) -> usize {
        self.total
    }

    /// Questions answered so far.
    pub fn completed_comparisons(&self) -> usize {
        self.completed
    }

    /// Check there is at least one pair to compare.
    pub fn validate(&self) -> Result<()> {
        let found = self.store.len();
        if found < MIN_ITEMS_TO_COMPARE {
            return Err(RankError::InsufficientItems { found });
        }
        Ok(())
    }

    /// Ask every scheduled question, then publish the ranking.
    ///
    /// With fewer than two tasks the notice channel gets `NOT_ENOUGH_TASKS`
    /// once and the session ends as `Aborted` without asking anything.
    /// Otherwise exactly one question per pair is awaited, in schedule order,
    /// and the sink receives the ranking exactly once.
    pub async fn run<P, S, N>(
        mut self,
        provider: &mut P,
        sink: &mut S,
        notice: &mut N,
    ) -> Result<SessionOutcome>
    where
        P: ChoiceProvider,
        S: RankingSink,
        N: NoticeChannel,
    {
        self.transition(EngineState::ValidatingInput);
        if let Err(err) = self.validate() {
            warn!(%err, "aborting session");
            notice.notify(NOT_ENOUGH_TASKS);
            self.transition(EngineState::Aborted);
            return Ok(SessionOutcome::Aborted);
        }

        info!(num_items = self.store.len(), comparisons = self.total, "starting comparison session");

        while let Some((first, second)) = self.schedule.next() {
            let position = self.completed + 1;
            self.transition(EngineState::Comparing { position, total: self.total });

            let first = ItemId::from(first);
            let second = ItemId::from(second);
            let choice = provider
                .choose(Matchup {
                    first: self.store.get(first)?,
                    second: self.store.get(second)?,
                    position,
                    total: self.total,
                })
                .await;

            self.record(first, second, choice)?;
            self.completed = position;
        }

        self.transition(EngineState::Finalizing);
        let ranking = self.store.snapshot();
        sink.publish(&ranking);
        self.transition(EngineState::Done);

        info!(
            comparisons = self.completed,
            top = ranking.first().map(Item::label),
            "comparison session finished"
        );
        Ok(SessionOutcome::Ranked(ranking))
    }

    /// Apply one decision. Both deltas are computed before either rating moves.
    fn record(&mut self, first: ItemId, second: ItemId, choice: Choice) -> Result<RatingUpdate> {
        let first_rating = self.store.get(first)?.rating();
        let second_rating = self.store.get(second)?.rating();
        let update = rating_deltas(first_rating, second_rating, choice, self.k_factor);

        self.store.apply_delta(first, update.first)?;
        self.store.apply_delta(second, update.second)?;

        debug!(
            %first,
            %second,
            ?choice,
            first_delta = update.first,
            second_delta = update.second,
            "recorded comparison"
        );
        Ok(update)
    }

    fn transition(&mut self, next: EngineState) {
        trace!(from = ?self.state, to = ?next, "session state");
        self.state = next;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let EngineState::Comparing { position, total } = self.state {
            info!(position, total, "session torn down mid-schedule; ratings discarded");
        }
    }
}
