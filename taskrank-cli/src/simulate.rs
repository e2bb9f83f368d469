/// Simulate command: checks how well a round-robin Elo session recovers a known order.
///
/// Synthetic tasks get a hidden true rank. A simulated judge prefers the truly
/// better task with probability `accuracy`, and the engine runs exactly as it
/// would with a person answering. The result is scored with Spearman's rank
/// correlation between true and recovered order.
use std::future::{Future, ready};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use taskrank_core::{
    Choice, ChoiceProvider, ComparisonEngine, Item, Matchup, NoticeChannel, RankingSink, Result,
    SessionOutcome,
};
use tracing::info;

/// Judge that knows every task's true rank (0 = most important).
pub struct SimulatedJudge {
    true_rank: Vec<usize>,
    accuracy: f64,
    rng: StdRng,
}

impl SimulatedJudge {
    /// `accuracy` must be within 0.0..=1.0.
    pub fn new(num_items: usize, accuracy: f64, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut true_rank: Vec<usize> = (0..num_items).collect();
        true_rank.shuffle(&mut rng);
        SimulatedJudge { true_rank, accuracy, rng }
    }

    pub fn true_rank(&self) -> &[usize] {
        &self.true_rank
    }
}

impl ChoiceProvider for SimulatedJudge {
    fn choose(&mut self, matchup: Matchup<'_>) -> impl Future<Output = Choice> {
        let first_is_better =
            self.true_rank[matchup.first.id().index()] < self.true_rank[matchup.second.id().index()];
        let judged_correctly = self.rng.random_bool(self.accuracy);
        ready(Choice::from(first_is_better == judged_correctly))
    }
}

/// Spearman's rank correlation between the true ranks and a ranking's order.
/// 1.0 is a perfect recovery, -1.0 a perfect reversal.
pub fn spearman(true_rank: &[usize], ranking: &[Item]) -> f64 {
    let n = ranking.len();
    if n < 2 {
        return 1.0;
    }

    let sum_sq: f64 = ranking
        .iter()
        .enumerate()
        .map(|(position, item)| {
            let d = position as f64 - true_rank[item.id().index()] as f64;
            d * d
        })
        .sum();

    let n = n as f64;
    1.0 - 6.0 * sum_sq / (n * (n * n - 1.0))
}

/// Labels like "Task 01", zero-padded so they sort naturally.
pub fn synthetic_labels(num_items: usize) -> Vec<String> {
    let width = num_items.to_string().len().max(2);
    (1..=num_items).map(|i| format!("Task {i:0width$}")).collect()
}

pub struct SimulationReport {
    pub spearman: f64,
    pub comparisons: usize,
    pub seed: u64,
}

/// Run one simulated session. `None` when the engine aborted (fewer than two tasks).
pub async fn run_simulation<S, N>(
    engine: &ComparisonEngine,
    num_items: usize,
    accuracy: f64,
    seed: u64,
    sink: &mut S,
    notice: &mut N,
) -> Result<Option<SimulationReport>>
where
    S: RankingSink,
    N: NoticeChannel,
{
    let session = engine.open_session(synthetic_labels(num_items))?;
    let comparisons = session.total_comparisons();
    let mut judge = SimulatedJudge::new(num_items, accuracy, seed);

    info!(num_items, accuracy, seed, comparisons, "running simulated session");

    match session.run(&mut judge, sink, notice).await? {
        SessionOutcome::Aborted => Ok(None),
        SessionOutcome::Ranked(ranking) => Ok(Some(SimulationReport {
            spearman: spearman(judge.true_rank(), &ranking),
            comparisons,
            seed,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskrank_core::{EngineConfig, ItemId, RatingStore};

    fn engine() -> ComparisonEngine {
        ComparisonEngine::new(EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_spearman_extremes() {
        let ranking = RatingStore::initialize(["a", "b", "c", "d"]).unwrap().snapshot();
        assert_eq!(spearman(&[0, 1, 2, 3], &ranking), 1.0);
        assert_eq!(spearman(&[3, 2, 1, 0], &ranking), -1.0);
    }

    #[test]
    fn test_spearman_one_swap() {
        let mut store = RatingStore::initialize(["a", "b", "c"]).unwrap();
        store.apply_delta(ItemId::from(0), 3.0).unwrap();
        store.apply_delta(ItemId::from(1), 2.0).unwrap();
        // Recovered a, b, c but the truth is b, a, c: d² sums to 2.
        assert!((spearman(&[1, 0, 2], &store.snapshot()) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_synthetic_labels_are_padded() {
        assert_eq!(synthetic_labels(3), vec!["Task 01", "Task 02", "Task 03"]);
        assert_eq!(synthetic_labels(120)[0], "Task 001");
    }

    #[test]
    fn test_judge_is_reproducible_from_seed() {
        assert_eq!(SimulatedJudge::new(20, 0.7, 9).true_rank(), SimulatedJudge::new(20, 0.7, 9).true_rank());
    }

    #[tokio::test]
    async fn test_perfect_judge_recovers_true_order() {
        for seed in 0..5 {
            let report = run_simulation(&engine(), 8, 1.0, seed, &mut |_: &[Item]| {}, &mut |_: &str| {})
                .await
                .unwrap()
                .unwrap();
            assert_eq!(report.comparisons, 28);
            assert!((report.spearman - 1.0).abs() < 1e-12, "seed {seed}: {}", report.spearman);
        }
    }

    #[tokio::test]
    async fn test_contrary_judge_reverses_order() {
        let report = run_simulation(&engine(), 6, 0.0, 3, &mut |_: &[Item]| {}, &mut |_: &str| {})
            .await
            .unwrap()
            .unwrap();
        assert!((report.spearman + 1.0).abs() < 1e-12, "got {}", report.spearman);
    }

    #[tokio::test]
    async fn test_single_task_simulation_aborts() {
        let mut notices = Vec::new();
        let report = run_simulation(&engine(), 1, 1.0, 0, &mut |_: &[Item]| {}, &mut |m: &str| {
            notices.push(m.to_string())
        })
        .await
        .unwrap();
        assert!(report.is_none());
        assert_eq!(notices.len(), 1);
    }
}
