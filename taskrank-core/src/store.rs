/// Rating store: the authoritative list of tasks and their ratings for one session.
///
/// Tasks are stored in submission order and an `ItemId` is simply the index
/// into that order, so lookups never search.
use crate::constants::INITIAL_RATING;
use crate::error::{RankError, Result};
use crate::types::{Item, ItemId};

#[derive(Debug, Clone)]
pub struct RatingStore {
    items: Vec<Item>,
}

impl RatingStore {
    /// Create one task per non-blank label, in input order, each rated `INITIAL_RATING`.
    pub fn initialize<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::initialize_with_rating(labels, INITIAL_RATING)
    }

    /// Same as `initialize`, with a caller-chosen starting rating.
    pub fn initialize_with_rating<I, S>(labels: I, initial_rating: f64) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let items: Vec<Item> = labels
            .into_iter()
            .map(|label| label.as_ref().trim().to_string())
            .filter(|label| !label.is_empty())
            .enumerate()
            .map(|(index, label)| Item::new(ItemId::from(index), label, initial_rating))
            .collect();

        if items.is_empty() {
            return Err(RankError::EmptyInput);
        }
        Ok(RatingStore { items })
    }

    pub fn get(&self, id: ItemId) -> Result<&Item> {
        self.items.get(id.index()).ok_or(RankError::UnknownId(id))
    }

    /// Add `delta` to a task's rating. No clamping: ratings may drift as far as
    /// the comparisons push them.
    pub fn apply_delta(&mut self, id: ItemId, delta: f64) -> Result<()> {
        let item = self
            .items
            .get_mut(id.index())
            .ok_or(RankError::UnknownId(id))?;
        *item.rating_mut() += delta;
        debug_assert!(item.rating().is_finite(), "rating of task {id} became non-finite");
        Ok(())
    }

    /// Tasks sorted by rating, highest first. Equal ratings keep submission order.
    pub fn snapshot(&self) -> Vec<Item> {
        let mut ranked = self.items.clone();
        ranked.sort_by(|a, b| b.rating().total_cmp(&a.rating()));
        ranked
    }

    /// Tasks in submission order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all ratings. Each pairwise update leaves this unchanged.
    pub fn total_rating(&self) -> f64 {
        self.items.iter().map(Item::rating).sum()
    }
}
