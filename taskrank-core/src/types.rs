use std::fmt;

/// Identifier of a task within one session.
///
/// Ids are the task's position in the submitted list, so they are unique
/// per session and carry no meaning outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ItemId(usize);

impl ItemId {
    /// Position of the task in the submitted list.
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for ItemId {
    fn from(index: usize) -> Self {
        ItemId(index)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A task under comparison.
///
/// The label is fixed at creation. The rating only moves through
/// `RatingStore::apply_delta`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Item {
    id: ItemId,
    label: String,
    rating: f64,
}

impl Item {
    pub(crate) fn new(id: ItemId, label: String, rating: f64) -> Self {
        Item { id, label, rating }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Full-precision rating.
    pub fn rating(&self) -> f64 {
        self.rating
    }

    /// Rating rounded to the nearest integer, for display only.
    pub fn display_rating(&self) -> i64 {
        self.rating.round() as i64
    }

    pub(crate) fn rating_mut(&mut self) -> &mut f64 {
        &mut self.rating
    }
}

/// Outcome of one pairwise question. There is no tie and no abstain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Choice {
    /// The first task shown was preferred.
    First,
    /// The second task shown was preferred.
    Second,
}

impl Choice {
    pub fn first_preferred(self) -> bool {
        matches!(self, Choice::First)
    }
}

impl From<bool> for Choice {
    /// `true` means the first task was preferred.
    fn from(first_preferred: bool) -> Self {
        if first_preferred { Choice::First } else { Choice::Second }
    }
}

/// One scheduled question, as handed to a `ChoiceProvider`.
#[derive(Debug, Clone, Copy)]
pub struct Matchup<'a> {
    pub first: &'a Item,
    pub second: &'a Item,
    /// 1-based position of this question in the schedule.
    pub position: usize,
    /// Number of questions in the whole session.
    pub total: usize,
}
