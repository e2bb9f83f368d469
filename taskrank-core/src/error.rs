use thiserror::Error;

use crate::types::ItemId;

/// Everything that can go wrong while setting up or driving a ranking session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RankError {
    /// Every submitted label was blank. No session is created.
    #[error("no tasks provided: every entry was blank")]
    EmptyInput,

    /// Fewer than two tasks, so there is no pair to compare.
    #[error("need at least 2 tasks to compare, got {found}")]
    InsufficientItems { found: usize },

    /// A lookup or update named an id the store never issued.
    #[error("unknown task id: {0}")]
    UnknownId(ItemId),

    #[error("invalid engine setting {field} = {value}: {reason}")]
    InvalidConfig {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, RankError>;
