//! Round state types.

use crate::result::Outcome;

/// Where a round is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    /// Waiting for the player to hit or stand.
    InProgress,
    /// Resolved; the round will not change again.
    Over(Outcome),
}

impl RoundState {
    /// Returns the outcome, if the round is over.
    #[must_use]
    pub const fn outcome(self) -> Option<Outcome> {
        match self {
            Self::InProgress => None,
            Self::Over(outcome) => Some(outcome),
        }
    }

    /// Returns whether the round is over.
    #[must_use]
    pub const fn is_over(self) -> bool {
        matches!(self, Self::Over(_))
    }
}
