//! Error types for game operations.

use thiserror::Error;

/// Errors that can occur when placing a bet and starting a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BetError {
    /// The bet is not a number.
    #[error("bet is not a number")]
    NotANumber,
    /// The bet is zero or negative.
    #[error("bet must be positive")]
    NotPositive,
    /// The bet exceeds the available balance.
    #[error("insufficient funds")]
    InsufficientFunds,
    /// The previous round has not finished.
    #[error("a round is already in progress")]
    RoundInProgress,
    /// No balance has been fetched yet to check the bet against.
    #[error("balance is unknown")]
    BalanceUnknown,
}

/// Errors that can occur during player actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    /// No round has been started.
    #[error("no round in progress")]
    NoRound,
    /// The round has already been resolved.
    #[error("round is already over")]
    RoundOver,
    /// The round has not been resolved yet.
    #[error("round is still in progress")]
    RoundInProgress,
}
