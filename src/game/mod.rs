//! Round engine and session state.

use crate::error::ActionError;
use crate::options::GameOptions;
use crate::result::RoundResult;
use crate::shoe::Shoe;

mod actions;
mod bet;
mod dealer;
mod round;
pub mod state;

pub use bet::{parse_bet, validate_bet};
pub use round::Round;
pub use state::RoundState;

/// A player's seat at the table: the shoe and the one active round.
///
/// The session owns the shoe, which persists across rounds, and holds at
/// most one round at a time. It does not track money; the balance belongs
/// to the server and is passed in when a bet is placed.
#[derive(Debug, Clone)]
pub struct Session {
    /// House rules.
    pub options: GameOptions,
    shoe: Shoe,
    round: Option<Round>,
    next_round_id: u64,
}

impl Session {
    /// Creates a new session with a freshly shuffled shoe.
    ///
    /// # Example
    ///
    /// ```
    /// use clubjack::{GameOptions, Session};
    ///
    /// let session = Session::new(GameOptions::default(), 42);
    /// assert_eq!(session.cards_remaining(), 312);
    /// ```
    #[must_use]
    pub fn new(options: GameOptions, seed: u64) -> Self {
        let shoe = Shoe::new(options.decks, seed);
        Self::with_shoe(options, shoe)
    }

    /// Creates a session drawing from an existing shoe.
    #[must_use]
    pub const fn with_shoe(options: GameOptions, shoe: Shoe) -> Self {
        Self {
            options,
            shoe,
            round: None,
            next_round_id: 1,
        }
    }

    /// Returns the current round, finished or not.
    #[must_use]
    pub const fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// Returns the settled result of the current round, once it is over.
    #[must_use]
    pub fn result(&self) -> Option<RoundResult> {
        self.round.as_ref()?.result(&self.options)
    }

    /// Returns the shoe.
    #[must_use]
    pub const fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    /// Returns the shoe for stacking or reshuffling between rounds.
    pub const fn shoe_mut(&mut self) -> &mut Shoe {
        &mut self.shoe
    }

    /// Returns the number of cards remaining in the shoe.
    #[must_use]
    pub fn cards_remaining(&self) -> usize {
        self.shoe.remaining()
    }

    /// Clears a finished round so the table is ready for the next bet.
    ///
    /// The shoe is kept. Clearing an empty table is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::RoundInProgress`] if the round is still being
    /// played.
    pub fn clear_round(&mut self) -> Result<(), ActionError> {
        if self.round.as_ref().is_some_and(|round| !round.is_over()) {
            return Err(ActionError::RoundInProgress);
        }
        self.round = None;
        Ok(())
    }
}
