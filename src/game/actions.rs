use crate::card::Card;
use crate::error::ActionError;
use crate::result::Outcome;

use super::Session;

impl Session {
    /// Player action: Hit (draw a card).
    ///
    /// If the new card takes the hand over 21 the round ends as a bust.
    ///
    /// # Errors
    ///
    /// Returns an error if no round has been dealt or the round is over.
    pub fn hit(&mut self) -> Result<Card, ActionError> {
        self.round
            .as_mut()
            .ok_or(ActionError::NoRound)?
            .hit(&mut self.shoe)
    }

    /// Player action: Stand.
    ///
    /// The dealer then draws until reaching 17 and the round is resolved.
    ///
    /// # Errors
    ///
    /// Returns an error if no round has been dealt or the round is over.
    pub fn stand(&mut self) -> Result<Outcome, ActionError> {
        self.round
            .as_mut()
            .ok_or(ActionError::NoRound)?
            .stand(&mut self.shoe, &self.options)
    }
}
