use crate::card::Card;
use crate::error::ActionError;
use crate::hand::{DealerHand, Hand, Role};
use crate::options::GameOptions;
use crate::result::{Outcome, RoundResult};
use crate::shoe::Shoe;

use super::dealer::{dealer_play, resolve};
use super::state::RoundState;

/// A single round: one bet, the player's hand and the dealer's hand.
///
/// The round owns both hands but only borrows the shoe for the duration of
/// each transition, so the same shoe carries over from round to round.
#[derive(Debug, Clone)]
pub struct Round {
    id: u64,
    bet: u64,
    player: Hand,
    dealer: DealerHand,
    state: RoundState,
}

impl Round {
    /// Deals a new round: two cards to the player, then two to the dealer.
    ///
    /// A two-card 21 for the player ends the round at once as a blackjack.
    /// With `dealer_peek` the dealer's natural is checked first and ends the
    /// round as a push or a loss.
    pub(crate) fn deal(id: u64, bet: u64, shoe: &mut Shoe, options: &GameOptions) -> Self {
        let mut player = Hand::new();
        let mut dealer = DealerHand::new();

        player.add_card(shoe.draw());
        player.add_card(shoe.draw());
        dealer.add_card(shoe.draw());
        dealer.add_card(shoe.draw());

        let mut round = Self {
            id,
            bet,
            player,
            dealer,
            state: RoundState::InProgress,
        };

        if options.dealer_peek && round.dealer.is_blackjack() {
            let outcome = if round.player.is_blackjack() {
                Outcome::Push
            } else {
                Outcome::Loss
            };
            round.finish(outcome);
        } else if round.player.is_blackjack() {
            round.finish(Outcome::Blackjack);
        }

        round
    }

    fn ensure_in_progress(&self) -> Result<(), ActionError> {
        if self.state.is_over() {
            return Err(ActionError::RoundOver);
        }
        Ok(())
    }

    fn finish(&mut self, outcome: Outcome) {
        self.dealer.reveal_hole();
        self.state = RoundState::Over(outcome);
        tracing::debug!(
            round = self.id,
            %outcome,
            player = self.player.value(),
            dealer = self.dealer.value(),
            "round resolved"
        );
    }

    /// Draws a card for the player. Going over 21 ends the round as a bust.
    pub(crate) fn hit(&mut self, shoe: &mut Shoe) -> Result<Card, ActionError> {
        self.ensure_in_progress()?;

        let card = shoe.draw();
        self.player.add_card(card);

        if self.player.is_bust() {
            self.finish(Outcome::Bust);
        }

        Ok(card)
    }

    /// Ends the player's turn, plays out the dealer and resolves the round.
    pub(crate) fn stand(
        &mut self,
        shoe: &mut Shoe,
        options: &GameOptions,
    ) -> Result<Outcome, ActionError> {
        self.ensure_in_progress()?;

        self.dealer.reveal_hole();
        let drawn = dealer_play(&mut self.dealer, shoe, options);
        tracing::trace!(round = self.id, drawn = drawn.len(), "dealer finished");

        let outcome = resolve(self.player.value(), self.dealer.value());
        self.finish(outcome);
        Ok(outcome)
    }

    /// Returns the round's sequence number within its session.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Returns the bet amount.
    #[must_use]
    pub const fn bet(&self) -> u64 {
        self.bet
    }

    /// Returns the player's hand.
    #[must_use]
    pub const fn player(&self) -> &Hand {
        &self.player
    }

    /// Returns the dealer's hand.
    #[must_use]
    pub const fn dealer(&self) -> &DealerHand {
        &self.dealer
    }

    /// Returns the full value of one side's hand.
    #[must_use]
    pub fn value(&self, role: Role) -> u8 {
        match role {
            Role::Player => self.player.value(),
            Role::Dealer => self.dealer.value(),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> RoundState {
        self.state
    }

    /// Returns the outcome, if the round is over.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.state.outcome()
    }

    /// Returns whether the round is over.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// Returns the settled result, or `None` while the round is in progress.
    #[must_use]
    pub fn result(&self, options: &GameOptions) -> Option<RoundResult> {
        let outcome = self.outcome()?;
        Some(RoundResult {
            round_id: self.id,
            bet: self.bet,
            outcome,
            player_value: self.value(Role::Player),
            dealer_value: self.value(Role::Dealer),
            net: outcome.payout(self.bet, options),
        })
    }
}
