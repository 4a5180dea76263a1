//! Round outcomes and payouts.

use core::fmt;

use crate::options::{GameOptions, RoundingMode};

#[cfg(feature = "std")]
fn round_amount(amount: f64, mode: RoundingMode) -> u64 {
    match mode {
        RoundingMode::Up => amount.ceil() as u64,
        RoundingMode::Down => amount.floor() as u64,
        RoundingMode::Nearest => amount.round() as u64,
    }
}

#[cfg(all(not(feature = "std"), feature = "alloc"))]
fn round_amount(amount: f64, mode: RoundingMode) -> u64 {
    match mode {
        RoundingMode::Up => libm::ceil(amount) as u64,
        RoundingMode::Down => libm::floor(amount) as u64,
        RoundingMode::Nearest => libm::round(amount) as u64,
    }
}

/// How a round ended for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Outcome {
    /// Natural 21 on the first two cards.
    Blackjack,
    /// Player went over 21.
    Bust,
    /// Player beat the dealer or the dealer busted.
    Win,
    /// Dealer finished closer to 21.
    Loss,
    /// Equal totals; the bet is returned.
    Push,
}

impl Outcome {
    /// Returns the wire name of the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blackjack => "blackjack",
            Self::Bust => "bust",
            Self::Win => "win",
            Self::Loss => "loss",
            Self::Push => "push",
        }
    }

    /// Returns the signed change to the player's balance for a bet.
    ///
    /// A blackjack pays `bet * options.blackjack_pays`, rounded with
    /// `options.rounding_blackjack`; a win pays even money; a bust or loss
    /// forfeits the bet; a push returns it.
    ///
    /// # Example
    ///
    /// ```
    /// use clubjack::{GameOptions, Outcome};
    ///
    /// let options = GameOptions::default();
    /// assert_eq!(Outcome::Blackjack.payout(100, &options), 150);
    /// assert_eq!(Outcome::Blackjack.payout(25, &options), 37);
    /// assert_eq!(Outcome::Loss.payout(100, &options), -100);
    /// ```
    ///
    /// Amounts past `i64::MAX` saturate.
    #[must_use]
    pub fn payout(self, bet: u64, options: &GameOptions) -> i64 {
        match self {
            Self::Blackjack => {
                let winnings = if (options.blackjack_pays - 1.5).abs() < f64::EPSILON {
                    three_to_two(bet, options.rounding_blackjack)
                } else {
                    #[expect(
                        clippy::cast_precision_loss,
                        reason = "f64 has sufficient precision for monetary values"
                    )]
                    let winnings = (bet as f64) * options.blackjack_pays;
                    u128::from(round_amount(winnings, options.rounding_blackjack))
                };
                i64::try_from(winnings).unwrap_or(i64::MAX)
            }
            Self::Win => saturating_amount(bet),
            Self::Bust | Self::Loss => -saturating_amount(bet),
            Self::Push => 0,
        }
    }
}

/// Exact `bet * 1.5`, rounded with `mode`.
fn three_to_two(bet: u64, mode: RoundingMode) -> u128 {
    let bet = u128::from(bet);
    let half = match mode {
        RoundingMode::Down => bet / 2,
        RoundingMode::Up | RoundingMode::Nearest => bet.div_ceil(2),
    };
    bet + half
}

fn saturating_amount(bet: u64) -> i64 {
    i64::try_from(bet).unwrap_or(i64::MAX)
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The settled result of a single round.
///
/// This is what gets reported to the balance-holding server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundResult {
    /// Sequence number of the round within its session.
    pub round_id: u64,
    /// The bet amount.
    pub bet: u64,
    /// How the round ended.
    pub outcome: Outcome,
    /// The player's final hand value.
    pub player_value: u8,
    /// The dealer's final hand value.
    pub dealer_value: u8,
    /// Net result (positive = profit, negative = loss).
    pub net: i64,
}

impl fmt::Display for RoundResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            Outcome::Blackjack => f.write_str("BLACKJACK! 21 on two cards!")?,
            Outcome::Bust => f.write_str("BUST! Went over 21.")?,
            Outcome::Win => write!(
                f,
                "YOU WIN! You have {}, dealer has {}",
                self.player_value, self.dealer_value
            )?,
            Outcome::Loss => f.write_str("YOU LOSE. The dealer's hand was better.")?,
            Outcome::Push => write!(f, "PUSH! Both have {}", self.player_value)?,
        }
        write!(f, " ({:+})", self.net)
    }
}
