use crate::error::BetError;

use super::{Round, Session};

/// Parses a bet typed by the player.
///
/// The whole trimmed input must be a number; trailing text such as
/// `"12abc"` is rejected. Decimal input is truncated toward zero, so
/// `"99.9"` bets 99 and `"0.5"` is rejected as not positive.
///
/// # Errors
///
/// Returns [`BetError::NotANumber`] for text that is not a finite number and
/// [`BetError::NotPositive`] for zero or negative amounts.
///
/// # Example
///
/// ```
/// use clubjack::{BetError, parse_bet};
///
/// assert_eq!(parse_bet(" 250 "), Ok(250));
/// assert_eq!(parse_bet("-5"), Err(BetError::NotPositive));
/// assert_eq!(parse_bet("lots"), Err(BetError::NotANumber));
/// ```
pub fn parse_bet(input: &str) -> Result<u64, BetError> {
    let input = input.trim();

    if let Ok(amount) = input.parse::<i64>() {
        return u64::try_from(amount)
            .ok()
            .filter(|&amount| amount > 0)
            .ok_or(BetError::NotPositive);
    }

    let amount: f64 = input.parse().map_err(|_| BetError::NotANumber)?;
    if !amount.is_finite() {
        return Err(BetError::NotANumber);
    }
    if amount < 1.0 {
        return Err(BetError::NotPositive);
    }
    Ok(amount as u64)
}

/// Checks a bet against the last known balance.
///
/// # Errors
///
/// Returns [`BetError::NotPositive`] for a zero bet and
/// [`BetError::InsufficientFunds`] when the bet exceeds `balance`.
pub const fn validate_bet(bet: u64, balance: i64) -> Result<(), BetError> {
    if bet == 0 {
        return Err(BetError::NotPositive);
    }
    if balance < 0 || bet > balance as u64 {
        return Err(BetError::InsufficientFunds);
    }
    Ok(())
}

impl Session {
    /// Places a bet and deals a new round.
    ///
    /// `balance` is the caller's last known balance. It is only used to
    /// reject bets that could not be covered; the session never tracks
    /// money itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the bet is zero, exceeds `balance`, or the
    /// previous round has not finished. Nothing changes on error.
    pub fn start_round(&mut self, bet: u64, balance: i64) -> Result<&Round, BetError> {
        if self.round.as_ref().is_some_and(|round| !round.is_over()) {
            return Err(BetError::RoundInProgress);
        }
        validate_bet(bet, balance)?;

        let id = self.next_round_id;
        self.next_round_id += 1;
        tracing::debug!(round = id, bet, "dealing round");

        let round = Round::deal(id, bet, &mut self.shoe, &self.options);
        Ok(&*self.round.insert(round))
    }
}
