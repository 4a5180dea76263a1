//! House rules for the clubhouse table.

/// Rounding mode for payouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundingMode {
    /// Round up.
    Up,
    /// Round down.
    Down,
    /// Round to nearest.
    Nearest,
}

/// House rules for a blackjack table.
///
/// Use the builder pattern to customize options:
///
/// ```
/// use clubjack::GameOptions;
///
/// let options = GameOptions::default()
///     .with_decks(4)
///     .with_blackjack_pays(1.2)
///     .with_stand_on_soft_17(false);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GameOptions {
    /// Number of decks in the shoe.
    pub decks: u8,
    /// Blackjack payout ratio.
    pub blackjack_pays: f64,
    /// Whether dealer stands on soft 17.
    pub stand_on_soft_17: bool,
    /// Whether the dealer checks the hole card for a natural right after
    /// the deal.
    pub dealer_peek: bool,
    /// Rounding mode for blackjack payouts.
    pub rounding_blackjack: RoundingMode,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            decks: 6,
            blackjack_pays: 1.5,
            stand_on_soft_17: true,
            dealer_peek: false,
            rounding_blackjack: RoundingMode::Down,
        }
    }
}

impl GameOptions {
    /// Sets the number of decks.
    ///
    /// # Example
    ///
    /// ```
    /// use clubjack::GameOptions;
    ///
    /// let options = GameOptions::default().with_decks(2);
    /// assert_eq!(options.decks, 2);
    /// ```
    #[must_use]
    pub const fn with_decks(mut self, decks: u8) -> Self {
        self.decks = decks;
        self
    }

    /// Sets the blackjack payout ratio.
    ///
    /// # Example
    ///
    /// ```
    /// use clubjack::GameOptions;
    ///
    /// let options = GameOptions::default().with_blackjack_pays(1.2);
    /// assert_eq!(options.blackjack_pays, 1.2);
    /// ```
    #[must_use]
    pub const fn with_blackjack_pays(mut self, ratio: f64) -> Self {
        self.blackjack_pays = ratio;
        self
    }

    /// Sets whether dealer stands on soft 17.
    ///
    /// # Example
    ///
    /// ```
    /// use clubjack::GameOptions;
    ///
    /// let options = GameOptions::default().with_stand_on_soft_17(false);
    /// assert_eq!(options.stand_on_soft_17, false);
    /// ```
    #[must_use]
    pub const fn with_stand_on_soft_17(mut self, stand: bool) -> Self {
        self.stand_on_soft_17 = stand;
        self
    }

    /// Sets whether the dealer peeks for a natural after the deal.
    ///
    /// # Example
    ///
    /// ```
    /// use clubjack::GameOptions;
    ///
    /// let options = GameOptions::default().with_dealer_peek(true);
    /// assert!(options.dealer_peek);
    /// ```
    #[must_use]
    pub const fn with_dealer_peek(mut self, peek: bool) -> Self {
        self.dealer_peek = peek;
        self
    }

    /// Sets the rounding mode for blackjack payouts.
    ///
    /// # Example
    ///
    /// ```
    /// use clubjack::{GameOptions, RoundingMode};
    ///
    /// let options = GameOptions::default().with_rounding_blackjack(RoundingMode::Up);
    /// assert_eq!(options.rounding_blackjack, RoundingMode::Up);
    /// ```
    #[must_use]
    pub const fn with_rounding_blackjack(mut self, mode: RoundingMode) -> Self {
        self.rounding_blackjack = mode;
        self
    }
}
