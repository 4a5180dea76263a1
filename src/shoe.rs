//! The multi-deck shoe the rounds draw from.

extern crate alloc;

use alloc::vec::Vec;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::card::{Card, DECK_SIZE, Suit};

/// Builds an unshuffled shoe of `decks` standard 52-card decks.
#[must_use]
pub fn build(decks: u8) -> Vec<Card> {
    let mut cards = Vec::with_capacity(decks as usize * DECK_SIZE);

    for _ in 0..decks {
        for suit in Suit::ALL {
            for rank in 1..=13 {
                cards.push(Card::new(suit, rank));
            }
        }
    }

    cards
}

/// Shuffles `cards` in place with Fisher–Yates, walking from the last index
/// down to 1 and swapping each slot with a uniformly chosen slot at or
/// below it.
pub fn shuffle<R: Rng>(cards: &mut [Card], rng: &mut R) {
    for i in (1..cards.len()).rev() {
        let j = rng.random_range(0..=i);
        cards.swap(i, j);
    }
}

/// A continuous shoe that rebuilds itself when it runs dry.
///
/// Cards are drawn from the end of the sequence. The shoe owns its random
/// source, so a given seed always produces the same sequence of draws.
#[derive(Debug, Clone)]
pub struct Shoe {
    cards: Vec<Card>,
    decks: u8,
    reshuffles: u32,
    rng: ChaCha8Rng,
}

impl Shoe {
    /// Creates a freshly shuffled shoe of `decks` decks.
    #[must_use]
    pub fn new(decks: u8, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut cards = build(decks);
        shuffle(&mut cards, &mut rng);

        Self {
            cards,
            decks,
            reshuffles: 0,
            rng,
        }
    }

    /// Draws a card, rebuilding and reshuffling the shoe first if it is
    /// empty.
    ///
    /// A shoe configured with zero decks still yields cards: it is rebuilt
    /// as a single deck.
    pub fn draw(&mut self) -> Card {
        loop {
            if let Some(card) = self.cards.pop() {
                return card;
            }
            self.reshuffle();
        }
    }

    /// Discards the remaining cards and replaces them with a freshly
    /// shuffled shoe.
    pub fn reshuffle(&mut self) {
        let decks = self.decks.max(1);
        let mut cards = build(decks);
        shuffle(&mut cards, &mut self.rng);
        self.cards = cards;
        self.reshuffles += 1;
        tracing::debug!(decks, reshuffles = self.reshuffles, "shoe rebuilt");
    }

    /// Replaces the contents so that `draws` come out in the given order.
    ///
    /// Once the stacked cards are used up the shoe rebuilds itself as usual.
    pub fn stack(&mut self, draws: &[Card]) {
        self.cards = draws.iter().rev().copied().collect();
    }

    /// Returns the number of cards left before the next rebuild.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    /// Returns how many times the shoe has been rebuilt.
    #[must_use]
    pub const fn reshuffles(&self) -> u32 {
        self.reshuffles
    }

    /// Returns the number of decks in a full shoe.
    #[must_use]
    pub const fn decks(&self) -> u8 {
        self.decks
    }

    /// Returns the cards left in the shoe, the next draw last.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}
