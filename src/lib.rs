//! The clubhouse blackjack table, with optional `no_std` support.
//!
//! The crate provides a [`Session`] that deals rounds from a persistent
//! six-deck [`Shoe`], resolves hit/stand play against the dealer and
//! computes the payout of each finished round. Money is never tracked
//! locally: with the `client` feature a [`Table`] reports every finished
//! round to the game server and takes the balance it answers with.
//!
//! # Example
//!
//! ```
//! use clubjack::{GameOptions, Session};
//!
//! let mut session = Session::new(GameOptions::default(), 42);
//! let round = session.start_round(100, 2_450_000).unwrap();
//! assert_eq!(round.player().len(), 2);
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(all(not(feature = "std"), not(feature = "alloc")))]
compile_error!(
    "`std` is disabled but `alloc` feature is not enabled. Enable `alloc` or keep `std` enabled."
);

extern crate alloc;

pub mod balance;
pub mod card;
#[cfg(feature = "client")]
#[cfg_attr(docsrs, doc(cfg(feature = "client")))]
pub mod client;
pub mod error;
pub mod game;
pub mod hand;
pub mod options;
pub mod result;
pub mod shoe;
mod sync;
#[cfg(feature = "client")]
#[cfg_attr(docsrs, doc(cfg(feature = "client")))]
pub mod table;

// Re-export main types
pub use balance::{BalanceCell, BalanceSnapshot};
pub use card::{Card, DECK_SIZE, Suit};
#[cfg(feature = "client")]
pub use client::{ClientConfig, ClubhouseClient, Settlement};
pub use error::{ActionError, BetError};
pub use game::{Round, RoundState, Session, parse_bet, validate_bet};
pub use hand::{DealerHand, Hand, Role, hand_total};
pub use options::{GameOptions, RoundingMode};
pub use result::{Outcome, RoundResult};
pub use shoe::Shoe;
#[cfg(feature = "client")]
pub use table::{Notice, NoticeLevel, SettlementHandle, Table};
