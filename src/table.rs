//! A seat at the clubhouse table wired to the game server.
//!
//! [`Table`] drives a [`Session`] and reports every finished round to the
//! server in a background task. The server's answer is the only source of
//! the player's balance: it lands in a shared [`BalanceCell`], and a
//! [`Notice`] goes out on the notification channel either way.

extern crate alloc;

use alloc::format;
use alloc::string::String;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::balance::BalanceCell;
use crate::card::Card;
use crate::client::{ClubhouseClient, Result};
use crate::error::{ActionError, BetError};
use crate::game::{Round, Session};
use crate::result::RoundResult;

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Informational.
    Info,
    /// Something failed.
    Error,
}

/// A message for the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Text to show.
    pub message: String,
}

impl Notice {
    fn info(message: String) -> Self {
        Self {
            level: NoticeLevel::Info,
            message,
        }
    }

    fn error(message: String) -> Self {
        Self {
            level: NoticeLevel::Error,
            message,
        }
    }
}

/// A settlement running in the background.
///
/// Dropping the handle does not cancel the settlement.
#[derive(Debug)]
pub struct SettlementHandle {
    round_id: u64,
    handle: JoinHandle<Result<i64>>,
}

impl SettlementHandle {
    /// Returns the round being settled.
    #[must_use]
    pub const fn round_id(&self) -> u64 {
        self.round_id
    }

    /// Waits for the server's answer and returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns the settlement error, or [`crate::client::Error::Join`] if
    /// the task did not run to completion.
    pub async fn wait(self) -> Result<i64> {
        self.handle.await?
    }
}

/// A session whose rounds are settled against the game server.
#[derive(Debug)]
pub struct Table {
    session: Session,
    client: ClubhouseClient,
    balance: BalanceCell,
    session_id: u64,
    last_submitted: Option<u64>,
    notices: mpsc::UnboundedSender<Notice>,
}

impl Table {
    /// Creates a table and the receiving end of its notification channel.
    ///
    /// `session_id` prefixes the idempotency key of every settlement, so it
    /// should differ between sessions that share a server.
    #[must_use]
    pub fn new(
        session: Session,
        client: ClubhouseClient,
        session_id: u64,
    ) -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (notices, receiver) = mpsc::unbounded_channel();
        let table = Self {
            session,
            client,
            balance: BalanceCell::new(),
            session_id,
            last_submitted: None,
            notices,
        };
        (table, receiver)
    }

    /// Returns the underlying session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the underlying session, e.g. to stack the shoe.
    pub const fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Returns the shared balance cell.
    #[must_use]
    pub const fn balance(&self) -> &BalanceCell {
        &self.balance
    }

    /// Fetches the balance from the server and stores it.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot be reached or answers badly.
    /// The stored balance is left as it was.
    pub async fn refresh_balance(&self) -> Result<i64> {
        let cash = self.client.balance().await?;
        self.balance.set(cash);
        Ok(cash)
    }

    /// Places a bet against the last fetched balance and deals.
    ///
    /// A natural blackjack ends the round immediately, in which case its
    /// settlement is returned.
    ///
    /// # Errors
    ///
    /// Returns [`BetError::BalanceUnknown`] before the first balance fetch,
    /// and any error from [`Session::start_round`].
    ///
    /// # Panics
    ///
    /// Panics if the round ends immediately and this is called outside a
    /// Tokio runtime.
    pub fn start_round(&mut self, bet: u64) -> Result<Option<SettlementHandle>> {
        let balance = self.balance.get().ok_or(BetError::BalanceUnknown)?;
        self.session.start_round(bet, balance)?;
        Ok(self.settle_if_over())
    }

    /// Hits; a bust starts the settlement.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no round in progress.
    ///
    /// # Panics
    ///
    /// Panics if the round ends and this is called outside a Tokio runtime.
    pub fn hit(&mut self) -> Result<(Card, Option<SettlementHandle>)> {
        let card = self.session.hit()?;
        Ok((card, self.settle_if_over()))
    }

    /// Stands, lets the dealer play and starts the settlement.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no round in progress.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn stand(&mut self) -> Result<SettlementHandle> {
        self.session.stand()?;
        let result = self.session.result().ok_or(ActionError::RoundInProgress)?;
        self.last_submitted = Some(result.round_id);
        Ok(self.spawn_settlement(result))
    }

    /// Returns the current round.
    #[must_use]
    pub const fn round(&self) -> Option<&Round> {
        self.session.round()
    }

    /// Clears a finished round. Its settlement, if still running, carries on.
    ///
    /// # Errors
    ///
    /// Returns an error if the round is still being played.
    pub fn clear_round(&mut self) -> Result<()> {
        self.session.clear_round()?;
        Ok(())
    }

    fn settle_if_over(&mut self) -> Option<SettlementHandle> {
        let result = self.session.result()?;
        if self.last_submitted == Some(result.round_id) {
            return None;
        }
        self.last_submitted = Some(result.round_id);
        Some(self.spawn_settlement(result))
    }

    fn spawn_settlement(&self, result: RoundResult) -> SettlementHandle {
        let client = self.client.clone();
        let balance = self.balance.clone();
        let notices = self.notices.clone();
        let key = format!("{}-{}", self.session_id, result.round_id);

        let handle = tokio::spawn(async move {
            match client.settle(&result, &key).await {
                Ok(cash) => {
                    let revision = balance.set(cash);
                    info!(
                        round = result.round_id,
                        outcome = %result.outcome,
                        net = result.net,
                        cash,
                        revision,
                        "round settled"
                    );
                    let _ = notices.send(Notice::info(format!("{result} Balance: {cash}")));
                    Ok(cash)
                }
                Err(err) => {
                    warn!(round = result.round_id, error = %err, "settlement failed");
                    let _ = notices.send(Notice::error(format!(
                        "Could not report the round to the server: {err}"
                    )));
                    Err(err)
                }
            }
        });

        SettlementHandle {
            round_id: result.round_id,
            handle,
        }
    }
}
