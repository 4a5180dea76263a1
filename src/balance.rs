//! The last balance reported by the server.

extern crate alloc;

use alloc::sync::Arc;

use crate::sync::Mutex;

/// A balance value together with how many times it has been written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BalanceSnapshot {
    /// The authoritative balance, or `None` before the first sync.
    pub balance: Option<i64>,
    /// Incremented on every write.
    pub revision: u64,
}

/// Shared handle to the last authoritative balance.
///
/// Clones point at the same value. Settlement tasks write to it whenever a
/// response arrives, possibly after the next round has started; the latest
/// write wins.
#[derive(Debug, Clone)]
pub struct BalanceCell {
    inner: Arc<Mutex<BalanceSnapshot>>,
}

impl BalanceCell {
    /// Creates a cell with no known balance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(BalanceSnapshot::default())),
        }
    }

    /// Creates a cell holding `balance`.
    #[must_use]
    pub fn with_balance(balance: i64) -> Self {
        let cell = Self::new();
        cell.set(balance);
        cell
    }

    /// Returns the last known balance.
    #[must_use]
    pub fn get(&self) -> Option<i64> {
        self.inner.lock().balance
    }

    /// Returns the balance and its revision.
    #[must_use]
    pub fn snapshot(&self) -> BalanceSnapshot {
        *self.inner.lock()
    }

    /// Stores a new authoritative balance and returns the new revision.
    pub fn set(&self, balance: i64) -> u64 {
        let mut snapshot = self.inner.lock();
        snapshot.balance = Some(balance);
        snapshot.revision += 1;
        snapshot.revision
    }
}

impl Default for BalanceCell {
    fn default() -> Self {
        Self::new()
    }
}
