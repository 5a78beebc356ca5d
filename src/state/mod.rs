//! Persisted post-ledger state.
//!
//! The ledger maps a listing's stable key to the time it was last posted.
//! It backs the repost-suppression gate: a key is only written after a
//! confirmed webhook delivery, and records past the retention horizon are
//! pruned to bound file growth.

pub mod ledger;
pub mod local;

use async_trait::async_trait;

use crate::error::Result;

pub use ledger::{GateDecision, PostLedger, PostRecord};
pub use local::LocalLedgerStore;

/// Trait for ledger persistence backends.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Load the ledger, returning an empty one on first run.
    async fn load(&self) -> Result<PostLedger>;

    /// Persist the ledger.
    async fn save(&self, ledger: &PostLedger) -> Result<()>;
}
