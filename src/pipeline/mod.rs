//! Pipeline entry points for monitor operations.
//!
//! - `run_monitor`: sweep profiles, gate, scrape, post, persist the ledger

pub mod freshness;
pub mod monitor;

pub use freshness::{evaluate, Decision, GatePolicy};
pub use monitor::{run_monitor, MonitorOutcome};
