// src/config.rs

//! Configuration and data-directory layout.
//!
//! Everything the monitor persists lives under a single data directory:
//!
//! ```text
//! data/
//! ├── config.toml    # Monitor configuration
//! └── ledger.json    # Post ledger
//! ```

use std::path::{Path, PathBuf};

use crate::models::Config;

/// Config file name under the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Ledger file name under the data directory.
pub const LEDGER_FILE: &str = "ledger.json";

/// Path of the config file under `data_dir`.
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}

/// Path of the ledger file under `data_dir`.
pub fn ledger_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LEDGER_FILE)
}

/// Load configuration from the data directory, falling back to defaults.
pub fn load_config(data_dir: &Path) -> Config {
    Config::load_or_default(config_path(data_dir))
}
