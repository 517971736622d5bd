//! Parsing and validation of `kiln.toml` run configuration files.
//!
//! A configuration supplies defaults for the command line: which
//! architecture file to read, the routing mode, how to size the grid and how
//! large the circuit is. [`resolve_settings`] merges command-line overrides
//! over those defaults into a [`ResolvedSettings`].

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{find_config, load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::{resolve_settings, Overrides, ResolvedSettings};
pub use types::*;
