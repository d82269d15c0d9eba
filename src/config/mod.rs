//! Configuration: optional `twofabackup.toml` and database path resolution.

pub mod settings;

pub use settings::{config_dir, Settings};
