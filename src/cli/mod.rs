//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod keys;
pub mod output;

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::config::{config_dir, Settings};
use crate::errors::{Result, TwoFaError};

/// twofabackup CLI: encrypted 2FA backup codes storage.
#[derive(Parser)]
#[command(
    name = "twofabackup",
    about = "Encrypted 2FA backup codes storage",
    version,
    disable_version_flag = true
)]
pub struct Cli {
    /// Print version
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    pub version: Option<bool>,

    /// Without a subcommand every stored service is decrypted and shown.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Vault database file (default: ~/.config/2FA_codes.db)
    #[arg(long, env = "TWOFABACKUP_DB", global = true)]
    pub database: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Add backup codes for a service from a text file or stdin
    Add {
        /// Name of the service
        #[arg(short, long)]
        name: String,

        /// Optional description of the service
        #[arg(short, long)]
        description: Option<String>,

        /// Text file with backup codes (omit or use `-` for stdin)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Decrypt and show all stored services
    List,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolve the vault database path, trying in order:
/// 1. `--database` / `TWOFABACKUP_DB`
/// 2. `database` in `~/.config/twofabackup.toml`
/// 3. `~/.config/2FA_codes.db`
pub fn database_path(cli: &Cli) -> Result<PathBuf> {
    if let Some(path) = &cli.database {
        return Ok(path.clone());
    }

    let dir = config_dir()?;
    let settings = Settings::load(&dir)?;
    Ok(settings.database_path(&dir))
}

/// Read the backup codes to store, from `file` or from stdin.
///
/// Surrounding whitespace is stripped.  Empty input is rejected.
pub fn read_cleartext(file: Option<&Path>) -> Result<String> {
    let raw = match file {
        Some(path) if path != Path::new("-") => fs::read_to_string(path).map_err(|e| {
            TwoFaError::InvalidInput(format!("cannot read {}: {e}", path.display()))
        })?,
        _ => {
            if io::stdin().is_terminal() {
                output::info("Paste the backup codes, then press Ctrl-D.");
            }
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| TwoFaError::InvalidInput(format!("cannot read stdin: {e}")))?;
            buf
        }
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TwoFaError::InvalidInput("no backup codes provided".into()));
    }
    Ok(trimmed.to_string())
}
