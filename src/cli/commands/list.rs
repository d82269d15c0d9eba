//! `twofabackup list` — decrypt and display every stored service.

use std::io;

use crate::cli::keys::TerminalKeyProvider;
use crate::cli::output;
use crate::cli::{database_path, Cli};
use crate::errors::Result;
use crate::vault::{decrypt_all, VaultStore};

/// Execute the `list` command (also the default with no subcommand).
pub fn execute(cli: &Cli) -> Result<()> {
    let path = database_path(cli)?;
    let store = VaultStore::open(&path)?;

    let mut keys = TerminalKeyProvider::new(io::stdout());
    let records = decrypt_all(&store, &mut keys)?;

    output::print_services(&mut io::stdout().lock(), &records)?;

    Ok(())
}
