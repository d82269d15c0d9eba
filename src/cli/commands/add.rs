//! `twofabackup add` — encrypt backup codes and store them under a service name.

use std::io;
use std::path::Path;

use crate::cli::keys::TerminalKeyProvider;
use crate::cli::output;
use crate::cli::{database_path, read_cleartext, Cli};
use crate::errors::Result;
use crate::vault::{add_service, VaultStore};

/// Execute the `add` command.
pub fn execute(
    cli: &Cli,
    name: &str,
    description: Option<&str>,
    file: Option<&Path>,
) -> Result<()> {
    let cleartext = read_cleartext(file)?;

    let path = database_path(cli)?;
    let mut store = VaultStore::open(&path)?;

    let mut keys = TerminalKeyProvider::new(io::stdout());
    let id = add_service(&mut store, &mut keys, name, description, &cleartext)?;

    output::success(&format!(
        "Added {} to the vault (id {id}, {} total)",
        name.trim(),
        store.count()?
    ));

    Ok(())
}
