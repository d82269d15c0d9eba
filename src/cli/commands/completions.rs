//! `twofabackup completions <shell>` — print a shell completion script.
//!
//!   twofabackup completions bash > ~/.local/share/bash-completion/completions/twofabackup

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `completions` command.
pub fn execute(shell: Shell) -> Result<()> {
    write_script(shell, &mut io::stdout())
}

fn write_script<W: Write>(shell: Shell, out: &mut W) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "twofabackup", out);
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bash_script_mentions_subcommands() {
        let mut buf = Vec::new();
        write_script(Shell::Bash, &mut buf).unwrap();

        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("twofabackup"));
        assert!(script.contains("add"));
        assert!(script.contains("completions"));
    }

    #[test]
    fn every_supported_shell_produces_output() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell, Shell::Elvish] {
            let mut buf = Vec::new();
            write_script(shell, &mut buf).unwrap();
            assert!(!buf.is_empty(), "{shell:?} script is empty");
        }
    }
}
