//! Terminal key acquisition: show a new key, or ask for the existing one.

use std::io::Write;

use console::style;
use zeroize::Zeroizing;

use crate::crypto::KeyProvider;
use crate::errors::{Result, TwoFaError};

/// Environment variable consulted before prompting for the vault key.
pub const KEY_ENV_VAR: &str = "TWOFABACKUP_KEY";

/// `KeyProvider` backed by the terminal.
///
/// A generated key is written to `out`.  An existing key is read from
/// `TWOFABACKUP_KEY` if set, otherwise from a masked prompt.
pub struct TerminalKeyProvider<W: Write> {
    out: W,
}

impl<W: Write> TerminalKeyProvider<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> KeyProvider for TerminalKeyProvider<W> {
    fn announce_new_key(&mut self, encoded_key: &str) -> Result<()> {
        writeln!(self.out, "Your key is {}", style(encoded_key).blue().bold())?;
        writeln!(
            self.out,
            "{}",
            style("Save this key carefully! It is not stored anywhere and cannot be recovered.")
                .yellow()
        )?;
        self.out.flush()?;
        Ok(())
    }

    fn request_key(&mut self) -> Result<Zeroizing<String>> {
        if let Ok(key) = std::env::var(KEY_ENV_VAR) {
            if !key.is_empty() {
                return Ok(Zeroizing::new(key));
            }
        }

        let key = dialoguer::Password::new()
            .with_prompt("Provide your encryption key")
            .interact()
            .map_err(|e| TwoFaError::CommandFailed(format!("key prompt: {e}")))?;
        Ok(Zeroizing::new(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn announce_writes_key_to_sink() {
        let mut buf = Vec::new();
        TerminalKeyProvider::new(&mut buf)
            .announce_new_key("c2VjcmV0")
            .unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Your key is"));
        assert!(text.contains("c2VjcmV0"));
        assert!(text.contains("Save this key carefully"));
    }
}
