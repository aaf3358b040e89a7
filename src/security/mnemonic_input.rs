use secrecy::SecretString;
use std::io::{BufRead, IsTerminal, Write};
use zeroize::Zeroize;

use crate::error::{DeriveError, Result};

pub const PROMPT: &str = "Enter BIP39 mnemonic: ";

/// Where the phrase for this run comes from.
pub enum MnemonicSource {
    /// Words given on the command line, already joined.
    Arguments(SecretString),
    /// Nothing on the command line; ask once.
    Interactive,
}

impl MnemonicSource {
    /// Arguments are split on whitespace and re-joined with single spaces, so a
    /// quoted phrase and separate words read the same.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Self {
        let joined = args
            .iter()
            .flat_map(|arg| arg.as_ref().split_whitespace())
            .collect::<Vec<_>>()
            .join(" ");
        if joined.is_empty() {
            MnemonicSource::Interactive
        } else {
            MnemonicSource::Arguments(SecretString::new(joined))
        }
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self, MnemonicSource::Interactive)
    }

    pub fn read(self) -> Result<SecretString> {
        match self {
            MnemonicSource::Arguments(phrase) => Ok(phrase),
            MnemonicSource::Interactive => prompt_mnemonic(),
        }
    }
}

/// Hidden prompt on a terminal; a plain line read when stdin is piped.
pub fn prompt_mnemonic() -> Result<SecretString> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        let mut phrase = rpassword::prompt_password(PROMPT)
            .map_err(|e| DeriveError::Input(e.to_string()))?;
        let secret = SecretString::new(phrase.trim().to_string());
        phrase.zeroize();
        Ok(secret)
    } else {
        read_mnemonic_line(&mut stdin.lock(), &mut std::io::stderr())
    }
}

/// Write the prompt to `prompt_out` and read one line from `reader`.
///
/// End of input yields an empty phrase, which then fails validation.
pub fn read_mnemonic_line<R: BufRead, W: Write>(
    reader: &mut R,
    prompt_out: &mut W,
) -> Result<SecretString> {
    prompt_out
        .write_all(PROMPT.as_bytes())
        .and_then(|_| prompt_out.flush())
        .map_err(|e| DeriveError::Input(e.to_string()))?;

    let mut line = String::new();
    reader
        .read_line(&mut line)
        .map_err(|e| DeriveError::Input(e.to_string()))?;
    let secret = SecretString::new(line.trim().to_string());
    line.zeroize();
    Ok(secret)
}
