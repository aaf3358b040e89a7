use bip39::{Error as Bip39Error, Language, Mnemonic};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{DeriveError, Result};

pub const SEED_LEN: usize = 64;

/// Returns true when `phrase` is a valid English BIP39 mnemonic.
pub fn validate(phrase: &str) -> bool {
    parse(phrase).is_ok()
}

/// Parse and checksum-verify an English BIP39 phrase.
pub fn parse(phrase: &str) -> Result<Mnemonic> {
    Mnemonic::parse_in(Language::English, phrase.trim()).map_err(|e| {
        let reason = match e {
            Bip39Error::UnknownWord(index) => format!(
                "unknown word at position {}; check its spelling against the BIP39 English list",
                index + 1
            ),
            Bip39Error::InvalidChecksum => "checksum mismatch: every word is valid, but the \
                 phrase as a whole is not; a word is out of place or mistyped"
                .to_string(),
            Bip39Error::BadWordCount(count) => format!(
                "{} words given; a mnemonic has 12, 15, 18, 21 or 24 words",
                count
            ),
            other => other.to_string(),
        };
        DeriveError::InvalidMnemonic(reason)
    })
}

/// 64-byte BIP39 seed; wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; SEED_LEN]);

impl Seed {
    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Seed(..)")
    }
}

/// PBKDF2-HMAC-SHA512, 2048 rounds, salt `"mnemonic" + passphrase`.
pub fn seed_from_mnemonic(mnemonic: &Mnemonic, passphrase: &str) -> Seed {
    Seed(mnemonic.to_seed(passphrase))
}
