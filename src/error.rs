use thiserror::Error;

use crate::chain::Chain;

/// Process exit status for a mnemonic that fails BIP39 validation.
pub const EXIT_INVALID_MNEMONIC: u8 = 2;
/// Process exit status for every other fatal error.
pub const EXIT_FATAL: u8 = 3;

#[derive(Debug, Error)]
pub enum DeriveError {
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),
    #[error("invalid derivation path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },
    #[error("{chain} derivation failed at {path}: {reason}")]
    Derivation {
        chain: Chain,
        path: String,
        reason: String,
    },
    #[error("unsupported SS58 network prefix {0}")]
    InvalidSs58Prefix(u16),
    #[error("SS58 decode error: {0}")]
    Ss58Decode(String),
    #[error("ed25519 backend failed its readiness check: {0}")]
    BackendNotReady(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("mnemonic input failed: {0}")]
    Input(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DeriveError {
    pub(crate) fn derivation(chain: Chain, path: impl ToString, reason: impl ToString) -> Self {
        DeriveError::Derivation {
            chain,
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Exit status the binary reports for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            DeriveError::InvalidMnemonic(_) => EXIT_INVALID_MNEMONIC,
            _ => EXIT_FATAL,
        }
    }
}

pub type Result<T> = std::result::Result<T, DeriveError>;
