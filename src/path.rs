//! Hierarchical-deterministic derivation paths.
//!
//! A path is an ordered list of child indices, each flagged hardened or not,
//! written `m/84'/0'/0'/0/7` with an apostrophe marking hardened segments.
//! The chain derivers convert it into whatever their KDF crate expects.

use std::fmt;
use std::str::FromStr;

use crate::chain::Chain;
use crate::error::{DeriveError, Result};

/// Offset added to an index to mark it hardened (BIP32).
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub index: u32,
    pub hardened: bool,
}

impl Segment {
    fn checked(index: u32, hardened: bool) -> std::result::Result<Self, String> {
        if index >= HARDENED_OFFSET {
            return Err(format!("index {} exceeds {}", index, HARDENED_OFFSET - 1));
        }
        Ok(Segment { index, hardened })
    }

    /// BIP32 child number: the index with the hardened bit applied.
    pub fn child_number(&self) -> u32 {
        if self.hardened {
            self.index | HARDENED_OFFSET
        } else {
            self.index
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

/// Which of the five BIP44-shaped segments are hardened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hardening {
    /// `purpose'/coin_type'/account'/change/index` (BIP44, BIP84).
    AccountLevel,
    /// Every segment hardened, as ed25519 SLIP-0010 requires.
    Full,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DerivationPath {
    segments: Vec<Segment>,
}

impl DerivationPath {
    pub fn bip44(
        purpose: u32,
        coin_type: u32,
        account: u32,
        change: u32,
        index: u32,
        hardening: Hardening,
    ) -> Result<Self> {
        let tail_hardened = hardening == Hardening::Full;
        let levels = [
            (purpose, true),
            (coin_type, true),
            (account, true),
            (change, tail_hardened),
            (index, tail_hardened),
        ];
        let mut segments = Vec::with_capacity(levels.len());
        for (value, hardened) in levels {
            let segment = Segment::checked(value, hardened).map_err(|reason| {
                DeriveError::InvalidPath {
                    path: format!(
                        "m/{}'/{}'/{}'/{}/{}",
                        purpose, coin_type, account, change, index
                    ),
                    reason,
                }
            })?;
            segments.push(segment);
        }
        Ok(DerivationPath { segments })
    }

    /// The path convention each chain derives addresses at.
    pub fn for_chain(chain: Chain, account: u32, change: u32, index: u32) -> Result<Self> {
        let hardening = match chain {
            Chain::BitcoinNativeSegwit | Chain::Ethereum => Hardening::AccountLevel,
            Chain::Polkadot => Hardening::Full,
        };
        Self::bip44(
            chain.purpose(),
            chain.coin_type(),
            account,
            change,
            index,
            hardening,
        )
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_fully_hardened(&self) -> bool {
        self.segments.iter().all(|s| s.hardened)
    }

    /// Raw child numbers, hardened bit applied.
    pub fn child_numbers(&self) -> Vec<u32> {
        self.segments.iter().map(Segment::child_number).collect()
    }
}

/// Fails with `InvalidPath` unless indices `0..count` are all addressable,
/// before any key is derived.
pub fn check_index_range(chain: Chain, account: u32, change: u32, count: u32) -> Result<()> {
    match count.checked_sub(1) {
        None => Ok(()),
        Some(last) => DerivationPath::for_chain(chain, account, change, last).map(|_| ()),
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = DeriveError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: String| DeriveError::InvalidPath {
            path: s.to_string(),
            reason,
        };

        let mut parts = s.trim().split('/');
        match parts.next() {
            Some("m") | Some("M") => {}
            _ => return Err(invalid("path must start with `m`".to_string())),
        }

        let mut segments = Vec::new();
        for part in parts {
            let (digits, hardened) = match part.strip_suffix(['\'', 'h', 'H']) {
                Some(digits) => (digits, true),
                None => (part, false),
            };
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid(format!("malformed segment `{}`", part)));
            }
            let index = digits
                .parse::<u32>()
                .map_err(|e| invalid(format!("segment `{}`: {}", part, e)))?;
            segments.push(Segment::checked(index, hardened).map_err(invalid)?);
        }
        Ok(DerivationPath { segments })
    }
}
