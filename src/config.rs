use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{DeriveError, Result};
use crate::path::HARDENED_OFFSET;
use crate::ss58::POLKADOT_PREFIX;

pub const DEFAULT_ACCOUNT: u32 = 0;
pub const DEFAULT_CHANGE: u32 = 0;
pub const DEFAULT_COUNT: u32 = 10;
pub const DEFAULT_SS58_PREFIX: u16 = POLKADOT_PREFIX;

/// Parameters shared by every chain branch of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeriveConfig {
    pub account: u32,
    pub change: u32,
    pub count: u32,
    pub ss58_prefix: u16,
}

impl Default for DeriveConfig {
    fn default() -> Self {
        Self {
            account: DEFAULT_ACCOUNT,
            change: DEFAULT_CHANGE,
            count: DEFAULT_COUNT,
            ss58_prefix: DEFAULT_SS58_PREFIX,
        }
    }
}

fn parse_var<T: FromStr>(name: &str, value: Option<&str>, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| DeriveError::Config(format!("{}={:?}: {}", name, raw, e))),
    }
}

impl DeriveConfig {
    pub fn new(account: u32, change: u32, count: u32, ss58_prefix: u16) -> Self {
        Self {
            account,
            change,
            count,
            ss58_prefix,
        }
    }

    /// Environment overrides on top of the defaults; `.env` is loaded by the binary.
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| std::env::var(name).ok();
        Ok(Self {
            account: parse_var("DERIVE_ACCOUNT", var("DERIVE_ACCOUNT").as_deref(), DEFAULT_ACCOUNT)?,
            change: parse_var("DERIVE_CHANGE", var("DERIVE_CHANGE").as_deref(), DEFAULT_CHANGE)?,
            count: parse_var("DERIVE_COUNT", var("DERIVE_COUNT").as_deref(), DEFAULT_COUNT)?,
            ss58_prefix: parse_var(
                "DERIVE_SS58_PREFIX",
                var("DERIVE_SS58_PREFIX").as_deref(),
                DEFAULT_SS58_PREFIX,
            )?,
        })
    }

    /// Rejects a `count` that no index range below 2^31 can satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.count > HARDENED_OFFSET {
            return Err(DeriveError::Config(format!(
                "count {} exceeds the {} addressable indices",
                self.count, HARDENED_OFFSET
            )));
        }
        Ok(())
    }

    pub fn update_account(&mut self, account: u32) {
        self.account = account;
    }
    pub fn update_change(&mut self, change: u32) {
        self.change = change;
    }
    pub fn update_count(&mut self, count: u32) {
        self.count = count;
    }
    pub fn update_ss58_prefix(&mut self, ss58_prefix: u16) {
        self.ss58_prefix = ss58_prefix;
    }
}
