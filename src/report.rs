use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::chain::Chain;
use crate::error::{DeriveError, Result};
use crate::path::DerivationPath;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    pub path: String,
    pub address: String,
}

impl AddressRecord {
    pub fn new(path: &DerivationPath, address: String) -> Self {
        Self {
            path: path.to_string(),
            address,
        }
    }
}

/// Per-chain address lists, keyed and serialized in chain registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DerivationResult {
    chains: BTreeMap<Chain, Vec<AddressRecord>>,
}

impl DerivationResult {
    /// Collect chain results; a chain given twice keeps its last list.
    pub fn assemble<I>(chain_results: I) -> Self
    where
        I: IntoIterator<Item = (Chain, Vec<AddressRecord>)>,
    {
        Self {
            chains: chain_results.into_iter().collect(),
        }
    }

    pub fn get(&self, chain: Chain) -> Option<&[AddressRecord]> {
        self.chains.get(&chain).map(Vec::as_slice)
    }

    pub fn chains(&self) -> impl Iterator<Item = (Chain, &[AddressRecord])> {
        self.chains.iter().map(|(c, r)| (*c, r.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Two-space indented JSON.
    pub fn to_report(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| DeriveError::Serialization(e.to_string()))
    }
}
