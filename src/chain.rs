use serde::{Deserialize, Serialize};
use std::fmt;

/// Chains covered by a derivation run, in registration order.
///
/// The derived `Ord` follows declaration order, which is also the key order of
/// the final report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chain {
    BitcoinNativeSegwit,
    Ethereum,
    Polkadot,
}

impl Chain {
    pub const ALL: [Chain; 3] = [Chain::BitcoinNativeSegwit, Chain::Ethereum, Chain::Polkadot];

    pub fn as_str(&self) -> &'static str {
        match self {
            Chain::BitcoinNativeSegwit => "bitcoin_native_segwit",
            Chain::Ethereum => "ethereum",
            Chain::Polkadot => "polkadot",
        }
    }

    /// SLIP-0044 coin type.
    pub fn coin_type(&self) -> u32 {
        match self {
            Chain::BitcoinNativeSegwit => 0,
            Chain::Ethereum => 60,
            Chain::Polkadot => 354,
        }
    }

    /// BIP43 purpose field used for this chain's paths.
    pub fn purpose(&self) -> u32 {
        match self {
            Chain::BitcoinNativeSegwit => 84,
            Chain::Ethereum | Chain::Polkadot => 44,
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
