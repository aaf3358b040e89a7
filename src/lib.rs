pub mod chain;
pub mod config;
pub mod derive;
pub mod error;
pub mod mnemonic;
pub mod path;
pub mod report;
pub mod ss58;
pub mod test;

pub use chain::Chain;
pub use config::DeriveConfig;
pub use derive::{
    BitcoinDeriver, PolkadotDeriver, derive_all, derive_bitcoin, derive_ethereum, derive_polkadot,
};
pub use error::{DeriveError, Result};
pub use report::{AddressRecord, DerivationResult};

// Reading the phrase from the terminal or stdin
pub mod security;
