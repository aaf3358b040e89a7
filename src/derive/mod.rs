pub mod bitcoin;
pub mod ethereum;
pub mod polkadot;

pub use self::bitcoin::{BitcoinDeriver, derive_bitcoin};
pub use self::ethereum::derive_ethereum;
pub use self::polkadot::{PolkadotDeriver, derive_polkadot};

use ::bip39::Mnemonic;
use anyhow::anyhow;
use log::info;

use crate::chain::Chain;
use crate::config::DeriveConfig;
use crate::error::Result;
use crate::mnemonic::seed_from_mnemonic;
use crate::report::DerivationResult;

/// Derive every chain's addresses for one mnemonic.
///
/// The secp256k1 branches run on blocking worker threads, each with its own
/// copy of the key material; the ed25519 branch runs here once its readiness
/// gate has opened. Any branch failing fails the whole run.
pub async fn derive_all(mnemonic: &Mnemonic, config: &DeriveConfig) -> Result<DerivationResult> {
    config.validate()?;
    let DeriveConfig {
        account,
        change,
        count,
        ss58_prefix,
    } = *config;
    info!("Deriving addresses (first {}), this may take a second...", count);

    let seed = seed_from_mnemonic(mnemonic, "");

    let btc_seed = seed.clone();
    let btc_task = tokio::task::spawn_blocking(move || {
        BitcoinDeriver::new().derive(&btc_seed, account, change, count)
    });

    let eth_mnemonic = mnemonic.clone();
    let eth_task = tokio::task::spawn_blocking(move || {
        derive_ethereum(&eth_mnemonic, account, change, count)
    });

    let polkadot = PolkadotDeriver::new(ss58_prefix);
    let dot = polkadot.derive(&seed, account, change, count).await;
    drop(seed);

    let btc = btc_task
        .await
        .map_err(|e| anyhow!("{} worker failed: {}", Chain::BitcoinNativeSegwit, e))?;
    let eth = eth_task
        .await
        .map_err(|e| anyhow!("{} worker failed: {}", Chain::Ethereum, e))?;

    Ok(DerivationResult::assemble([
        (Chain::BitcoinNativeSegwit, btc?),
        (Chain::Ethereum, eth?),
        (Chain::Polkadot, dot?),
    ]))
}
