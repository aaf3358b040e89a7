use bitcoin::{
    Address, CompressedPublicKey, Network,
    bip32::{ChildNumber, DerivationPath as BtcDerivationPath, Xpriv},
    secp256k1::{Secp256k1, SignOnly},
};
use log::debug;

use crate::chain::Chain;
use crate::error::{DeriveError, Result};
use crate::mnemonic::Seed;
use crate::path::{DerivationPath, check_index_range};
use crate::report::AddressRecord;

const CHAIN: Chain = Chain::BitcoinNativeSegwit;

/// BIP84 native-segwit (P2WPKH, `bc1q…`) addresses on main-net.
///
/// Owns the secp256k1 signing context it derives with, so the curve backend is
/// set up once per deriver instead of once per address.
pub struct BitcoinDeriver {
    secp: Secp256k1<SignOnly>,
    network: Network,
}

impl BitcoinDeriver {
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::signing_only(),
            network: Network::Bitcoin,
        }
    }

    /// Derive `count` addresses at `m/84'/0'/{account}'/{change}/{i}`.
    pub fn derive(
        &self,
        seed: &Seed,
        account: u32,
        change: u32,
        count: u32,
    ) -> Result<Vec<AddressRecord>> {
        check_index_range(CHAIN, account, change, count)?;
        let master = Xpriv::new_master(self.network, seed.as_bytes())
            .map_err(|e| DeriveError::derivation(CHAIN, "m", e))?;

        let mut records = Vec::new();
        for i in 0..count {
            let path = DerivationPath::for_chain(CHAIN, account, change, i)?;
            let address = self.address_at(&master, &path)?;
            records.push(AddressRecord::new(&path, address));
        }
        debug!("derived {} {} addresses", records.len(), CHAIN);
        Ok(records)
    }

    fn address_at(&self, master: &Xpriv, path: &DerivationPath) -> Result<String> {
        let btc_path = to_bitcoin_path(path);
        let child = master
            .derive_priv(&self.secp, &btc_path)
            .map_err(|e| DeriveError::derivation(CHAIN, path, e))?;

        let compressed = CompressedPublicKey(child.private_key.public_key(&self.secp));
        Ok(Address::p2wpkh(&compressed, self.network).to_string())
    }
}

impl Default for BitcoinDeriver {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience wrapper around a fresh [`BitcoinDeriver`].
pub fn derive_bitcoin(
    seed: &Seed,
    account: u32,
    change: u32,
    count: u32,
) -> Result<Vec<AddressRecord>> {
    BitcoinDeriver::new().derive(seed, account, change, count)
}

fn to_bitcoin_path(path: &DerivationPath) -> BtcDerivationPath {
    path.child_numbers()
        .into_iter()
        .map(ChildNumber::from)
        .collect::<Vec<_>>()
        .into()
}
