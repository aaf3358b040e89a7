use ed25519_dalek::{Signer, SigningKey, Verifier};
use log::debug;
use tokio::sync::OnceCell;
use zeroize::Zeroizing;

use crate::chain::Chain;
use crate::error::{DeriveError, Result};
use crate::mnemonic::Seed;
use crate::path::{DerivationPath, check_index_range};
use crate::report::AddressRecord;
use crate::ss58;

const CHAIN: Chain = Chain::Polkadot;

const SELF_CHECK_SEED: [u8; 16] = *b"ed25519-selfchk!";
const SELF_CHECK_MESSAGE: &[u8] = b"ed25519 backend readiness";

/// SLIP-0010 ed25519 keys over the BIP39 seed, encoded as SS58.
///
/// Path `m/44'/354'/{account}'/{change}'/{i}'`, every segment hardened.
/// Derivation waits on a readiness gate that checks the ed25519 backend once
/// per deriver before the first key is produced.
pub struct PolkadotDeriver {
    ready: OnceCell<()>,
    ss58_prefix: u16,
}

impl PolkadotDeriver {
    pub fn new(ss58_prefix: u16) -> Self {
        Self {
            ready: OnceCell::new(),
            ss58_prefix,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.initialized()
    }

    /// Idempotent; the self-check runs at most once per deriver.
    pub async fn ensure_ready(&self) -> Result<()> {
        self.ready
            .get_or_try_init(|| async {
                debug!("running ed25519 backend self-check");
                backend_self_check()
            })
            .await?;
        Ok(())
    }

    pub async fn derive(
        &self,
        seed: &Seed,
        account: u32,
        change: u32,
        count: u32,
    ) -> Result<Vec<AddressRecord>> {
        check_index_range(CHAIN, account, change, count)?;
        self.ensure_ready().await?;

        let mut records = Vec::new();
        for i in 0..count {
            let path = DerivationPath::for_chain(CHAIN, account, change, i)?;
            let public_key = public_key_at(seed.as_bytes(), &path)?;
            let address = ss58::encode(&public_key, self.ss58_prefix)?;
            records.push(AddressRecord::new(&path, address));
        }
        debug!("derived {} {} addresses", records.len(), CHAIN);
        Ok(records)
    }
}

/// Convenience wrapper around a fresh [`PolkadotDeriver`].
pub async fn derive_polkadot(
    seed: &Seed,
    account: u32,
    change: u32,
    count: u32,
    ss58_prefix: u16,
) -> Result<Vec<AddressRecord>> {
    PolkadotDeriver::new(ss58_prefix)
        .derive(seed, account, change, count)
        .await
}

/// SLIP-0010 private key for a fully hardened path.
fn private_key_at(seed: &[u8], path: &DerivationPath) -> Result<Zeroizing<[u8; 32]>> {
    if !path.is_fully_hardened() {
        return Err(DeriveError::derivation(
            CHAIN,
            path,
            "ed25519 SLIP-0010 supports hardened segments only",
        ));
    }
    // slip10_ed25519 sets the hardened bit itself, so it takes bare indices.
    let indices: Vec<u32> = path.segments().iter().map(|s| s.index).collect();
    Ok(Zeroizing::new(slip10_ed25519::derive_ed25519_private_key(
        seed, &indices,
    )))
}

fn public_key_at(seed: &[u8], path: &DerivationPath) -> Result<[u8; 32]> {
    let private_key = private_key_at(seed, path)?;
    let signing_key = SigningKey::from_bytes(&private_key);
    Ok(signing_key.verifying_key().to_bytes())
}

fn backend_self_check() -> Result<()> {
    let path = DerivationPath::for_chain(CHAIN, 0, 0, 0)?;
    let first = private_key_at(&SELF_CHECK_SEED, &path)?;
    let second = private_key_at(&SELF_CHECK_SEED, &path)?;
    if *first != *second {
        return Err(DeriveError::BackendNotReady(
            "SLIP-0010 derivation is not deterministic".to_string(),
        ));
    }

    let signing_key = SigningKey::from_bytes(&first);
    let signature = signing_key.sign(SELF_CHECK_MESSAGE);
    signing_key
        .verifying_key()
        .verify(SELF_CHECK_MESSAGE, &signature)
        .map_err(|e| DeriveError::BackendNotReady(e.to_string()))
}
