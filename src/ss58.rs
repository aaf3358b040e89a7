//! SS58 address codec for 32-byte public keys.
//!
//! `base58(prefix || key || checksum)` where the checksum is the first two
//! bytes of BLAKE2b-512 over `"SS58PRE" || prefix || key`. Prefixes below 64
//! take one byte; prefixes up to 16383 use the two-byte form.

use blake2::{Blake2b512, Digest};

use crate::error::{DeriveError, Result};

/// Polkadot relay chain.
pub const POLKADOT_PREFIX: u16 = 0;
/// Generic Substrate.
pub const SUBSTRATE_PREFIX: u16 = 42;

const CHECKSUM_PREIMAGE: &[u8] = b"SS58PRE";
const CHECKSUM_LEN: usize = 2;
const KEY_LEN: usize = 32;
const MAX_PREFIX: u16 = 0x3fff;
/// Reserved by the SS58 registry; no address may use them.
const RESERVED_PREFIXES: [u16; 2] = [46, 47];

fn check_prefix(prefix: u16) -> Result<()> {
    if prefix > MAX_PREFIX || RESERVED_PREFIXES.contains(&prefix) {
        return Err(DeriveError::InvalidSs58Prefix(prefix));
    }
    Ok(())
}

fn prefix_bytes(prefix: u16) -> Vec<u8> {
    if prefix < 64 {
        vec![prefix as u8]
    } else {
        let first = ((prefix & 0b0000_0000_1111_1100) as u8 >> 2) | 0b0100_0000;
        let second = ((prefix >> 8) as u8) | (((prefix & 0b0000_0000_0000_0011) as u8) << 6);
        vec![first, second]
    }
}

fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut hasher = Blake2b512::new();
    hasher.update(CHECKSUM_PREIMAGE);
    hasher.update(payload);
    let digest = hasher.finalize();
    [digest[0], digest[1]]
}

pub fn encode(public_key: &[u8; KEY_LEN], prefix: u16) -> Result<String> {
    check_prefix(prefix)?;
    let mut payload = prefix_bytes(prefix);
    payload.extend_from_slice(public_key);
    let sum = checksum(&payload);
    payload.extend_from_slice(&sum);
    Ok(bs58::encode(payload)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_string())
}

/// Decode an address into its network prefix and public key.
pub fn decode(address: &str) -> Result<(u16, [u8; KEY_LEN])> {
    let data = bs58::decode(address)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_vec()
        .map_err(|e| DeriveError::Ss58Decode(e.to_string()))?;

    let (prefix, prefix_len) = match data.first() {
        Some(&b) if b < 64 => (b as u16, 1),
        Some(&b) if b < 128 => {
            let second = *data
                .get(1)
                .ok_or_else(|| DeriveError::Ss58Decode("truncated prefix".to_string()))?;
            let lower = ((b << 2) | (second >> 6)) as u16;
            let upper = (second & 0b0011_1111) as u16;
            (lower | (upper << 8), 2)
        }
        Some(&b) => {
            return Err(DeriveError::Ss58Decode(format!(
                "invalid prefix byte {:#04x}",
                b
            )));
        }
        None => return Err(DeriveError::Ss58Decode("empty address".to_string())),
    };
    check_prefix(prefix)?;

    if data.len() != prefix_len + KEY_LEN + CHECKSUM_LEN {
        return Err(DeriveError::Ss58Decode(format!(
            "expected {} bytes, got {}",
            prefix_len + KEY_LEN + CHECKSUM_LEN,
            data.len()
        )));
    }

    let (payload, sum) = data.split_at(prefix_len + KEY_LEN);
    if checksum(payload)[..] != *sum {
        return Err(DeriveError::Ss58Decode("checksum mismatch".to_string()));
    }

    let mut key = [0u8; KEY_LEN];
    key.copy_from_slice(&payload[prefix_len..]);
    Ok((prefix, key))
}
