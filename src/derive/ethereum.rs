use bip32::XPrv;
use bip39::Mnemonic;
use log::debug;
use tiny_keccak::{Hasher, Keccak};

use crate::chain::Chain;
use crate::error::{DeriveError, Result};
use crate::mnemonic::seed_from_mnemonic;
use crate::path::{DerivationPath, check_index_range};
use crate::report::AddressRecord;

const CHAIN: Chain = Chain::Ethereum;

/// Derive `count` addresses at `m/44'/60'/{account}'/{change}/{i}`.
///
/// Every index is derived from the mnemonic along its complete path from the
/// master key. Never derive them from a shared `m/44'/60'/{account}'/{change}`
/// node: HD libraries that track depth refuse to derive an absolute path from
/// a non-root node, and the output must not depend on which one is in use.
pub fn derive_ethereum(
    mnemonic: &Mnemonic,
    account: u32,
    change: u32,
    count: u32,
) -> Result<Vec<AddressRecord>> {
    check_index_range(CHAIN, account, change, count)?;
    let mut records = Vec::new();
    for i in 0..count {
        let path = DerivationPath::for_chain(CHAIN, account, change, i)?;
        let address = address_at(mnemonic, &path)?;
        records.push(AddressRecord::new(&path, address));
    }
    debug!("derived {} {} addresses", records.len(), CHAIN);
    Ok(records)
}

fn address_at(mnemonic: &Mnemonic, path: &DerivationPath) -> Result<String> {
    let seed = seed_from_mnemonic(mnemonic, "");
    let bip32_path: bip32::DerivationPath = path
        .to_string()
        .parse()
        .map_err(|e| DeriveError::derivation(CHAIN, path, e))?;
    let xprv = XPrv::derive_from_path(seed.as_bytes(), &bip32_path)
        .map_err(|e| DeriveError::derivation(CHAIN, path, e))?;

    let point = xprv.private_key().verifying_key().to_encoded_point(false);
    // SEC1 uncompressed: 0x04 || X || Y
    let uncompressed = point.as_bytes();
    if uncompressed.len() != 65 {
        return Err(DeriveError::derivation(
            CHAIN,
            path,
            format!("unexpected public key length {}", uncompressed.len()),
        ));
    }
    Ok(address_from_uncompressed(&uncompressed[1..]))
}

fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// `0x` + EIP-55 checksummed hex of the last 20 bytes of Keccak-256(X || Y).
pub fn address_from_uncompressed(xy: &[u8]) -> String {
    let hash = keccak256(xy);
    to_checksum_address(&hash[12..])
}

/// EIP-55 mixed-case encoding of a 20-byte address.
pub fn to_checksum_address(address: &[u8]) -> String {
    let lower = hex::encode(address);
    let checksum = keccak256(lower.as_bytes());

    let cased: String = lower
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let nibble = (checksum[i / 2] >> (4 * (1 - i % 2))) & 0x0f;
            if c.is_ascii_alphabetic() && nibble >= 8 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect();
    format!("0x{}", cased)
}

/// True when `address` is `0x` + 40 hex digits carrying a valid EIP-55 casing.
pub fn is_checksum_address(address: &str) -> bool {
    let Some(body) = address.strip_prefix("0x") else {
        return false;
    };
    if body.len() != 40 || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return false;
    }
    match hex::decode(body) {
        Ok(bytes) => to_checksum_address(&bytes) == address,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mnemonic::parse;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    const HARDHAT: &str = "test test test test test test test test test test test junk";

    #[test]
    fn test_abandon_vector() {
        let records = derive_ethereum(&parse(ABANDON).unwrap(), 0, 0, 1).unwrap();
        assert_eq!(records[0].path, "m/44'/60'/0'/0/0");
        assert_eq!(records[0].address, "0x9858EfFD232B4033E47d90003D41EC34EcaEda94");
    }

    #[test]
    fn test_hardhat_accounts() {
        let records = derive_ethereum(&parse(HARDHAT).unwrap(), 0, 0, 2).unwrap();
        assert_eq!(records[0].address, "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        assert_eq!(records[1].path, "m/44'/60'/0'/0/1");
        assert_eq!(records[1].address, "0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
    }

    #[test]
    fn test_eip55_reference_addresses() {
        for expected in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ] {
            let bytes = hex::decode(expected[2..].to_lowercase()).unwrap();
            assert_eq!(to_checksum_address(&bytes), expected);
            assert!(is_checksum_address(expected));
        }
    }

    #[test]
    fn test_rejects_wrong_casing() {
        assert!(!is_checksum_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
        assert!(!is_checksum_address("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
        assert!(!is_checksum_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeA"));
    }

    #[test]
    fn test_unreachable_count_fails_before_deriving() {
        let err = derive_ethereum(&parse(ABANDON).unwrap(), 0, 0, u32::MAX).unwrap_err();
        assert!(matches!(err, DeriveError::InvalidPath { .. }));
    }

    #[test]
    fn test_every_address_is_checksummed() {
        let records = derive_ethereum(&parse(ABANDON).unwrap(), 1, 0, 4).unwrap();
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.path, format!("m/44'/60'/1'/0/{}", i));
            assert!(is_checksum_address(&record.address), "{}", record.address);
        }
    }
}
