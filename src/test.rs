#[cfg(test)]
mod tests {
    use crate::chain::Chain;
    use crate::config::DeriveConfig;
    use crate::derive::ethereum::is_checksum_address;
    use crate::derive::*;
    use crate::error::{DeriveError, EXIT_INVALID_MNEMONIC};
    use crate::mnemonic::{parse, seed_from_mnemonic};
    use crate::report::DerivationResult;
    use crate::ss58;
    use ::bip39::Mnemonic;
    use proptest::prelude::*;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    async fn derive(config: DeriveConfig) -> DerivationResult {
        derive_all(&parse(ABANDON).unwrap(), &config).await.unwrap()
    }

    #[tokio::test]
    async fn test_default_run_matches_reference_vectors() {
        let result = derive(DeriveConfig::default()).await;
        assert_eq!(result.len(), 3);

        let btc = result.get(Chain::BitcoinNativeSegwit).unwrap();
        assert_eq!(btc.len(), 10);
        assert_eq!(btc[0].path, "m/84'/0'/0'/0/0");
        assert_eq!(btc[0].address, "bc1qcr8te4kr609gcawutmrza0j4xv80jy8z306fyu");

        let eth = result.get(Chain::Ethereum).unwrap();
        assert_eq!(eth.len(), 10);
        assert_eq!(eth[0].path, "m/44'/60'/0'/0/0");
        assert_eq!(eth[0].address, "0x9858EfFD232B4033E47d90003D41EC34EcaEda94");

        let dot = result.get(Chain::Polkadot).unwrap();
        assert_eq!(dot.len(), 10);
        assert_eq!(dot[0].path, "m/44'/354'/0'/0'/0'");
    }

    #[tokio::test]
    async fn test_reports_are_byte_identical() {
        let config = DeriveConfig::new(1, 1, 4, 2);
        let first = derive(config).await.to_report().unwrap();
        let second = derive(config).await.to_report().unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_zero_count_yields_empty_lists() {
        let result = derive(DeriveConfig::new(0, 0, 0, 0)).await;
        for chain in Chain::ALL {
            assert_eq!(result.get(chain), Some(&[][..]), "{chain}");
        }
    }

    #[tokio::test]
    async fn test_pipeline_matches_standalone_branches() {
        let mnemonic = parse(ABANDON).unwrap();
        let seed = seed_from_mnemonic(&mnemonic, "");
        let result = derive_all(&mnemonic, &DeriveConfig::new(2, 1, 3, 42)).await.unwrap();

        assert_eq!(
            result.get(Chain::BitcoinNativeSegwit).unwrap(),
            derive_bitcoin(&seed, 2, 1, 3).unwrap().as_slice()
        );
        assert_eq!(
            result.get(Chain::Ethereum).unwrap(),
            derive_ethereum(&mnemonic, 2, 1, 3).unwrap().as_slice()
        );
        assert_eq!(
            result.get(Chain::Polkadot).unwrap(),
            derive_polkadot(&seed, 2, 1, 3, 42).await.unwrap().as_slice()
        );
    }

    #[tokio::test]
    async fn test_ss58_prefix_only_touches_polkadot() {
        let dot = derive(DeriveConfig::new(0, 0, 3, ss58::POLKADOT_PREFIX)).await;
        let kusama = derive(DeriveConfig::new(0, 0, 3, 2)).await;

        for chain in [Chain::BitcoinNativeSegwit, Chain::Ethereum] {
            assert_eq!(dot.get(chain), kusama.get(chain), "{chain}");
        }
        assert_ne!(dot.get(Chain::Polkadot), kusama.get(Chain::Polkadot));
    }

    #[tokio::test]
    async fn test_address_formats() {
        let result = derive(DeriveConfig::new(0, 0, 5, ss58::POLKADOT_PREFIX)).await;
        for record in result.get(Chain::BitcoinNativeSegwit).unwrap() {
            assert!(record.address.starts_with("bc1q") && record.address.len() == 42);
        }
        for record in result.get(Chain::Ethereum).unwrap() {
            assert!(is_checksum_address(&record.address), "{}", record.address);
        }
        for record in result.get(Chain::Polkadot).unwrap() {
            let (prefix, _) = ss58::decode(&record.address).unwrap();
            assert_eq!(prefix, ss58::POLKADOT_PREFIX);
        }
    }

    #[tokio::test]
    async fn test_bad_branch_input_fails_whole_run() {
        let err = derive_all(&parse(ABANDON).unwrap(), &DeriveConfig::new(0, 0, 2, 47))
            .await
            .unwrap_err();
        assert!(matches!(err, DeriveError::InvalidSs58Prefix(47)));

        let err = derive_all(&parse(ABANDON).unwrap(), &DeriveConfig::new(u32::MAX, 0, 2, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DeriveError::InvalidPath { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_count_is_a_config_error() {
        let err = derive_all(&parse(ABANDON).unwrap(), &DeriveConfig::new(0, 0, u32::MAX, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DeriveError::Config(_)));
        assert_eq!(err.exit_code(), crate::error::EXIT_FATAL);
    }

    #[test]
    fn test_invalid_mnemonic_stops_before_derivation() {
        let phrase = ["abandon"; 12].join(" ");
        let err = parse(&phrase).unwrap_err();
        assert!(matches!(err, DeriveError::InvalidMnemonic(_)));
        assert_eq!(err.exit_code(), EXIT_INVALID_MNEMONIC);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn prop_records_ordered_and_counted(
            entropy in any::<[u8; 16]>(),
            account in 0u32..4,
            change in 0u32..2,
            count in 0u32..4,
        ) {
            let mnemonic = Mnemonic::from_entropy(&entropy).unwrap();
            let config = DeriveConfig::new(account, change, count, ss58::POLKADOT_PREFIX);
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();

            let result = runtime.block_on(derive_all(&mnemonic, &config)).unwrap();
            let again = runtime.block_on(derive_all(&mnemonic, &config)).unwrap();
            prop_assert_eq!(&result, &again);

            for (chain, records) in result.chains() {
                prop_assert_eq!(records.len(), count as usize);
                for (i, record) in records.iter().enumerate() {
                    let suffix = match chain {
                        Chain::Polkadot => format!("/{}'", i),
                        _ => format!("/{}", i),
                    };
                    prop_assert!(record.path.ends_with(&suffix), "{} {}", chain, record.path);
                }
                let mut addresses: Vec<&str> = records.iter().map(|r| r.address.as_str()).collect();
                addresses.sort();
                addresses.dedup();
                prop_assert_eq!(addresses.len(), count as usize);
            }
        }
    }
}
