use clap::Parser;
use log::debug;
use secrecy::ExposeSecret;
use std::process::ExitCode;

use mnemonic_addresses::{
    DeriveConfig, DeriveError, Result, derive_all,
    error::{EXIT_FATAL, EXIT_INVALID_MNEMONIC},
    mnemonic,
    security::MnemonicSource,
};

/// Derive Bitcoin (BIP84), Ethereum (BIP44) and Polkadot (SLIP-0010) addresses
/// from a BIP39 mnemonic and print them as JSON.
#[derive(Parser, Debug)]
#[command(name = "mnemonic-addresses", version)]
struct Cli {
    /// Account index (hardened in every chain's path)
    #[arg(long)]
    account: Option<u32>,
    /// Change index: 0 external, 1 internal
    #[arg(long)]
    change: Option<u32>,
    /// Number of addresses per chain
    #[arg(long)]
    count: Option<u32>,
    /// SS58 network prefix for Polkadot addresses
    #[arg(long = "ss58")]
    ss58_prefix: Option<u16>,
    /// Mnemonic words; read from the terminal when omitted
    #[arg(value_name = "WORD")]
    words: Vec<String>,
}

impl Cli {
    fn apply(&self, config: &mut DeriveConfig) {
        if let Some(account) = self.account {
            config.update_account(account);
        }
        if let Some(change) = self.change {
            config.update_change(change);
        }
        if let Some(count) = self.count {
            config.update_count(count);
        }
        if let Some(prefix) = self.ss58_prefix {
            config.update_ss58_prefix(prefix);
        }
    }
}

async fn run(cli: Cli) -> Result<String> {
    let mut config = DeriveConfig::from_env()?;
    cli.apply(&mut config);
    debug!("derivation config: {:?}", config);

    let source = MnemonicSource::from_args(&cli.words);
    if source.is_interactive() {
        debug!("no mnemonic words on the command line, prompting");
    }
    let phrase = source.read()?;
    let mnemonic = mnemonic::parse(phrase.expose_secret())?;
    drop(phrase);

    derive_all(&mnemonic, &config).await?.to_report()
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are not failures
            let code = if e.use_stderr() { EXIT_FATAL } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    match run(cli).await {
        Ok(report) => {
            println!("{}", report);
            ExitCode::SUCCESS
        }
        Err(DeriveError::InvalidMnemonic(reason)) => {
            eprintln!(
                "Invalid mnemonic. Make sure it is a valid BIP39 phrase (no extra passphrase)."
            );
            eprintln!("{}", reason);
            ExitCode::from(EXIT_INVALID_MNEMONIC)
        }
        Err(e) => {
            let code = e.exit_code();
            eprintln!("Fatal error: {:?}", anyhow::Error::from(e));
            ExitCode::from(code)
        }
    }
}
