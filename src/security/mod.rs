pub mod mnemonic_input;
pub use mnemonic_input::*;
