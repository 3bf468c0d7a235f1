//! Chain Crate - Solana integration
//!
//! Thin layer over `solana-sdk` / `solana-client` for registering share NFTs:
//! - `keypair` - mint authority loading from configuration
//! - `pda` - program derived addresses for listings and share mints
//! - `rpc` - nonblocking RPC client and send-with-retry
//! - `minter` - the `ShareMinter` port used by the listing context

pub mod error;
pub mod keypair;
pub mod minter;
pub mod pda;
pub mod rpc;

pub use error::{ChainError, ChainResult};
pub use keypair::keypair_from_config_str;
pub use minter::{
    ConfiguredShareMinter, MintReceipt, MintRequest, MinterConfig, OfflineShareMinter,
    ShareMinter, SolanaShareMinter,
};
pub use pda::{derive_listing_address, derive_share_mint};
pub use rpc::{ChainRpc, SignatureStatus, SolanaRpcClient, send_with_retry};

pub use solana_sdk::hash::Hash;
pub use solana_sdk::pubkey::Pubkey;
pub use solana_sdk::signature::{Keypair, Signer};
