//! Share NFT minting port
//!
//! The listing context calls [`ShareMinter::mint_share`] once per share index.
//! `SolanaShareMinter` submits a signed `mint_share` instruction to the share
//! program; `OfflineShareMinter` only derives the addresses (no authority key
//! configured, local development, tests).

use platform::retry::RetryPolicy;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::system_program;
use uuid::Uuid;

use crate::error::ChainResult;
use crate::pda::{derive_listing_address, derive_share_mint};
use crate::rpc::{ChainRpc, SolanaRpcClient, send_with_retry};

#[derive(Debug, Clone)]
pub struct MinterConfig {
    pub program_id: Pubkey,
    pub metadata_base_url: String,
    pub retry: RetryPolicy,
}

impl MinterConfig {
    pub fn metadata_uri(&self, listing_id: &Uuid, index: u32) -> String {
        format!(
            "{}/listings/{}/shares/{}.json",
            self.metadata_base_url.trim_end_matches('/'),
            listing_id,
            index
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintRequest {
    pub listing_id: Uuid,
    pub index: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintReceipt {
    pub mint_address: Pubkey,
    pub metadata_uri: String,
    pub signature: Option<String>,
}

#[trait_variant::make(ShareMinter: Send)]
pub trait LocalShareMinter {
    async fn mint_share(&self, request: &MintRequest) -> ChainResult<MintReceipt>;
}

/// Anchor instruction discriminator: `sha256("global:<name>")[..8]`
pub fn instruction_discriminator(name: &str) -> [u8; 8] {
    let hash = platform::crypto::sha256(format!("global:{name}").as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&hash[..8]);
    out
}

/// `discriminator ‖ listing uuid ‖ index u32 LE ‖ len u32 LE ‖ metadata uri`
pub fn mint_share_data(listing_id: &Uuid, index: u32, metadata_uri: &str) -> Vec<u8> {
    let mut data = Vec::with_capacity(8 + 16 + 4 + 4 + metadata_uri.len());
    data.extend_from_slice(&instruction_discriminator("mint_share"));
    data.extend_from_slice(listing_id.as_bytes());
    data.extend_from_slice(&index.to_le_bytes());
    data.extend_from_slice(&(metadata_uri.len() as u32).to_le_bytes());
    data.extend_from_slice(metadata_uri.as_bytes());
    data
}

pub struct SolanaShareMinter<R = SolanaRpcClient> {
    rpc: R,
    authority: Keypair,
    config: MinterConfig,
}

impl<R: ChainRpc + Sync> SolanaShareMinter<R> {
    pub fn new(rpc: R, authority: Keypair, config: MinterConfig) -> Self {
        Self {
            rpc,
            authority,
            config,
        }
    }

    pub fn build_instruction(
        &self,
        request: &MintRequest,
        metadata_uri: &str,
    ) -> ChainResult<(Instruction, Pubkey)> {
        let program = self.config.program_id;
        let (listing_pda, _) = derive_listing_address(&request.listing_id, &program)?;
        let (mint, _) = derive_share_mint(&request.listing_id, request.index, &program)?;

        let ix = Instruction::new_with_bytes(
            program,
            &mint_share_data(&request.listing_id, request.index, metadata_uri),
            vec![
                AccountMeta::new(self.authority.pubkey(), true),
                AccountMeta::new(listing_pda, false),
                AccountMeta::new(mint, false),
                AccountMeta::new_readonly(system_program::id(), false),
            ],
        );
        Ok((ix, mint))
    }
}

impl<R: ChainRpc + Sync> ShareMinter for SolanaShareMinter<R> {
    async fn mint_share(&self, request: &MintRequest) -> ChainResult<MintReceipt> {
        let metadata_uri = self.config.metadata_uri(&request.listing_id, request.index);
        let (ix, mint) = self.build_instruction(request, &metadata_uri)?;

        let signature = send_with_retry(&self.rpc, self.config.retry, &[ix], &self.authority).await?;
        tracing::info!(
            listing_id = %request.listing_id,
            index = request.index,
            mint = %mint,
            signature = %signature,
            "Share minted"
        );

        Ok(MintReceipt {
            mint_address: mint,
            metadata_uri,
            signature: Some(signature),
        })
    }
}

pub struct OfflineShareMinter {
    config: MinterConfig,
}

impl OfflineShareMinter {
    pub fn new(config: MinterConfig) -> Self {
        Self { config }
    }
}

impl ShareMinter for OfflineShareMinter {
    async fn mint_share(&self, request: &MintRequest) -> ChainResult<MintReceipt> {
        let (mint, _) = derive_share_mint(&request.listing_id, request.index, &self.config.program_id)?;
        tracing::debug!(listing_id = %request.listing_id, index = request.index, "Offline mint");
        Ok(MintReceipt {
            mint_address: mint,
            metadata_uri: self.config.metadata_uri(&request.listing_id, request.index),
            signature: None,
        })
    }
}

/// Minter picked from configuration at startup
pub enum ConfiguredShareMinter {
    Solana(SolanaShareMinter<SolanaRpcClient>),
    Offline(OfflineShareMinter),
}

impl ConfiguredShareMinter {
    /// Solana when an authority keypair is configured, offline otherwise
    pub fn from_parts(
        rpc: SolanaRpcClient,
        authority: Option<Keypair>,
        config: MinterConfig,
    ) -> Self {
        match authority {
            Some(authority) => {
                tracing::info!(authority = %authority.pubkey(), "Share minting enabled");
                Self::Solana(SolanaShareMinter::new(rpc, authority, config))
            }
            None => {
                tracing::warn!("SOLANA_MINT_AUTHORITY not set, share minting runs offline");
                Self::Offline(OfflineShareMinter::new(config))
            }
        }
    }
}

impl ShareMinter for ConfiguredShareMinter {
    async fn mint_share(&self, request: &MintRequest) -> ChainResult<MintReceipt> {
        match self {
            Self::Solana(minter) => ShareMinter::mint_share(minter, request).await,
            Self::Offline(minter) => ShareMinter::mint_share(minter, request).await,
        }
    }
}
