//! Program derived addresses for listings and share mints

use solana_sdk::pubkey::Pubkey;
use uuid::Uuid;

use crate::error::ChainError;

pub const LISTING_SEED: &[u8] = b"listing";
pub const SHARE_SEED: &[u8] = b"share";

/// seeds `["listing", listing_uuid]`
pub fn derive_listing_address(listing_id: &Uuid, program_id: &Pubkey) -> Result<(Pubkey, u8), ChainError> {
    Pubkey::try_find_program_address(&[LISTING_SEED, listing_id.as_bytes()], program_id)
        .ok_or(ChainError::NoViableBump)
}

/// seeds `["share", listing_uuid, index_le_u32]`
pub fn derive_share_mint(
    listing_id: &Uuid,
    index: u32,
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), ChainError> {
    let index_bytes = index.to_le_bytes();
    Pubkey::try_find_program_address(&[SHARE_SEED, listing_id.as_bytes(), &index_bytes], program_id)
        .ok_or(ChainError::NoViableBump)
}
