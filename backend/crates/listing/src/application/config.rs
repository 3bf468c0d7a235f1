//! Application Configuration

use chain::Pubkey;
use jobs::domain::DEFAULT_MAX_ATTEMPTS;

/// Job kind enqueued when a listing first goes LIVE
pub const MINT_LISTING_SHARES: &str = "mint_listing_shares";

#[derive(Debug, Clone)]
pub struct ListingConfig {
    /// Share program that owns listing PDAs and share mints
    pub program_id: Pubkey,
    pub mint_max_attempts: i32,
    /// Shares minted before each database flush
    pub mint_batch_size: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self::new(Self::development_program_id())
    }
}

impl ListingConfig {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            mint_max_attempts: DEFAULT_MAX_ATTEMPTS,
            mint_batch_size: 20,
        }
    }

    pub fn development() -> Self {
        Self::default()
    }

    /// Stable placeholder used when no program id is configured
    pub fn development_program_id() -> Pubkey {
        Pubkey::new_from_array(platform::crypto::sha256(b"deedify:share-program:dev"))
    }
}
