//! Share token (one NFT per fractional share)

use chrono::{DateTime, Utc};
use kernel::id::{ListingId, ShareTokenId, UserId};

#[derive(Debug, Clone)]
pub struct ShareToken {
    pub id: ShareTokenId,
    pub listing_id: ListingId,
    /// 0-based, unique per listing
    pub index_number: i32,
    pub mint_address: String,
    pub metadata_uri: String,
    /// Current holder; the listing owner right after minting
    pub owner_id: Option<UserId>,
    pub mint_signature: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShareToken {
    pub fn minted(
        listing_id: ListingId,
        index_number: i32,
        owner_id: UserId,
        receipt: chain::MintReceipt,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ShareTokenId::new(),
            listing_id,
            index_number,
            mint_address: receipt.mint_address.to_string(),
            metadata_uri: receipt.metadata_uri,
            owner_id: Some(owner_id),
            mint_signature: receipt.signature,
            created_at: now,
            updated_at: now,
        }
    }
}
