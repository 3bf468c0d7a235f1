//! Application Layer

pub mod config;
pub mod create;
pub mod delete;
pub mod documents;
pub mod mint_shares;
pub mod query;
pub mod status;
pub mod update;

pub use config::{ListingConfig, MINT_LISTING_SHARES};
pub use create::CreateListingUseCase;
pub use delete::DeleteListingUseCase;
pub use documents::{AddDocumentUseCase, DeleteDocumentUseCase, ListDocumentsUseCase};
pub use mint_shares::{MintListingSharesJob, MintSharesPayload, MintSharesUseCase};
pub use query::{GetListingUseCase, ListListingsUseCase, ListSharesUseCase};
pub use status::ChangeStatusUseCase;
pub use update::{ListingPatch, UpdateListingUseCase};

use auth::AuthUser;
use kernel::id::ListingId;

use crate::domain::entity::listing::Listing;
use crate::domain::repository::ListingRepository;
use crate::error::{ListingError, ListingResult};

/// Hidden listings answer 404 rather than 403
pub(crate) async fn load_visible<R>(
    repo: &R,
    id: ListingId,
    actor: &AuthUser,
) -> ListingResult<Listing>
where
    R: ListingRepository + Sync,
{
    repo.find_by_id(id)
        .await?
        .filter(|listing| listing.is_visible_to(actor))
        .ok_or(ListingError::ListingNotFound)
}
