//! Repository Traits

use crate::domain::event::{ChainEvent, ShareTransfer};
use crate::error::WebhookResult;

#[trait_variant::make(ChainEventRepository: Send)]
pub trait LocalChainEventRepository {
    /// Record the event and apply its transfers atomically.
    /// `None` when the signature was already recorded, otherwise the number
    /// of share tokens whose owner changed.
    async fn apply_chain_event(
        &self,
        event: &ChainEvent,
        transfers: &[ShareTransfer],
    ) -> WebhookResult<Option<u64>>;
}
