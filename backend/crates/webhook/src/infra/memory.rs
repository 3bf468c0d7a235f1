//! In-memory chain event log for tests

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use kernel::id::UserId;

use crate::domain::event::{ChainEvent, ShareTransfer};
use crate::domain::repository::ChainEventRepository;
use crate::error::WebhookResult;

#[derive(Default)]
struct Tables {
    signatures: HashSet<String>,
    /// mint address -> current holder
    shares: HashMap<String, Option<UserId>>,
    wallets: HashMap<String, UserId>,
}

#[derive(Default)]
pub struct InMemoryChainEventRepository {
    tables: Mutex<Tables>,
}

impl InMemoryChainEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_share(&self, mint_address: &str, owner: Option<UserId>) {
        self.lock().shares.insert(mint_address.to_string(), owner);
    }

    pub fn bind_wallet(&self, wallet: &str, user_id: UserId) {
        self.lock().wallets.insert(wallet.to_string(), user_id);
    }

    pub fn share_owner(&self, mint_address: &str) -> Option<UserId> {
        self.lock().shares.get(mint_address).copied().flatten()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ChainEventRepository for InMemoryChainEventRepository {
    async fn apply_chain_event(
        &self,
        event: &ChainEvent,
        transfers: &[ShareTransfer],
    ) -> WebhookResult<Option<u64>> {
        let mut tables = self.lock();
        if !tables.signatures.insert(event.signature.clone()) {
            return Ok(None);
        }

        let mut moved = 0;
        for transfer in transfers {
            let Some(&user_id) = tables.wallets.get(&transfer.to_wallet) else {
                continue;
            };
            if let Some(owner) = tables.shares.get_mut(&transfer.mint) {
                if *owner != Some(user_id) {
                    *owner = Some(user_id);
                    moved += 1;
                }
            }
        }
        Ok(Some(moved))
    }
}
