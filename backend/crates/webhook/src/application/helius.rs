//! Helius enhanced-transaction ingestion

use std::sync::Arc;

use serde_json::Value;

use crate::domain::event::{ChainEvent, EnhancedTransaction};
use crate::domain::repository::ChainEventRepository;
use crate::error::WebhookResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeliusSummary {
    pub processed: u32,
    pub skipped: u32,
    pub shares_moved: u64,
}

pub struct ProcessHeliusUseCase<W>
where
    W: ChainEventRepository,
{
    repo: Arc<W>,
}

impl<W> ProcessHeliusUseCase<W>
where
    W: ChainEventRepository + Sync,
{
    pub fn new(repo: Arc<W>) -> Self {
        Self { repo }
    }

    /// Transactions without a signature, unreadable ones and already seen
    /// ones count as skipped.
    pub async fn execute(&self, transactions: Vec<Value>) -> WebhookResult<HeliusSummary> {
        let mut summary = HeliusSummary::default();

        for payload in transactions {
            let tx: EnhancedTransaction = match serde_json::from_value(payload.clone()) {
                Ok(tx) => tx,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable Helius transaction");
                    summary.skipped += 1;
                    continue;
                }
            };
            let Some(signature) = tx.signature.clone().filter(|s| !s.is_empty()) else {
                summary.skipped += 1;
                continue;
            };

            let event = ChainEvent {
                signature,
                kind: tx.kind.clone().unwrap_or_else(|| "UNKNOWN".to_string()),
                payload,
            };
            match self
                .repo
                .apply_chain_event(&event, &tx.share_transfers())
                .await?
            {
                Some(moved) => {
                    summary.processed += 1;
                    summary.shares_moved += moved;
                    if moved > 0 {
                        tracing::info!(
                            signature = %event.signature,
                            kind = %event.kind,
                            shares_moved = moved,
                            "Share ownership synced from chain"
                        );
                    }
                }
                None => {
                    tracing::debug!(signature = %event.signature, "Chain event already processed");
                    summary.skipped += 1;
                }
            }
        }

        Ok(summary)
    }
}
