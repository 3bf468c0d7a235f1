//! Solana RPC access
//!
//! `SolanaRpcClient` wraps the nonblocking `solana_client` client; the
//! `ChainRpc` port keeps signing flows testable without a node.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use platform::retry::{RetryPolicy, retry_with_backoff};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::message::Message;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::Transaction;

use crate::error::ChainError;

const RPC_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureStatus {
    pub slot: u64,
    /// processed / confirmed / finalized
    pub confirmation_status: Option<String>,
    pub err: Option<String>,
}

/// Blockhash + submission, the part of RPC that signing flows need
#[trait_variant::make(ChainRpc: Send)]
pub trait LocalChainRpc {
    async fn get_latest_blockhash(&self) -> Result<Hash, ChainError>;

    /// Returns the transaction signature reported by the node
    async fn send_transaction(&self, tx: &Transaction) -> Result<String, ChainError>;
}

#[derive(Clone)]
pub struct SolanaRpcClient {
    inner: Arc<RpcClient>,
}

impl SolanaRpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        let inner = RpcClient::new_with_timeout_and_commitment(
            url.into(),
            RPC_TIMEOUT,
            CommitmentConfig::confirmed(),
        );
        Self {
            inner: Arc::new(inner),
        }
    }

    pub fn url(&self) -> String {
        self.inner.url()
    }

    pub async fn get_health(&self) -> Result<(), ChainError> {
        self.inner.get_health().await.map_err(ChainError::from)
    }

    pub async fn get_signature_status(&self, signature: &str) -> Result<Option<SignatureStatus>, ChainError> {
        let signature = Signature::from_str(signature)
            .map_err(|e| ChainError::InvalidSignature(e.to_string()))?;
        let response = self.inner.get_signature_statuses(&[signature]).await?;

        Ok(response.value.into_iter().next().flatten().map(|status| SignatureStatus {
            slot: status.slot,
            confirmation_status: status
                .confirmation_status
                .map(|c| format!("{c:?}").to_lowercase()),
            err: status.err.map(|e| e.to_string()),
        }))
    }
}

impl std::fmt::Debug for SolanaRpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolanaRpcClient")
            .field("url", &self.inner.url())
            .finish()
    }
}

impl ChainRpc for SolanaRpcClient {
    async fn get_latest_blockhash(&self) -> Result<Hash, ChainError> {
        Ok(self.inner.get_latest_blockhash().await?)
    }

    async fn send_transaction(&self, tx: &Transaction) -> Result<String, ChainError> {
        let signature = self.inner.send_transaction(tx).await?;
        Ok(signature.to_string())
    }
}

/// Fetch a blockhash, sign and submit; transport and RPC errors are retried
/// with exponential backoff, signing errors are not.
pub async fn send_with_retry<R: ChainRpc + Sync>(
    rpc: &R,
    policy: RetryPolicy,
    instructions: &[Instruction],
    payer: &Keypair,
) -> Result<String, ChainError> {
    let payer_key = payer.pubkey();
    retry_with_backoff(
        policy,
        move |attempt| async move {
            let blockhash = rpc.get_latest_blockhash().await?;
            let message = Message::new(instructions, Some(&payer_key));
            let mut tx = Transaction::new_unsigned(message);
            tx.try_sign(&[payer], blockhash)
                .map_err(|e| ChainError::Signing(e.to_string()))?;
            let signature = rpc.send_transaction(&tx).await?;
            tracing::info!(attempt, signature = %signature, "Transaction submitted");
            Ok(signature)
        },
        ChainError::is_retryable,
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::pubkey::Pubkey;
    use solana_sdk::signature::keypair_from_seed;
    use std::sync::Mutex;

    struct FlakyRpc {
        failures_left: Mutex<u32>,
        error: fn() -> ChainError,
        sent: Mutex<Vec<Transaction>>,
    }

    impl FlakyRpc {
        fn new(failures: u32, error: fn() -> ChainError) -> Self {
            Self {
                failures_left: Mutex::new(failures),
                error,
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    impl ChainRpc for FlakyRpc {
        async fn get_latest_blockhash(&self) -> Result<Hash, ChainError> {
            let mut left = self.failures_left.lock().unwrap();
            if *left > 0 {
                *left -= 1;
                return Err((self.error)());
            }
            Ok(Hash::new_from_array([3u8; 32]))
        }

        async fn send_transaction(&self, tx: &Transaction) -> Result<String, ChainError> {
            self.sent.lock().unwrap().push(tx.clone());
            Ok(tx.signatures[0].to_string())
        }
    }

    fn memo_ix() -> Vec<Instruction> {
        vec![Instruction::new_with_bytes(
            Pubkey::new_from_array([11u8; 32]),
            b"deedify",
            vec![],
        )]
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_transport_errors() {
        let rpc = FlakyRpc::new(2, || ChainError::Transport("connection refused".into()));
        let payer = keypair_from_seed(&[4u8; 32]).unwrap();

        let signature = send_with_retry(&rpc, RetryPolicy::default(), &memo_ix(), &payer)
            .await
            .unwrap();

        let sent = rpc.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].signatures[0].to_string(), signature);
        assert_eq!(sent[0].message.account_keys[0], payer.pubkey());
        assert!(sent[0].verify().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_three_attempts() {
        let rpc = FlakyRpc::new(5, || ChainError::Rpc { code: -32005, message: "Node is behind".into() });
        let payer = keypair_from_seed(&[4u8; 32]).unwrap();

        let err = send_with_retry(&rpc, RetryPolicy::default(), &memo_ix(), &payer)
            .await
            .unwrap_err();

        assert!(matches!(err, ChainError::Rpc { code: -32005, .. }));
        assert_eq!(*rpc.failures_left.lock().unwrap(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_does_not_retry_signing_errors() {
        let rpc = FlakyRpc::new(3, || ChainError::Signing("bad".into()));
        let payer = keypair_from_seed(&[4u8; 32]).unwrap();

        let err = send_with_retry(&rpc, RetryPolicy::default(), &memo_ix(), &payer)
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::Signing(_)));
        assert_eq!(*rpc.failures_left.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_signature_status_rejects_garbage() {
        let client = SolanaRpcClient::new("http://127.0.0.1:1");
        assert!(matches!(
            client.get_signature_status("not-a-signature").await,
            Err(ChainError::InvalidSignature(_))
        ));
    }
}
