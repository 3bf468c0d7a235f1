//! Chain Error Types

use kernel::error::{AppError, ErrorKind};
use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_client::rpc_request::RpcError;
use thiserror::Error;

pub type ChainResult<T> = Result<T, ChainError>;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Invalid public key: {0}")]
    InvalidPubkey(String),

    #[error("Invalid keypair: {0}")]
    InvalidKeypair(String),

    #[error("Invalid transaction signature: {0}")]
    InvalidSignature(String),

    #[error("Unable to find a viable program address bump seed")]
    NoViableBump,

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("RPC transport error: {0}")]
    Transport(String),

    #[error("Unexpected RPC response: {0}")]
    UnexpectedResponse(String),
}

impl ChainError {
    /// Transport/RPC failures are worth another attempt; malformed input is not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ChainError::Rpc { .. } | ChainError::Transport(_) | ChainError::UnexpectedResponse(_)
        )
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ChainError::InvalidPubkey(_) | ChainError::InvalidSignature(_) => ErrorKind::BadRequest,
            ChainError::Rpc { .. }
            | ChainError::Transport(_)
            | ChainError::UnexpectedResponse(_) => ErrorKind::BadGateway,
            _ => ErrorKind::InternalServerError,
        }
    }

    pub fn log(&self) {
        if self.is_retryable() {
            tracing::warn!(error = %self, "Solana RPC failure");
        } else if self.kind().is_server_error() {
            tracing::error!(error = %self, "Chain error");
        } else {
            tracing::debug!(error = %self, "Chain error");
        }
    }
}

impl From<ClientError> for ChainError {
    fn from(err: ClientError) -> Self {
        match err.kind() {
            ClientErrorKind::RpcError(RpcError::RpcResponseError { code, message, .. }) => {
                ChainError::Rpc {
                    code: *code,
                    message: message.clone(),
                }
            }
            ClientErrorKind::Io(_) | ClientErrorKind::Reqwest(_) => {
                ChainError::Transport(err.to_string())
            }
            ClientErrorKind::SigningError(e) => ChainError::Signing(e.to_string()),
            _ => ChainError::UnexpectedResponse(err.to_string()),
        }
    }
}

impl From<ChainError> for AppError {
    fn from(err: ChainError) -> Self {
        err.log();
        AppError::new(err.kind(), err.to_string())
    }
}
