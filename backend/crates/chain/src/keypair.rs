//! Mint authority keypair from configuration

use solana_sdk::signature::{Keypair, Signer, keypair_from_seed};

use crate::error::ChainError;

/// 64 bytes (secret ‖ public), either base58 or the `[1,2,...]` JSON array
/// written by `solana-keygen`. The public half must match the secret.
pub fn keypair_from_config_str(raw: &str) -> Result<Keypair, ChainError> {
    let raw = raw.trim();
    let bytes: Vec<u8> = if raw.starts_with('[') {
        serde_json::from_str(raw).map_err(|e| ChainError::InvalidKeypair(e.to_string()))?
    } else {
        bs58::decode(raw)
            .into_vec()
            .map_err(|e| ChainError::InvalidKeypair(e.to_string()))?
    };
    if bytes.len() != 64 {
        return Err(ChainError::InvalidKeypair(format!(
            "expected 64 bytes, got {}",
            bytes.len()
        )));
    }

    let keypair =
        keypair_from_seed(&bytes[..32]).map_err(|e| ChainError::InvalidKeypair(e.to_string()))?;
    if keypair.pubkey().as_ref() != &bytes[32..] {
        return Err(ChainError::InvalidKeypair(
            "public key does not match secret key".into(),
        ));
    }
    Ok(keypair)
}
