//! Wallet Address Value Object
//!
//! A Solana account address: 32-44 base58 characters decoding to 32 bytes.
//! Unique across users (`users_wallet_address_key`).

use chain::Pubkey;
use kernel::error::{AppError, AppResult, FieldViolation};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn new(address: impl Into<String>) -> AppResult<Self> {
        let address = address.into().trim().to_string();
        address.parse::<Pubkey>().map_err(|e| {
            AppError::validation(vec![FieldViolation::new(
                "walletAddress",
                format!("Invalid Solana wallet address: {e}"),
            )])
        })?;
        Ok(Self(address))
    }

    pub fn from_db(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
