//! User Entity

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{
    email::Email, kyc_status::KycStatus, user_password::UserPassword, user_role::UserRole,
    wallet_address::WalletAddress,
};

/// Registered account
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    /// Login identifier (unique, lower-cased)
    pub email: Email,
    pub password: UserPassword,
    pub display_name: Option<String>,
    pub role: UserRole,
    /// Linked Solana wallet (unique across users)
    pub wallet_address: Option<WalletAddress>,
    pub kyc_status: KycStatus,
    /// Provider-side applicant / inquiry id
    pub kyc_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        email: Email,
        password: UserPassword,
        role: UserRole,
        display_name: Option<String>,
        wallet_address: Option<WalletAddress>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            email,
            password,
            display_name,
            role,
            wallet_address,
            kyc_status: KycStatus::Pending,
            kyc_reference: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_kyc_verified(&self) -> bool {
        self.kyc_status.is_verified()
    }

    pub fn set_display_name(&mut self, display_name: Option<String>) {
        self.display_name = display_name;
        self.updated_at = Utc::now();
    }

    pub fn set_wallet(&mut self, wallet: WalletAddress) {
        self.wallet_address = Some(wallet);
        self.updated_at = Utc::now();
    }

    pub fn set_kyc(&mut self, status: KycStatus, reference: Option<String>) {
        self.kyc_status = status;
        if reference.is_some() {
            self.kyc_reference = reference;
        }
        self.updated_at = Utc::now();
    }

    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
        self.updated_at = Utc::now();
    }
}
