//! KYC Status Value Object

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity verification state. New accounts start as `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KycStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
    Expired,
}

impl KycStatus {
    pub const fn code(&self) -> &'static str {
        match self {
            KycStatus::Pending => "PENDING",
            KycStatus::Verified => "VERIFIED",
            KycStatus::Rejected => "REJECTED",
            KycStatus::Expired => "EXPIRED",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Some(KycStatus::Pending),
            "VERIFIED" => Some(KycStatus::Verified),
            "REJECTED" => Some(KycStatus::Rejected),
            "EXPIRED" => Some(KycStatus::Expired),
            _ => None,
        }
    }

    /// Map the verification provider's vocabulary onto ours
    pub fn from_provider(status: &str) -> Option<Self> {
        match status.trim().to_ascii_lowercase().as_str() {
            "approved" | "verified" | "completed" | "success" => Some(KycStatus::Verified),
            "declined" | "rejected" | "failed" | "denied" => Some(KycStatus::Rejected),
            "expired" => Some(KycStatus::Expired),
            "pending" | "review" | "in_review" | "submitted" | "created" => Some(KycStatus::Pending),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_verified(&self) -> bool {
        matches!(self, KycStatus::Verified)
    }
}

impl fmt::Display for KycStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
