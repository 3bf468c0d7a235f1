//! Proposal status

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProposalStatus {
    #[default]
    Open,
    Passed,
    Rejected,
}

impl ProposalStatus {
    pub const fn code(&self) -> &'static str {
        match self {
            ProposalStatus::Open => "OPEN",
            ProposalStatus::Passed => "PASSED",
            ProposalStatus::Rejected => "REJECTED",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "OPEN" => Some(ProposalStatus::Open),
            "PASSED" => Some(ProposalStatus::Passed),
            "REJECTED" => Some(ProposalStatus::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
