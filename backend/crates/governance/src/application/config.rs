//! Governance Configuration

use chrono::Duration;

#[derive(Debug, Clone)]
pub struct GovernanceConfig {
    /// Latest allowed `closesAt`, counted from proposal creation
    pub max_voting_period: Duration,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            max_voting_period: Duration::days(90),
        }
    }
}

impl GovernanceConfig {
    pub fn development() -> Self {
        Self::default()
    }
}
