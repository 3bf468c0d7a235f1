use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform role
///
/// Stored as its upper-case code in `users.role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Buys, sells and votes with shares
    #[default]
    Investor,
    /// Creates land listings
    Lister,
    Admin,
}

impl UserRole {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            UserRole::Investor => "INVESTOR",
            UserRole::Lister => "LISTER",
            UserRole::Admin => "ADMIN",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "INVESTOR" => Some(UserRole::Investor),
            "LISTER" => Some(UserRole::Lister),
            "ADMIN" => Some(UserRole::Admin),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Roles a visitor may pick at registration
    #[inline]
    pub const fn is_self_assignable(&self) -> bool {
        matches!(self, UserRole::Investor | UserRole::Lister)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for role in [UserRole::Investor, UserRole::Lister, UserRole::Admin] {
            assert_eq!(UserRole::from_code(role.code()), Some(role));
        }
        assert_eq!(UserRole::from_code("lister"), Some(UserRole::Lister));
        assert_eq!(UserRole::from_code("owner"), None);
    }

    #[test]
    fn test_admin_is_not_self_assignable() {
        assert!(UserRole::Investor.is_self_assignable());
        assert!(UserRole::Lister.is_self_assignable());
        assert!(!UserRole::Admin.is_self_assignable());
    }
}
