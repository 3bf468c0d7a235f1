//! Payouts and their per-holder distribution
//!
//! Each holder receives `floor(amount * held / total_shares)` cents. The
//! denominator is the listing's total, so shares nobody holds yet (and the
//! rounding remainders) stay in `undistributed`.

use chrono::{DateTime, Utc};
use kernel::id::{ListingId, PayoutId, UserId};

use crate::domain::value_object::payout_reason::PayoutReason;

#[derive(Debug, Clone, PartialEq)]
pub struct Payout {
    pub id: PayoutId,
    pub listing_id: ListingId,
    /// Cents
    pub amount: i64,
    pub reason: PayoutReason,
    pub created_by: UserId,
    pub undistributed: i64,
    pub created_at: DateTime<Utc>,
}

/// One holder's cut of a payout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entitlement {
    pub payout_id: PayoutId,
    pub user_id: UserId,
    pub shares_held: i64,
    pub amount: i64,
}

/// Entitlement joined with its payout, for "my payouts"
#[derive(Debug, Clone, PartialEq)]
pub struct HolderPayout {
    pub payout_id: PayoutId,
    pub listing_id: ListingId,
    pub reason: PayoutReason,
    pub shares_held: i64,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

impl Payout {
    /// Build the payout and split `amount` over `holdings` (user, shares held)
    pub fn distribute(
        listing_id: ListingId,
        amount: i64,
        reason: PayoutReason,
        created_by: UserId,
        holdings: &[(UserId, i64)],
        total_shares: i64,
    ) -> (Self, Vec<Entitlement>) {
        let id = PayoutId::new();
        let total = total_shares.max(1) as i128;

        let entitlements: Vec<Entitlement> = holdings
            .iter()
            .filter(|(_, held)| *held > 0)
            .map(|&(user_id, held)| Entitlement {
                payout_id: id,
                user_id,
                shares_held: held,
                amount: (amount as i128 * held as i128 / total) as i64,
            })
            .collect();
        let distributed: i64 = entitlements.iter().map(|e| e.amount).sum();

        let payout = Self {
            id,
            listing_id,
            amount,
            reason,
            created_by,
            undistributed: amount - distributed,
            created_at: Utc::now(),
        };
        (payout, entitlements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_distribution_reports_remainder() {
        let a = UserId::new();
        let b = UserId::new();
        let c = UserId::new();
        // 3 shares total, 1000 cents
        let (payout, entitlements) = Payout::distribute(
            ListingId::new(),
            1_000,
            PayoutReason::Dividend,
            UserId::new(),
            &[(a, 1), (b, 1), (c, 1)],
            3,
        );

        assert!(entitlements.iter().all(|e| e.amount == 333));
        assert_eq!(payout.undistributed, 1);
        assert!(entitlements.iter().all(|e| e.payout_id == payout.id));
    }

    #[test]
    fn test_unheld_shares_stay_undistributed() {
        let holder = UserId::new();
        let (payout, entitlements) = Payout::distribute(
            ListingId::new(),
            10_000,
            PayoutReason::Buyout,
            UserId::new(),
            &[(holder, 25)],
            100,
        );

        assert_eq!(entitlements.len(), 1);
        assert_eq!(entitlements[0].amount, 2_500);
        assert_eq!(payout.undistributed, 7_500);
    }

    #[test]
    fn test_large_amounts_do_not_overflow() {
        let holder = UserId::new();
        let (_, entitlements) = Payout::distribute(
            ListingId::new(),
            i64::MAX / 2,
            PayoutReason::Dividend,
            UserId::new(),
            &[(holder, 9_999)],
            10_000,
        );
        assert!(entitlements[0].amount > 0);
    }
}
