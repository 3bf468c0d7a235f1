//! Listing Entity

use auth::AuthUser;
use chrono::{DateTime, Utc};
use kernel::id::{ListingId, UserId};

use crate::domain::value_object::{geo_json::GeoJson, listing_status::ListingStatus};
use crate::error::{ListingError, ListingResult};

/// A land parcel offered as fractional shares
#[derive(Debug, Clone)]
pub struct Listing {
    pub id: ListingId,
    pub owner_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub geo_json: GeoJson,
    /// Acres
    pub parcel_size: f64,
    pub total_shares: i32,
    /// Cents
    pub price_per_share: i64,
    pub status: ListingStatus,
    /// Listing PDA under the share program
    pub chain_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied at creation
pub struct NewListing {
    pub title: String,
    pub description: Option<String>,
    pub geo_json: GeoJson,
    pub parcel_size: f64,
    pub total_shares: i32,
    pub price_per_share: i64,
}

impl Listing {
    pub fn new(owner_id: UserId, fields: NewListing) -> Self {
        let now = Utc::now();
        Self {
            id: ListingId::new(),
            owner_id,
            title: fields.title,
            description: fields.description,
            geo_json: fields.geo_json,
            parcel_size: fields.parcel_size,
            total_shares: fields.total_shares,
            price_per_share: fields.price_per_share,
            status: ListingStatus::Pending,
            chain_address: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    /// Owner or admin
    pub fn can_manage(&self, actor: &AuthUser) -> bool {
        actor.is_admin() || self.is_owned_by(actor.user_id)
    }

    /// LIVE listings are public; everything else only to its owner and admins
    pub fn is_visible_to(&self, actor: &AuthUser) -> bool {
        self.status == ListingStatus::Live || self.can_manage(actor)
    }

    pub fn ensure_manageable(&self, actor: &AuthUser) -> ListingResult<()> {
        if self.can_manage(actor) {
            Ok(())
        } else {
            Err(ListingError::NotOwner)
        }
    }

    pub fn ensure_editable(&self) -> ListingResult<()> {
        if self.status.is_editable() {
            Ok(())
        } else {
            Err(ListingError::NotEditable(self.status))
        }
    }

    /// Apply a status change on behalf of `actor`.
    ///
    /// Admins drive the whole lifecycle; an owner may only withdraw a listing
    /// that has not been approved yet.
    pub fn transition(&mut self, to: ListingStatus, actor: &AuthUser) -> ListingResult<()> {
        if !self.status.can_transition_to(to) {
            return Err(ListingError::IllegalTransition {
                from: self.status,
                to,
            });
        }

        let owner_withdraw = self.is_owned_by(actor.user_id)
            && self.status == ListingStatus::Pending
            && to == ListingStatus::Closed;
        if !actor.is_admin() && !owner_withdraw {
            return Err(ListingError::NotOwner);
        }

        self.status = to;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::UserRole;
    use serde_json::json;

    fn actor(user_id: UserId, role: UserRole) -> AuthUser {
        AuthUser {
            user_id,
            role,
            email: "someone@deedify.test".into(),
        }
    }

    fn listing(owner: UserId) -> Listing {
        Listing::new(
            owner,
            NewListing {
                title: "North Pasture".into(),
                description: None,
                geo_json: GeoJson::new(json!({"type": "Point", "coordinates": [0, 0]})).unwrap(),
                parcel_size: 12.5,
                total_shares: 100,
                price_per_share: 5_000,
            },
        )
    }

    #[test]
    fn test_admin_approves_and_pauses() {
        let admin = actor(UserId::new(), UserRole::Admin);
        let mut l = listing(UserId::new());

        l.transition(ListingStatus::Live, &admin).unwrap();
        l.transition(ListingStatus::Paused, &admin).unwrap();
        l.transition(ListingStatus::Live, &admin).unwrap();
        l.transition(ListingStatus::Closed, &admin).unwrap();

        let err = l.transition(ListingStatus::Live, &admin).unwrap_err();
        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn test_owner_may_only_withdraw_pending() {
        let owner_id = UserId::new();
        let owner = actor(owner_id, UserRole::Lister);

        let mut l = listing(owner_id);
        assert!(matches!(
            l.transition(ListingStatus::Live, &owner),
            Err(ListingError::NotOwner)
        ));
        l.transition(ListingStatus::Closed, &owner).unwrap();
        assert_eq!(l.status, ListingStatus::Closed);
    }

    #[test]
    fn test_visibility() {
        let owner_id = UserId::new();
        let stranger = actor(UserId::new(), UserRole::Investor);
        let mut l = listing(owner_id);

        assert!(!l.is_visible_to(&stranger));
        assert!(l.is_visible_to(&actor(owner_id, UserRole::Lister)));
        assert!(l.is_visible_to(&actor(UserId::new(), UserRole::Admin)));

        l.status = ListingStatus::Live;
        assert!(l.is_visible_to(&stranger));
    }
}
