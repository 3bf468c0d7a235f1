pub mod governed_listing;
pub mod payout;
pub mod proposal;
pub mod vote;
