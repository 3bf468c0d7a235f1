pub mod payout_reason;
pub mod proposal_status;
pub mod vote_choice;
