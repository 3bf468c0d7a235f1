//! Value Object Module

pub mod email;
pub mod kyc_status;
pub mod user_password;
pub mod user_role;
pub mod wallet_address;
