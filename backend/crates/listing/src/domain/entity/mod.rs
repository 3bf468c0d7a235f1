pub mod document;
pub mod listing;
pub mod share_token;
