pub mod document_kind;
pub mod geo_json;
pub mod listing_status;
