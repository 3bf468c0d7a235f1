//! Domain Layer

pub mod entity;
pub mod repository;
pub mod value_object;

pub use entity::{document::Document, listing::Listing, share_token::ShareToken};
pub use repository::{
    DocumentRepository, ListingFilter, ListingRepository, ListingStore, ShareRepository,
};
pub use value_object::{
    document_kind::DocumentKind, geo_json::GeoJson, listing_status::ListingStatus,
};
