//! Market Error Types

use axum::response::{IntoResponse, Response};
use kernel::error::{AppError, ErrorKind};
use listing::ListingStatus;
use thiserror::Error;

use crate::domain::value_object::order_status::OrderStatus;

pub type MarketResult<T> = Result<T, MarketError>;

#[derive(Debug, Error)]
pub enum MarketError {
    #[error("No share token with that mint address")]
    MintNotFound,

    #[error("Order not found")]
    OrderNotFound,

    #[error("No open bid matches this sell order")]
    NoMatchingBid,

    #[error("You do not hold this share")]
    NotShareHolder,

    #[error("Only the order owner may cancel it")]
    NotOrderOwner,

    #[error("Identity verification (KYC) is required")]
    KycRequired,

    #[error("Listing is {0}, shares can only be listed while LIVE")]
    ListingNotLive(ListingStatus),

    #[error("This share already has an open listing")]
    AlreadyListed,

    #[error("You already hold this share")]
    OwnShare,

    #[error("Share has no holder to buy from")]
    NoHolder,

    #[error("Order is {0}")]
    OrderNotOpen(OrderStatus),

    #[error("Order is not matched")]
    NotMatched,

    /// Ownership changed between matching and settlement
    #[error("Seller no longer holds the share")]
    SellerChanged,

    #[error("price is required when the share has no open listing")]
    PriceRequired,

    #[error("price must be at most {max} cents")]
    PriceTooHigh { max: i64 },

    #[error("Unknown {field} value {value:?}")]
    UnknownCode { field: &'static str, value: String },

    #[error(transparent)]
    App(#[from] AppError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl MarketError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MarketError::MintNotFound | MarketError::OrderNotFound | MarketError::NoMatchingBid => {
                ErrorKind::NotFound
            }
            MarketError::NotShareHolder | MarketError::NotOrderOwner | MarketError::KycRequired => {
                ErrorKind::Forbidden
            }
            MarketError::ListingNotLive(_)
            | MarketError::AlreadyListed
            | MarketError::OwnShare
            | MarketError::NoHolder
            | MarketError::OrderNotOpen(_)
            | MarketError::NotMatched
            | MarketError::SellerChanged => ErrorKind::Conflict,
            MarketError::PriceRequired
            | MarketError::PriceTooHigh { .. }
            | MarketError::UnknownCode { .. } => ErrorKind::BadRequest,
            MarketError::App(e) => e.kind(),
            MarketError::Database(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    pub fn into_app_error(self) -> AppError {
        match self {
            MarketError::App(e) => e,
            MarketError::Database(e) => AppError::from(e),
            MarketError::KycRequired => AppError::forbidden(self.to_string())
                .with_action("Complete identity verification and try again"),
            MarketError::PriceRequired | MarketError::PriceTooHigh { .. } => {
                let message = self.to_string();
                AppError::validation(vec![kernel::error::FieldViolation::new(
                    "price",
                    message,
                )])
            }
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    pub fn log(&self) {
        match self {
            MarketError::Database(e) => {
                tracing::error!(error = %e, "Market database error");
            }
            MarketError::App(e) if e.is_server_error() => {
                tracing::error!(error = %e, "Market error");
            }
            MarketError::SellerChanged => {
                tracing::warn!("Settlement rejected, seller no longer holds the share");
            }
            MarketError::NotShareHolder | MarketError::NotOrderOwner => {
                tracing::warn!(error = %self, "Market ownership check failed");
            }
            _ => {
                tracing::debug!(error = %self, "Market error");
            }
        }
    }
}

impl IntoResponse for MarketError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}
