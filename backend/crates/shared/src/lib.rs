//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of domain vocabulary:
//! - Common error types and result aliases
//! - Typed ID wrappers for every Deedify entity
//! - Request validation and pagination primitives
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all bounded contexts.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;

    pub use app_error::{AppError, AppResult, FieldViolation, OptionExt, ResultExt};
    #[cfg(feature = "axum")]
    pub use conversions::ErrorTrace;
    pub use kind::ErrorKind;
}
pub mod id;
pub mod page;
#[cfg(feature = "axum")]
pub mod validation;
