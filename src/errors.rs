//! Marketplace errors.

use thiserror::Error;

use crate::storage::StorageError;

/// Coarse classification of a [`MarketplaceError`], used by presentation
/// layers to pick how an outcome is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required field was missing or malformed.
    ValidationFailed,

    /// The target does not exist, or the caller does not own it.
    NotFoundOrForbidden,

    /// The operation needs a logged-in user.
    LoginRequired,

    /// Durable storage could not be read or written.
    StorageUnavailable,
}

/// Field-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required draft field was empty after trimming.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Price was not a plain non-negative integer (strict policy only).
    #[error("invalid price: {0:?}")]
    InvalidPrice(String),

    /// Campus is not one of the supported campuses.
    #[error("unknown campus: {0:?}")]
    InvalidCampus(String),

    /// Email identifier is missing an `@`.
    #[error("invalid email address: {0:?}")]
    InvalidEmail(String),

    /// Phone identifier is too short.
    #[error("invalid phone number: {0:?}")]
    InvalidPhone(String),

    /// Username was empty.
    #[error("username cannot be empty")]
    EmptyUsername,

    /// Price range filter was not `min-max` or `min-max` with a literal `max`.
    #[error("invalid price range: {0:?}")]
    InvalidPriceRange(String),

    /// Product id was not a positive integer.
    #[error("invalid product id: {0:?}")]
    InvalidProductId(String),
}

/// Errors returned by marketplace operations.
#[derive(Debug, Error)]
pub enum MarketplaceError {
    /// Input failed validation.
    #[error("validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    /// No such product, or the caller is not its seller.
    #[error("product not found or not owned by you")]
    NotFoundOrForbidden,

    /// A login-gated operation was attempted while logged out.
    #[error("login required")]
    LoginRequired,

    /// Login or registration was attempted with a session already open.
    #[error("already logged in")]
    AlreadyLoggedIn,

    /// A seller tried to buy their own listing.
    #[error("cannot buy your own listing")]
    SelfPurchase,

    /// Persisting or reading a slot failed.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] StorageError),

    /// The embedded seed data could not be parsed.
    #[error("failed to parse seed data: {0}")]
    Seed(#[from] serde_norway::Error),
}

impl MarketplaceError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ValidationFailed(_) | Self::AlreadyLoggedIn | Self::SelfPurchase => {
                ErrorKind::ValidationFailed
            }
            Self::NotFoundOrForbidden => ErrorKind::NotFoundOrForbidden,
            Self::LoginRequired => ErrorKind::LoginRequired,
            Self::StorageUnavailable(_) | Self::Seed(_) => ErrorKind::StorageUnavailable,
        }
    }
}
