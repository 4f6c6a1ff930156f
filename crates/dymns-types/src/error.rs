//! Error types for the DymNS marketplace.
//!
//! All errors use the `DNS_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by the kind of failure surfaced to the caller:
//! - 1xx: Validation failures (malformed input, wrong denom, low price)
//! - 2xx: Not found (order, Dym-Name, alias, rollapp)
//! - 3xx: Permission denied (not the buyer / owner)
//! - 4xx: Failed precondition (trading disabled or prohibited, active sell order)
//! - 5xx: Already exists (ID collision, alias in use)
//! - 6xx: Funds (propagated from the bank)
//! - 8xx: Invariant violations detected by the invariant checker
//! - 9xx: Serialization / configuration
//!
//! Programmer errors and corrupted state (counter overflow, inserting an order
//! that already has an ID) are **not** represented here: they panic.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::AssetType;

/// Coarse classification of a [`DymnsError`], independent of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ValidationFailed,
    NotFound,
    PermissionDenied,
    FailedPrecondition,
    AlreadyExists,
    InsufficientFunds,
    InvariantViolation,
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ValidationFailed => write!(f, "VALIDATION_FAILED"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::PermissionDenied => write!(f, "PERMISSION_DENIED"),
            Self::FailedPrecondition => write!(f, "FAILED_PRECONDITION"),
            Self::AlreadyExists => write!(f, "ALREADY_EXISTS"),
            Self::InsufficientFunds => write!(f, "INSUFFICIENT_FUNDS"),
            Self::InvariantViolation => write!(f, "INVARIANT_VIOLATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// Central error enum for all DymNS operations.
#[derive(Debug, Error)]
pub enum DymnsError {
    // =================================================================
    // Validation (1xx)
    // =================================================================
    /// Generic malformed argument.
    #[error("DNS_ERR_100: Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// The address could not be decoded by the address codec.
    #[error("DNS_ERR_101: Invalid address: {0}")]
    InvalidAddress(String),

    /// The asset ID is not a well-formed Dym-Name / Alias.
    #[error("DNS_ERR_102: Invalid {asset_type}: {asset_id}")]
    InvalidAssetId {
        asset_type: AssetType,
        asset_id: String,
    },

    /// The order ID is malformed or does not match its asset type.
    #[error("DNS_ERR_103: Invalid order ID: {0}")]
    InvalidOrderId(String),

    /// The amount is not denominated in the expected currency.
    #[error("DNS_ERR_104: Invalid denomination: expected {expected}, got {actual}")]
    DenomMismatch { expected: String, actual: String },

    /// The offered amount is below the configured minimum.
    #[error("DNS_ERR_105: Offer price must be greater than or equal to {minimum}, got {actual}")]
    BelowMinimumOffer { minimum: Decimal, actual: Decimal },

    /// A raise did not increase the price.
    #[error("DNS_ERR_106: Offer price must be greater than existing offer price {existing}")]
    PriceNotHigher { existing: String },

    /// The accepted amount is below the order's offer price.
    #[error("DNS_ERR_107: Amount must be greater than or equal to the offer price {offer_price}")]
    BelowOfferPrice { offer_price: String },

    // =================================================================
    // Not found (2xx)
    // =================================================================
    /// No order with this ID.
    #[error("DNS_ERR_200: Order not found: {0}")]
    OrderNotFound(String),

    /// The Dym-Name does not exist or has expired.
    #[error("DNS_ERR_201: Dym-Name not found: {0}")]
    DymNameNotFound(String),

    /// The alias is not linked to any rollapp.
    #[error("DNS_ERR_202: Alias is not in use: {0}")]
    AliasNotFound(String),

    /// Generic missing record.
    #[error("DNS_ERR_203: Not found: {what}")]
    NotFound { what: String },

    // =================================================================
    // Permission (3xx)
    // =================================================================
    #[error("DNS_ERR_300: Permission denied: {reason}")]
    PermissionDenied { reason: String },

    // =================================================================
    // Precondition (4xx)
    // =================================================================
    #[error("DNS_ERR_400: Failed precondition: {reason}")]
    FailedPrecondition { reason: String },

    // =================================================================
    // Already exists (5xx)
    // =================================================================
    #[error("DNS_ERR_500: Already exists: {what}")]
    AlreadyExists { what: String },

    // =================================================================
    // Funds (6xx)
    // =================================================================
    /// The source account does not hold enough of the denomination.
    #[error("DNS_ERR_600: Insufficient funds in {account}: need {needed}{denom}, have {available}{denom}")]
    InsufficientFunds {
        account: String,
        denom: String,
        needed: Decimal,
        available: Decimal,
    },

    /// Crediting would push the balance past the largest representable amount.
    #[error("DNS_ERR_601: Balance overflow in {account}: {balance}{denom} + {amount}{denom}")]
    BalanceOverflow {
        account: String,
        denom: String,
        balance: Decimal,
        amount: Decimal,
    },

    // =================================================================
    // Invariants (8xx)
    // =================================================================
    /// Escrow held by the module differs from the sum of open orders.
    #[error("DNS_ERR_800: Escrow invariant violation: {reason}")]
    EscrowInvariantViolation { reason: String },

    /// A reverse index disagrees with the primary records.
    #[error("DNS_ERR_801: Index invariant violation: {reason}")]
    IndexInvariantViolation { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Serialization / deserialization error.
    #[error("DNS_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid params file, bad values).
    #[error("DNS_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

impl DymnsError {
    /// Shorthand for [`DymnsError::InvalidArgument`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`DymnsError::PermissionDenied`].
    pub fn denied(reason: impl Into<String>) -> Self {
        Self::PermissionDenied {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`DymnsError::FailedPrecondition`].
    pub fn precondition(reason: impl Into<String>) -> Self {
        Self::FailedPrecondition {
            reason: reason.into(),
        }
    }

    /// The taxonomy bucket this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. }
            | Self::InvalidAddress(_)
            | Self::InvalidAssetId { .. }
            | Self::InvalidOrderId(_)
            | Self::DenomMismatch { .. }
            | Self::BelowMinimumOffer { .. }
            | Self::PriceNotHigher { .. }
            | Self::BelowOfferPrice { .. } => ErrorKind::ValidationFailed,
            Self::OrderNotFound(_)
            | Self::DymNameNotFound(_)
            | Self::AliasNotFound(_)
            | Self::NotFound { .. } => ErrorKind::NotFound,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::FailedPrecondition { .. } => ErrorKind::FailedPrecondition,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Self::EscrowInvariantViolation { .. } | Self::IndexInvariantViolation { .. } => {
                ErrorKind::InvariantViolation
            }
            Self::BalanceOverflow { .. }
            | Self::Serialization(_)
            | Self::Configuration(_) => ErrorKind::Internal,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, DymnsError>;

impl From<serde_json::Error> for DymnsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
