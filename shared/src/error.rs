//! Unified error handling
//!
//! Application-level error taxonomy shared by the engine and its callers:
//!
//! - [`AppError`] - error enum, one variant per client-addressable kind
//! - [`ErrorKind`] - kind tag a transport layer maps to status codes
//!
//! # Error code ranges
//!
//! | Prefix | Category | Example |
//! |--------|----------|---------|
//! | E0xxx  | General input errors | E0002 validation failed |
//! | E4xxx  | Order errors | E4003 policy violation |
//! | E9xxx  | System errors | E9002 storage error |
//!
//! The engine never maps errors to HTTP itself; callers read [`AppError::kind`]
//! and [`ErrorKind::code`] and decide their own wire representation.

use serde::Serialize;
use thiserror::Error;

/// Error kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Malformed or missing input field (400-class)
    Validation,
    /// Referenced entity does not exist (404-class)
    NotFound,
    /// Reference is well-formed but not linked to its claimed parent (400-class)
    Association,
    /// Selection violates a cardinality rule (400-class)
    Constraint,
    /// Tenant-level business rule violated (403/409-class)
    Policy,
    /// Underlying store failed; safe to retry the whole operation (500-class)
    Storage,
    /// Unexpected internal error (500-class)
    Internal,
}

impl ErrorKind {
    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation => "E0002",
            Self::NotFound => "E0003",
            Self::Association => "E4001",
            Self::Constraint => "E4002",
            Self::Policy => "E4003",
            Self::Storage => "E9002",
            Self::Internal => "E9001",
        }
    }
}

/// Application error
///
/// Every variant carries a human-readable message with enough detail (entity
/// name or id, violated limit) to render an actionable client message.
/// Internal failure detail stays in logs, never in the message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Association violation: {0}")]
    Association(String),

    #[error("Selection constraint violated: {0}")]
    Constraint(String),

    #[error("Order policy violation: {0}")]
    Policy(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn association(message: impl Into<String>) -> Self {
        Self::Association(message.into())
    }

    pub fn constraint(message: impl Into<String>) -> Self {
        Self::Constraint(message.into())
    }

    pub fn policy(message: impl Into<String>) -> Self {
        Self::Policy(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Kind tag for transport-layer mapping
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Association(_) => ErrorKind::Association,
            Self::Constraint(_) => ErrorKind::Constraint,
            Self::Policy(_) => ErrorKind::Policy,
            Self::Storage(_) => ErrorKind::Storage,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Stable error code string
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// Whether the caller can fix this by correcting the request
    pub fn is_client_error(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Storage | ErrorKind::Internal)
    }
}

/// Result type for engine operations
pub type AppResult<T> = Result<T, AppError>;
