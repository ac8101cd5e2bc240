//! Shared types for the Canteen platform
//!
//! Domain models and input types used by the order engine and by any
//! front-facing crate (console handlers, exports). Everything here is plain
//! data: no storage, no I/O.

pub mod error;
pub mod models;
pub mod order;
pub mod types;

// Re-exports
pub use error::{AppError, AppResult, ErrorKind};
pub use serde::{Deserialize, Serialize};
pub use types::Id;
