//! Canteen Server - order engine for a multi-tenant food-ordering platform
//!
//! Companies (tenants) register with partner restaurants; their employees
//! order from the restaurants' menus and the company subsidizes part of the
//! bill. This crate owns the order path and its immediate collaborators;
//! transport (HTTP routing, auth middleware) lives in front of it.
//!
//! # Module structure
//!
//! ```text
//! canteen-server/src/
//! ├── core/       # configuration
//! ├── db/         # embedded redb storage
//! ├── catalog/    # menu catalog service (cache + persistence)
//! ├── policy/     # tenant policy lookups and enforcement
//! ├── orders/     # order assembly, pricing, persistence, lifecycle
//! ├── reporting/  # payroll aggregation and company stats
//! └── utils/      # logging, time windows, input validation
//! ```

pub mod catalog;
pub mod core;
pub mod db;
pub mod orders;
pub mod policy;
pub mod reporting;
pub mod utils;

// Re-export public types
pub use catalog::CatalogService;
pub use crate::core::config::{Config, DEFAULT_SERVICE_FEE};
pub use db::{Storage, StorageError};
pub use orders::{OrderAssembler, OrderPage, OrderStore, MAX_ORDERS_PER_REQUEST};
pub use policy::{check_policy, CompanyDirectory, OrderCounts};
pub use reporting::{company_stats, payroll_by_date, CompanyStats, PayrollEntry};
pub use shared::{AppError, AppResult, ErrorKind, Id};
pub use utils::logger::{init_logger, Logger, TracingLogger};
