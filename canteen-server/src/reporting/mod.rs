//! Reporting - payroll aggregation and company stats

pub mod payroll;
pub mod stats;

pub use payroll::{payroll_by_date, PayrollEntry, PayrollOrder};
pub use stats::{company_stats, CompanyStats};
