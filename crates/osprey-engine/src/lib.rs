mod adapter;
mod error;
mod lighthouse;
mod report;

pub use adapter::{PerformanceCategories, run_performance_audit};
pub use error::{Error, Result};
pub use lighthouse::{CATEGORIES, LighthouseCli, PerformanceEngine};
pub use report::{AuditDetails, AuditRecord, AuditRef, EngineCategory, EngineReport};
