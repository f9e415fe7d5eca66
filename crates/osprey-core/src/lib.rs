pub mod normalize;
pub mod report;

pub use normalize::{AuditFinding, normalize, priority_for_score, strip_markdown_links};
pub use report::{Category, Issue, Priority, Report};
