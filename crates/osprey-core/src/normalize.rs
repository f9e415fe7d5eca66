use crate::report::{Issue, Priority};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref MARKDOWN_LINK: Regex =
        Regex::new(r"\[(.*?)\]\(.*?\)").expect("markdown link pattern must compile");
}

/// Shown when a finding carries neither a savings estimate nor a
/// description.
const FALLBACK_RECOMMENDATION: &str = "See Lighthouse report for details.";

/// One raw finding from a score-based analysis source, before it is
/// shaped into a user-facing issue.
#[derive(Debug, Clone)]
pub struct AuditFinding {
    pub title: String,
    /// Score in [0,1]. Sources filter out passing (1) and
    /// not-applicable (null) findings before normalizing.
    pub score: f64,
    /// May embed markdown-style links, which are stripped.
    pub description: Option<String>,
    /// Estimated time savings in milliseconds, when the source
    /// provides one.
    pub savings_ms: Option<f64>,
}

/// Replace every markdown link `[text](target)` with its text.
pub fn strip_markdown_links(input: &str) -> String {
    MARKDOWN_LINK.replace_all(input, "$1").into_owned()
}

/// Classify a [0,1] score. Later rules override earlier ones, so an
/// exact zero ends up critical even though it also passes the medium
/// threshold.
pub fn priority_for_score(score: f64) -> Priority {
    let mut priority = Priority::Low;
    if score < 0.5 {
        priority = Priority::Medium;
    }
    if score == 0.0 {
        priority = Priority::Critical;
    }
    priority
}

/// Shape a raw finding into an issue: classify its priority, strip
/// markdown links from the description, and pick the most useful
/// recommendation available.
pub fn normalize(finding: &AuditFinding) -> Issue {
    let description = finding
        .description
        .as_deref()
        .map(strip_markdown_links)
        .unwrap_or_default();

    let recommendation = if let Some(ms) = finding.savings_ms {
        format!(
            "Optimizing this could save up to {}s.",
            (ms / 1000.0).round() as i64
        )
    } else if !description.is_empty() {
        description.clone()
    } else {
        FALLBACK_RECOMMENDATION.to_string()
    };

    Issue {
        title: finding.title.clone(),
        priority: priority_for_score(finding.score),
        description,
        recommendation,
    }
}
