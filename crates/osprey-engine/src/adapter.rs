use crate::{AuditRecord, EngineReport, Error, PerformanceEngine, Result};
use osprey_core::{AuditFinding, Category, Issue, normalize};
use url::Url;

/// The three performance-side categories of a report.
#[derive(Debug, Clone)]
pub struct PerformanceCategories {
    pub performance: Category,
    pub seo: Category,
    pub accessibility: Category,
}

/// Run the engine against the target and shape its report into scored
/// categories. Engine failures and malformed reports propagate; they
/// are not swallowed here.
pub async fn run_performance_audit(
    engine: &dyn PerformanceEngine,
    url: &Url,
    devtools_port: u16,
) -> Result<PerformanceCategories> {
    let report = engine.run(url, devtools_port).await?;

    let categories = PerformanceCategories {
        performance: category_from(&report, "performance", "Performance", "zap")?,
        seo: category_from(&report, "seo", "SEO", "trending-up")?,
        accessibility: category_from(&report, "accessibility", "Accessibility", "person-standing")?,
    };

    tracing::info!(
        performance = categories.performance.score,
        seo = categories.seo.score,
        accessibility = categories.accessibility.score,
        "Performance audit complete"
    );

    Ok(categories)
}

fn category_from(
    report: &EngineReport,
    key: &str,
    title: &str,
    icon: &str,
) -> Result<Category> {
    let category = report
        .categories
        .get(key)
        .ok_or_else(|| Error::MissingCategory(key.to_string()))?;

    let issues: Vec<Issue> = category
        .audit_refs
        .iter()
        .filter_map(|r| report.audits.get(&r.id))
        .filter_map(issue_from)
        .collect();

    let score = (category.score * 100.0).round().clamp(0.0, 100.0) as u8;
    Ok(Category::new(title, icon, score, issues))
}

/// Audits that pass outright (score 1) or do not apply (score null)
/// produce no issue.
fn issue_from(audit: &AuditRecord) -> Option<Issue> {
    let score = audit.score?;
    if score == 1.0 {
        return None;
    }

    Some(normalize(&AuditFinding {
        title: audit.title.clone(),
        score,
        description: audit.description.clone(),
        savings_ms: audit.details.as_ref().and_then(|d| d.overall_savings_ms),
    }))
}
