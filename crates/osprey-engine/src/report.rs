use serde::Deserialize;
use std::collections::HashMap;

/// Subset of the Lighthouse JSON report consumed by the audit.
/// Everything else in the report is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineReport {
    pub categories: HashMap<String, EngineCategory>,
    pub audits: HashMap<String, AuditRecord>,
}

/// One requested category: its weighted score in [0,1] and the audits
/// contributing to it.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineCategory {
    pub score: f64,
    #[serde(rename = "auditRefs", default)]
    pub audit_refs: Vec<AuditRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuditRef {
    pub id: String,
}

/// One atomic finding. `score` is None for not-applicable audits.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditRecord {
    pub title: String,
    pub score: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub details: Option<AuditDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditDetails {
    #[serde(rename = "overallSavingsMs", default)]
    pub overall_savings_ms: Option<f64>,
}
