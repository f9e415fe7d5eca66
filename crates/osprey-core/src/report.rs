use serde::{Deserialize, Serialize};

/// Severity of a single finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    Critical,
}

/// One normalized, user-facing finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub title: String,
    pub priority: Priority,
    pub description: String,
    pub recommendation: String,
}

/// One scored section of the final report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub title: String,
    pub icon: String,
    pub score: u8,
    pub issues: Vec<Issue>,
}

impl Category {
    /// Build a category, capping the score at 100
    pub fn new(title: &str, icon: &str, score: u8, issues: Vec<Issue>) -> Self {
        Self {
            title: title.to_string(),
            icon: icon.to_string(),
            score: score.min(100),
            issues,
        }
    }
}

/// The complete audit result. Field order is fixed so the same input
/// always serializes to the same bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub security: Category,
    pub performance: Category,
    pub seo: Category,
    pub accessibility: Category,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Priority::Low).unwrap(), "\"low\"");
        assert_eq!(
            serde_json::to_string(&Priority::Medium).unwrap(),
            "\"medium\""
        );
        assert_eq!(
            serde_json::to_string(&Priority::Critical).unwrap(),
            "\"critical\""
        );
    }

    #[test]
    fn test_category_caps_score_at_100() {
        let category = Category::new("Performance", "zap", 140, vec![]);
        assert_eq!(category.score, 100);
    }

    #[test]
    fn test_report_field_order_is_stable() {
        let category = Category::new("Security", "shield", 35, vec![]);
        let report = Report {
            security: category.clone(),
            performance: category.clone(),
            seo: category.clone(),
            accessibility: category,
        };

        let json = serde_json::to_string(&report).unwrap();
        let security = json.find("\"security\"").unwrap();
        let performance = json.find("\"performance\"").unwrap();
        let seo = json.find("\"seo\"").unwrap();
        let accessibility = json.find("\"accessibility\"").unwrap();

        assert!(security < performance);
        assert!(performance < seo);
        assert!(seo < accessibility);
    }
}
