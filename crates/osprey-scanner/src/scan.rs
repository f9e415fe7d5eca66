use crate::cert::{CertStatus, classify_certificate};
use crate::probe::probe;
use async_trait::async_trait;
use chrono::Utc;
use http::HeaderMap;
use osprey_core::{Category, Issue, Priority};
use url::Url;

const STARTING_SCORE: i32 = 100;
const EXPIRING_SOON_DEDUCTION: i32 = 10;

/// A security header whose absence costs points.
struct HeaderRule {
    header: &'static str,
    deduction: i32,
    priority: Priority,
    title: &'static str,
    description: &'static str,
    recommendation: &'static str,
}

const HEADER_RULES: [HeaderRule; 3] = [
    HeaderRule {
        header: "strict-transport-security",
        deduction: 25,
        priority: Priority::Critical,
        title: "HTTP Strict Transport Security (HSTS) Not Enabled",
        description: "HSTS header is missing, leaving the site vulnerable to protocol downgrade attacks and cookie hijacking.",
        recommendation: "Implement the HSTS header to force browsers to always use HTTPS.",
    },
    HeaderRule {
        header: "content-security-policy",
        deduction: 20,
        priority: Priority::Medium,
        title: "Content Security Policy (CSP) Not Found",
        description: "CSP header is not configured, increasing the risk of Cross-Site Scripting (XSS) attacks.",
        recommendation: "Implement a strict CSP to control which resources can be loaded and executed.",
    },
    HeaderRule {
        header: "x-frame-options",
        deduction: 20,
        priority: Priority::Medium,
        title: "Clickjacking Protection Missing",
        description: "The X-Frame-Options header is not set, which could allow an attacker to embed your site in a malicious one.",
        recommendation: "Set the X-Frame-Options header to \"DENY\" or \"SAMEORIGIN\" to prevent clickjacking.",
    },
];

/// Capability boundary for the security side of an audit.
#[async_trait]
pub trait SecurityScanner: Send + Sync {
    /// Assess the target. Never fails: transport problems degrade into
    /// a zero-score category instead of an error.
    async fn scan(&self, url: &Url) -> Category;
}

/// Probes the target over TLS and grades response headers and the
/// presented certificate.
pub struct TlsScanner;

#[async_trait]
impl SecurityScanner for TlsScanner {
    async fn scan(&self, url: &Url) -> Category {
        tracing::info!(url = %url, "Running security scan");

        match probe(url).await {
            Ok(response) => {
                let status = classify_certificate(response.peer_cert.as_deref(), Utc::now());
                let category = grade(&response.headers, status);
                tracing::info!(
                    score = category.score,
                    issues = category.issues.len(),
                    "Security scan finished"
                );
                category
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Security scan could not reach the host");
                unreachable_category(url.host_str().unwrap_or("the target host"))
            }
        }
    }
}

/// Fold the deduction rules over the probe outcome, starting from 100.
/// Every header rule is evaluated even after earlier ones failed; a
/// missing or expired certificate then forces the score to zero
/// regardless of header deductions, and the result clamps at zero.
pub fn grade(headers: &HeaderMap, cert: CertStatus) -> Category {
    let mut issues = Vec::new();
    let mut score = STARTING_SCORE;

    for rule in &HEADER_RULES {
        if !headers.contains_key(rule.header) {
            issues.push(Issue {
                title: rule.title.to_string(),
                priority: rule.priority,
                description: rule.description.to_string(),
                recommendation: rule.recommendation.to_string(),
            });
            score -= rule.deduction;
        }
    }

    match cert {
        CertStatus::Missing => {
            issues.push(Issue {
                title: "SSL Certificate Invalid".to_string(),
                priority: Priority::Critical,
                description: "Could not validate the SSL/TLS certificate. This will cause major browser warnings.".to_string(),
                recommendation: "Ensure a valid, trusted SSL certificate is installed correctly on the server.".to_string(),
            });
            score = 0;
        }
        CertStatus::Expired => {
            issues.push(Issue {
                title: "SSL Certificate Expired".to_string(),
                priority: Priority::Critical,
                description: "The SSL/TLS certificate has expired, which will cause browsers to show security warnings to users.".to_string(),
                recommendation: "Renew the SSL certificate immediately to restore trust and security.".to_string(),
            });
            score = 0;
        }
        CertStatus::ExpiringSoon { days_left } => {
            issues.push(Issue {
                title: "SSL Certificate Expiring Soon".to_string(),
                priority: Priority::Low,
                description: format!("The SSL/TLS certificate expires in {} days.", days_left),
                recommendation: "Renew the SSL certificate soon to avoid service interruption and security warnings.".to_string(),
            });
            score -= EXPIRING_SOON_DEDUCTION;
        }
        CertStatus::Valid => {}
    }

    Category::new("Security", "shield", score.max(0) as u8, issues)
}

/// Degraded result when the host cannot be reached at all.
fn unreachable_category(host: &str) -> Category {
    Category::new(
        "Security",
        "shield",
        0,
        vec![Issue {
            title: "Could Not Connect for Security Scan".to_string(),
            priority: Priority::Critical,
            description: format!(
                "Failed to perform security scan. Could not connect to the host at {}. This could be a firewall issue or the server is down.",
                host
            ),
            recommendation: "Ensure the domain is correct and the server is accessible over HTTPS (port 443).".to_string(),
        }],
    )
}
