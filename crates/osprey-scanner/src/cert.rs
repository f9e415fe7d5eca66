use chrono::{DateTime, Utc};
use x509_parser::prelude::*;

/// Days under which a certificate counts as expiring soon.
const EXPIRY_WARNING_DAYS: i64 = 30;

/// Expiry state of the certificate presented during the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertStatus {
    /// No certificate was presented, or it could not be parsed.
    Missing,
    Expired,
    /// Expires within the warning window; `days_left` is whole days.
    ExpiringSoon { days_left: i64 },
    Valid,
}

/// Classify a DER-encoded certificate by its expiry, relative to `now`.
pub fn classify_certificate(der: Option<&[u8]>, now: DateTime<Utc>) -> CertStatus {
    let Some(der) = der else {
        tracing::debug!("No peer certificate presented");
        return CertStatus::Missing;
    };

    let Ok((_, cert)) = parse_x509_certificate(der) else {
        tracing::debug!("Peer certificate could not be parsed");
        return CertStatus::Missing;
    };

    let not_after = cert.validity().not_after.timestamp();
    let Some(not_after) = DateTime::from_timestamp(not_after, 0) else {
        return CertStatus::Missing;
    };

    if now > not_after {
        return CertStatus::Expired;
    }

    let days_left = not_after.signed_duration_since(now).num_days();
    if days_left < EXPIRY_WARNING_DAYS {
        CertStatus::ExpiringSoon { days_left }
    } else {
        CertStatus::Valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    /// Self-signed certificate DER plus its parsed expiry instant.
    fn test_certificate() -> (Vec<u8>, DateTime<Utc>) {
        let certified = rcgen::generate_simple_self_signed(vec!["example.com".to_string()])
            .expect("test certificate");
        let der = certified.cert.der().as_ref().to_vec();

        let (_, cert) = parse_x509_certificate(&der).unwrap();
        let not_after = DateTime::from_timestamp(cert.validity().not_after.timestamp(), 0).unwrap();

        (der, not_after)
    }

    #[test]
    fn test_no_certificate_is_missing() {
        assert_eq!(classify_certificate(None, Utc::now()), CertStatus::Missing);
    }

    #[test]
    fn test_garbage_der_is_missing() {
        let garbage = vec![0xde, 0xad, 0xbe, 0xef];
        assert_eq!(
            classify_certificate(Some(&garbage), Utc::now()),
            CertStatus::Missing
        );
    }

    #[test]
    fn test_expired_certificate() {
        let (der, not_after) = test_certificate();
        let after_expiry = not_after + Duration::days(1);

        assert_eq!(
            classify_certificate(Some(&der), after_expiry),
            CertStatus::Expired
        );
    }

    #[test]
    fn test_expiring_soon_reports_whole_days() {
        let (der, not_after) = test_certificate();
        let twelve_days_before = not_after - Duration::days(12);

        assert_eq!(
            classify_certificate(Some(&der), twelve_days_before),
            CertStatus::ExpiringSoon { days_left: 12 }
        );
    }

    #[test]
    fn test_thirty_days_out_is_still_valid() {
        let (der, not_after) = test_certificate();
        let thirty_days_before = not_after - Duration::days(30);

        assert_eq!(
            classify_certificate(Some(&der), thirty_days_before),
            CertStatus::Valid
        );
    }

    #[test]
    fn test_just_under_thirty_days_warns() {
        let (der, not_after) = test_certificate();
        let inside_window = not_after - Duration::days(30) + Duration::hours(1);

        assert_eq!(
            classify_certificate(Some(&der), inside_window),
            CertStatus::ExpiringSoon { days_left: 29 }
        );
    }

    #[test]
    fn test_far_future_expiry_is_valid() {
        let (der, not_after) = test_certificate();
        let long_before = not_after - Duration::days(365);

        assert_eq!(classify_certificate(Some(&der), long_before), CertStatus::Valid);
    }
}
