//! Timestamp normalization
//!
//! Recorders report nanosecond integer timestamps; metrics and reports use
//! seconds. Two conversions exist: the historical reports kept only
//! microsecond precision, and regenerated reports must match the archived
//! ones byte for byte, so the truncating form is the default throughout the
//! pipeline. Plain division is available for callers that want full
//! precision.

/// Convert a nanosecond timestamp to seconds, truncated to microsecond
/// precision.
///
/// Formula: `floor(ns / 1000) / 1e6`
/// Keeps the integer seconds and the first 6 sub-second digits, matching the
/// decimal-string narrowing used by earlier report generations.
pub fn ns_to_legacy_seconds(timestamp_ns: i64) -> f64 {
    (timestamp_ns / 1_000) as f64 / 1e6
}

/// Convert a nanosecond timestamp to seconds by plain division.
///
/// Keeps sub-microsecond digits, so results can differ from
/// [`ns_to_legacy_seconds`] at the microsecond boundary.
pub fn ns_to_seconds(timestamp_ns: i64) -> f64 {
    timestamp_ns as f64 / 1e9
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_seconds_matches_string_narrowing() {
        // 1661975258802625400 ns narrows to "1661975258.802625"
        assert_eq!(
            ns_to_legacy_seconds(1_661_975_258_802_625_400),
            1661975258.802625
        );
    }

    #[test]
    fn test_legacy_seconds_drops_sub_microsecond_digits() {
        assert_eq!(
            ns_to_legacy_seconds(1_661_975_258_802_625_999),
            ns_to_legacy_seconds(1_661_975_258_802_625_000)
        );
    }

    #[test]
    fn test_plain_seconds() {
        assert_eq!(ns_to_seconds(2_000_000_000), 2.0);
        assert_eq!(ns_to_seconds(1_500), 1.5e-6);
    }

    #[test]
    fn test_conversions_diverge_at_microsecond_boundary() {
        // The truncating form floors to the microsecond; plain division keeps
        // the half-microsecond remainder.
        let timestamp_ns = 1_500;
        assert_eq!(ns_to_legacy_seconds(timestamp_ns), 1.0e-6);
        assert!(ns_to_seconds(timestamp_ns) > ns_to_legacy_seconds(timestamp_ns));
    }

    #[test]
    fn test_whole_seconds_agree() {
        assert_eq!(ns_to_legacy_seconds(2_000_000_000), 2.0);
        assert_eq!(ns_to_seconds(2_000_000_000), 2.0);
    }
}
