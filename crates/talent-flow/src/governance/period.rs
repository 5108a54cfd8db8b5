//! Governance periods are UTC calendar months.

use chrono::{DateTime, Utc};

/// `YYYY-MM` for the month containing `at`.
pub fn period_key(at: DateTime<Utc>) -> String {
    at.format("%Y-%m").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_period_key_is_utc_month() {
        let at = Utc.with_ymd_and_hms(2026, 3, 31, 23, 59, 59).unwrap();
        assert_eq!(period_key(at), "2026-03");
        let at = Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap();
        assert_eq!(period_key(at), "2026-04");
    }
}
