//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Creates a new timestamp by adding the specified number of days.
    ///
    /// Negative values subtract days.
    pub fn add_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Creates a new timestamp by subtracting the specified number of days.
    pub fn minus_days(&self, days: i64) -> Self {
        Self(self.0 - Duration::days(days))
    }

    /// Returns this timestamp truncated to whole UTC seconds.
    ///
    /// Validity-window comparisons must happen on UTC calendar components
    /// (year through second), so stored values that carried a finer precision
    /// or a non-UTC offset cannot skew the comparison near boundaries.
    pub fn truncated_to_seconds(&self) -> Self {
        let dt = self.0;
        let truncated = dt
            .date_naive()
            .and_hms_opt(dt.hour(), dt.minute(), dt.second())
            .unwrap()
            .and_utc();
        Self(truncated)
    }

    /// Creates a timestamp from Unix seconds.
    pub fn from_unix_secs(secs: u64) -> Self {
        use chrono::TimeZone;
        Self(Utc.timestamp_opt(secs as i64, 0).unwrap())
    }

    /// Returns the timestamp as Unix seconds.
    pub fn as_unix_secs(&self) -> u64 {
        self.0.timestamp() as u64
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn timestamp_now_creates_current_time() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(ts.as_datetime() >= &before);
        assert!(ts.as_datetime() <= &after);
    }

    #[test]
    fn timestamp_from_datetime_preserves_value() {
        let dt = Utc::now();
        let ts = Timestamp::from_datetime(dt);
        assert_eq!(ts.as_datetime(), &dt);
    }

    #[test]
    fn truncation_drops_subsecond_precision() {
        let dt = DateTime::parse_from_rfc3339("2024-01-15T10:30:45.987Z")
            .unwrap()
            .with_timezone(&Utc);
        let ts = Timestamp::from_datetime(dt).truncated_to_seconds();

        assert_eq!(ts.as_datetime().timestamp_subsec_millis(), 0);
        assert_eq!(ts.as_datetime().second(), 45);
    }

    #[test]
    fn truncation_normalizes_offset_input_to_utc_components() {
        // +02:00 input: the UTC instant is 08:30:45, and truncation keeps it.
        let dt = DateTime::parse_from_rfc3339("2024-01-15T10:30:45.500+02:00")
            .unwrap()
            .with_timezone(&Utc);
        let ts = Timestamp::from_datetime(dt).truncated_to_seconds();

        assert_eq!(ts.as_datetime().hour(), 8);
        assert_eq!(ts.as_datetime().minute(), 30);
        assert_eq!(ts.as_datetime().second(), 45);
    }

    #[test]
    fn add_and_minus_days_shift_correctly() {
        let ts = Timestamp::from_unix_secs(1_705_276_800); // 2024-01-15T00:00:00Z
        assert_eq!(ts.add_days(1).as_datetime().day(), 16);
        assert_eq!(ts.minus_days(1).as_datetime().day(), 14);
    }

    #[test]
    fn is_before_and_is_after_work() {
        let earlier = Timestamp::from_unix_secs(1000);
        let later = Timestamp::from_unix_secs(2000);

        assert!(earlier.is_before(&later));
        assert!(later.is_after(&earlier));
        assert!(!later.is_before(&earlier));
    }

    #[test]
    fn timestamp_serializes_to_json() {
        let dt = DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let ts = Timestamp::from_datetime(dt);

        let json = serde_json::to_string(&ts).unwrap();
        assert!(json.contains("2024-01-15"));
    }

    #[test]
    fn timestamp_deserializes_from_json() {
        let json = "\"2024-01-15T10:30:00Z\"";
        let ts: Timestamp = serde_json::from_str(json).unwrap();

        assert_eq!(ts.as_datetime().year(), 2024);
    }

    #[test]
    fn timestamp_ordering_works() {
        let ts1 = Timestamp::from_unix_secs(1000);
        let ts2 = Timestamp::from_unix_secs(2000);
        assert!(ts1 < ts2);
    }
}
