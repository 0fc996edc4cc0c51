//! Timestamp utilities
//!
//! Submission ids are creation-time tokens (epoch milliseconds) and the
//! display timestamp follows the Korean locale layout
//! `2025. 3. 7. 오후 2:05:09`.

use chrono::{Local, NaiveDateTime, Timelike, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Current UTC time as epoch milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Monotonic submission id source
///
/// Ids are wall-clock milliseconds, bumped past the last issued id when the
/// clock has not advanced (or went backwards), so ids never repeat within
/// a process.
#[derive(Debug, Default)]
pub struct SubmissionIds {
    last: AtomicI64,
}

/// Process-wide id source used by [`SystemClock`]
static PROCESS_IDS: SubmissionIds = SubmissionIds::new();

impl SubmissionIds {
    pub const fn new() -> Self {
        Self {
            last: AtomicI64::new(0),
        }
    }

    /// Next id derived from the current clock
    pub fn next(&self) -> i64 {
        self.next_at(now_millis())
    }

    /// Next id given an explicit clock reading
    pub fn next_at(&self, now_ms: i64) -> i64 {
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now_ms.max(prev + 1);
            match self
                .last
                .compare_exchange(prev, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}

/// Source of submission ids and display timestamps
pub trait Clock: Send + Sync {
    /// Fresh `(id, localized timestamp)` pair for a new submission
    fn stamp(&self) -> (i64, String);
}

/// Wall clock; ids are unique across every `SystemClock` in the process
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn stamp(&self) -> (i64, String) {
        (PROCESS_IDS.next(), local_timestamp_now())
    }
}

/// Render a local date-time the way the `ko-KR` locale does
pub fn format_local_timestamp(dt: &NaiveDateTime) -> String {
    let (is_pm, hour12) = dt.hour12();
    format!(
        "{}. {}. {}. {} {}:{:02}:{:02}",
        dt.format("%Y"),
        dt.format("%-m"),
        dt.format("%-d"),
        if is_pm { "오후" } else { "오전" },
        hour12,
        dt.minute(),
        dt.second()
    )
}

/// Localized timestamp for "now"
pub fn local_timestamp_now() -> String {
    format_local_timestamp(&Local::now().naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 7)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_format_afternoon() {
        assert_eq!(format_local_timestamp(&at(14, 5, 9)), "2025. 3. 7. 오후 2:05:09");
    }

    #[test]
    fn test_format_morning() {
        assert_eq!(format_local_timestamp(&at(9, 30, 0)), "2025. 3. 7. 오전 9:30:00");
    }

    #[test]
    fn test_format_midnight_and_noon() {
        assert_eq!(format_local_timestamp(&at(0, 0, 1)), "2025. 3. 7. 오전 12:00:01");
        assert_eq!(format_local_timestamp(&at(12, 0, 0)), "2025. 3. 7. 오후 12:00:00");
    }

    #[test]
    fn test_ids_follow_clock() {
        let ids = SubmissionIds::new();
        assert_eq!(ids.next_at(1_000), 1_000);
        assert_eq!(ids.next_at(2_000), 2_000);
    }

    #[test]
    fn test_ids_strictly_increase_when_clock_stalls() {
        let ids = SubmissionIds::new();
        let a = ids.next_at(5_000);
        let b = ids.next_at(5_000);
        let c = ids.next_at(4_000);
        assert!(a < b && b < c);
    }

    #[test]
    fn test_system_clock_stamps_are_unique() {
        let (a, ts) = SystemClock::new().stamp();
        let (b, _) = SystemClock::new().stamp();
        assert!(b > a);
        assert!(ts.contains("오전") || ts.contains("오후"));
    }

    #[test]
    fn test_now_millis_is_recent() {
        // After 2020-01-01 UTC
        assert!(now_millis() > 1_577_836_800_000);
    }
}
