//! Submission record
//!
//! One completed assessment. Created once when the assessment completes and
//! never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::scoring::format_score;

/// Persisted submission, serialized in camelCase to match the stored
/// slot layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Creation-time token (epoch milliseconds, unique per process)
    pub id: i64,
    /// Localized creation time, display only
    pub timestamp: String,
    pub name: String,
    pub age_group: String,
    pub job_function: String,
    /// Full-precision score
    pub score: f64,
}

impl Submission {
    /// Score as shown to users
    pub fn display_score(&self) -> String {
        format_score(self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_layout_uses_camel_case() {
        let submission = Submission {
            id: 1717000000000,
            timestamp: "2024. 5. 29. 오후 4:26:40".to_string(),
            name: "홍길동".to_string(),
            age_group: "30대".to_string(),
            job_function: "개발".to_string(),
            score: 12.3456,
        };
        let value = serde_json::to_value(&submission).unwrap();
        assert_eq!(value["ageGroup"], "30대");
        assert_eq!(value["jobFunction"], "개발");
        assert_eq!(value["id"], 1717000000000i64);
        assert_eq!(submission.display_score(), "12.35");
    }

    #[test]
    fn test_parses_browser_written_record() {
        let raw = r#"{"id":1717000000000,"timestamp":"2024. 5. 29. 오후 4:26:40",
            "name":"김철수","ageGroup":"20대","jobFunction":"기획","score":-3.5}"#;
        let submission: Submission = serde_json::from_str(raw).unwrap();
        assert_eq!(submission.name, "김철수");
        assert_eq!(submission.score, -3.5);
    }
}
