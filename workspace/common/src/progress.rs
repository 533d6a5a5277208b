use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Subject header shared by every listing that mentions a subject.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SubjectSummary {
    pub id: i32,
    pub name: String,
    pub code: Option<String>,
    pub is_active: bool,
}

/// One topic of a subject, in syllabus order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TopicRow {
    pub id: i32,
    pub name: String,
    /// 1-based position within the subject.
    pub order: i32,
    pub is_completed: bool,
    pub expected_date: Option<NaiveDate>,
    pub completed_date: Option<NaiveDate>,
    pub hours_allocated: Option<i32>,
}

/// A subject as the owning teacher sees it in listings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TeacherSubjectRow {
    pub subject: SubjectSummary,
    pub enrolled: u64,
    pub progress_percent: f64,
}

/// A subject as an enrolled student sees it in listings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct StudentSubjectRow {
    pub subject: SubjectSummary,
    pub teacher_name: String,
    pub status: String,
    pub progress_percent: f64,
}

/// Full view of one subject: header, ordered topics, aggregate progress.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SubjectOverview {
    pub subject: SubjectSummary,
    pub topics: Vec<TopicRow>,
    pub progress_percent: f64,
    pub enrolled: u64,
}

/// A subject in coordinator listings, joined with its teacher.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct SubjectAdminRow {
    pub id: i32,
    pub name: String,
    pub code: Option<String>,
    pub teacher_id: i32,
    pub teacher_name: Option<String>,
    pub is_active: bool,
}

/// One enrollment joined with its student, for coordinator listings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct EnrollmentRow {
    pub student_id: i32,
    pub name: String,
    pub email: String,
    pub status: String,
    pub progress: f64,
    pub enrolled_at: DateTime<Utc>,
}

/// Result of a bulk enrollment import. The batch never fails as a whole;
/// every candidate lands in exactly one of the two counters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ImportOutcome {
    pub added: u32,
    pub skipped: u32,
}

impl ImportOutcome {
    pub fn total(&self) -> u32 {
        self.added + self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_outcome_totals() {
        let outcome = ImportOutcome {
            added: 2,
            skipped: 3,
        };
        assert_eq!(outcome.total(), 5);
    }

    #[test]
    fn topic_row_serializes_dates_as_iso() {
        let row = TopicRow {
            id: 1,
            name: "Arrays".to_string(),
            order: 1,
            is_completed: false,
            expected_date: NaiveDate::from_ymd_opt(2026, 2, 14),
            completed_date: None,
            hours_allocated: Some(3),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["expected_date"], "2026-02-14");
        assert_eq!(json["completed_date"], serde_json::Value::Null);
    }
}
