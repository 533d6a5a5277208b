use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::progress::{StudentSubjectRow, TeacherSubjectRow};

/// Landing view for a student: enrolled subjects plus the running average.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct StudentDashboard {
    pub subjects: Vec<StudentSubjectRow>,
    pub average_progress: f64,
}

/// Landing view for a teacher.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TeacherDashboard {
    pub total_assigned: u64,
    pub avg_progress: f64,
    /// Subjects that still have at least one uncovered topic.
    pub pending_updates: u64,
    pub subjects: Vec<TeacherSubjectRow>,
}

/// Per-teacher aggregate inside a department overview.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct FacultyRow {
    pub teacher_id: i32,
    pub teacher_name: String,
    pub subject_count: u64,
    pub student_count: u64,
}

/// Aggregate view of one department for its head.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct DepartmentOverview {
    pub department_code: String,
    pub department_name: Option<String>,
    pub faculty_count: u64,
    pub subject_count: u64,
    /// Distinct students enrolled in at least one department subject.
    pub student_count: u64,
    /// Completed topics over total topics across all department subjects.
    pub avg_progress: f64,
    pub faculty: Vec<FacultyRow>,
}

/// Cross-department totals for the coordinator landing view.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct CoordinatorOverview {
    pub total_users: u64,
    pub active_subjects: u64,
    /// Active teachers with no active subject assigned.
    pub unassigned_teachers: u64,
}
