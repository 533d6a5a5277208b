//! Head-of-department aggregates, scoped to the caller's department tag.
//! Pure reads; the department is resolved from the HOD's own profile so
//! a head can never aggregate someone else's department.

use std::collections::BTreeSet;

use common::{DepartmentOverview, FacultyRow};
use model::entities::user::Role;
use model::entities::{department, enrollment, prelude::*, subject, topic, user};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use tracing::instrument;

use crate::error::Result;

/// Aggregate view of the department identified by `department_code`:
/// faculty, subjects taught by them, distinct enrolled students, and an
/// average progress computed over all department topics (sum of completed
/// over sum of total, not a mean of per-subject percentages).
#[instrument(skip(db))]
pub async fn department_overview(
    db: &DatabaseConnection,
    department_code: &str,
) -> Result<DepartmentOverview> {
    let department = Department::find()
        .filter(department::Column::Code.eq(department_code))
        .one(db)
        .await?;

    let faculty = User::find()
        .filter(user::Column::Department.eq(department_code))
        .filter(user::Column::Role.eq(Role::Teacher))
        .filter(user::Column::IsActive.eq(true))
        .all(db)
        .await?;
    let teacher_ids: Vec<i32> = faculty.iter().map(|t| t.id).collect();

    let subjects = if teacher_ids.is_empty() {
        Vec::new()
    } else {
        Subject::find()
            .filter(subject::Column::TeacherId.is_in(teacher_ids.clone()))
            .filter(subject::Column::IsActive.eq(true))
            .all(db)
            .await?
    };
    let subject_ids: Vec<i32> = subjects.iter().map(|s| s.id).collect();

    let (student_count, avg_progress) = if subject_ids.is_empty() {
        (0, 0.0)
    } else {
        let enrollments = Enrollment::find()
            .filter(enrollment::Column::SubjectId.is_in(subject_ids.clone()))
            .all(db)
            .await?;
        let students: BTreeSet<i32> = enrollments.iter().map(|e| e.student_id).collect();

        let total_topics = Topic::find()
            .filter(topic::Column::SubjectId.is_in(subject_ids.clone()))
            .count(db)
            .await?;
        let completed_topics = Topic::find()
            .filter(topic::Column::SubjectId.is_in(subject_ids.clone()))
            .filter(topic::Column::IsCompleted.eq(true))
            .count(db)
            .await?;
        let avg = if total_topics == 0 {
            0.0
        } else {
            (completed_topics as f64 / total_topics as f64 * 1000.0).round() / 10.0
        };
        (students.len() as u64, avg)
    };

    let mut faculty_rows = Vec::with_capacity(faculty.len());
    for teacher in &faculty {
        let own_subjects: Vec<i32> = subjects
            .iter()
            .filter(|s| s.teacher_id == teacher.id)
            .map(|s| s.id)
            .collect();
        let teacher_students = if own_subjects.is_empty() {
            0
        } else {
            let enrollments = Enrollment::find()
                .filter(enrollment::Column::SubjectId.is_in(own_subjects.clone()))
                .all(db)
                .await?;
            enrollments
                .iter()
                .map(|e| e.student_id)
                .collect::<BTreeSet<i32>>()
                .len() as u64
        };
        faculty_rows.push(FacultyRow {
            teacher_id: teacher.id,
            teacher_name: teacher.name.clone(),
            subject_count: own_subjects.len() as u64,
            student_count: teacher_students,
        });
    }

    Ok(DepartmentOverview {
        department_code: department_code.to_string(),
        department_name: department.map(|d| d.name),
        faculty_count: faculty.len() as u64,
        subject_count: subjects.len() as u64,
        student_count,
        avg_progress,
        faculty: faculty_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seed_enrollment, seed_subject, seed_topic, seed_user, setup_db};

    #[tokio::test]
    async fn overview_aggregates_across_department_subjects() {
        let db = setup_db().await.unwrap();

        // Two CSE teachers (seed_user tags everyone "CSE"), one subject each
        let t1 = seed_user(&db, "T1", "t1@example.edu", Role::Teacher, true)
            .await
            .unwrap();
        let t2 = seed_user(&db, "T2", "t2@example.edu", Role::Teacher, true)
            .await
            .unwrap();
        let s1 = seed_subject(&db, "Algorithms", "CS301", t1.id).await.unwrap();
        let s2 = seed_subject(&db, "Networks", "CS320", t2.id).await.unwrap();

        // 4 topics total, 1 complete -> 25.0
        seed_topic(&db, s1.id, "A", 1, true).await.unwrap();
        seed_topic(&db, s1.id, "B", 2, false).await.unwrap();
        seed_topic(&db, s2.id, "C", 1, false).await.unwrap();
        seed_topic(&db, s2.id, "D", 2, false).await.unwrap();

        // One student in both subjects: counted once department-wide
        let student = seed_user(&db, "S", "s@example.edu", Role::Student, true)
            .await
            .unwrap();
        seed_enrollment(&db, student.id, s1.id).await.unwrap();
        seed_enrollment(&db, student.id, s2.id).await.unwrap();

        let overview = department_overview(&db, "CSE").await.unwrap();
        assert_eq!(overview.faculty_count, 2);
        assert_eq!(overview.subject_count, 2);
        assert_eq!(overview.student_count, 1);
        assert_eq!(overview.avg_progress, 25.0);

        let row = overview
            .faculty
            .iter()
            .find(|f| f.teacher_id == t1.id)
            .unwrap();
        assert_eq!(row.subject_count, 1);
        assert_eq!(row.student_count, 1);
    }

    #[tokio::test]
    async fn empty_department_reports_zeroes() {
        let db = setup_db().await.unwrap();
        let overview = department_overview(&db, "EEE").await.unwrap();
        assert_eq!(overview.faculty_count, 0);
        assert_eq!(overview.subject_count, 0);
        assert_eq!(overview.student_count, 0);
        assert_eq!(overview.avg_progress, 0.0);
        assert!(overview.faculty.is_empty());
        assert!(overview.department_name.is_none());
    }
}
