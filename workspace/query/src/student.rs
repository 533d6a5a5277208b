//! Student-scoped reads. A student sees a subject only through an
//! enrollment row; anything else answers `NotFound` rather than
//! `Forbidden` so the API never confirms the existence of subjects the
//! caller is not enrolled in.

use common::{StudentDashboard, StudentSubjectRow, SubjectOverview};
use model::entities::{enrollment, prelude::*, topic};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use tracing::instrument;

use crate::convert::{subject_summary, topic_row};
use crate::error::{QueryError, Result};
use crate::progress;

/// Subjects the student is enrolled in, with teacher name and progress.
#[instrument(skip(db))]
pub async fn enrolled_subjects(
    db: &DatabaseConnection,
    student_id: i32,
) -> Result<Vec<StudentSubjectRow>> {
    let enrollments = Enrollment::find()
        .filter(enrollment::Column::StudentId.eq(student_id))
        .find_also_related(Subject)
        .all(db)
        .await?;

    let mut rows = Vec::with_capacity(enrollments.len());
    for (enrollment, subject) in enrollments {
        // The FK guarantees the subject; a missing row would mean a
        // concurrent hard delete, which we simply skip.
        let Some(subject) = subject else { continue };
        if !subject.is_active {
            continue;
        }
        let teacher = User::find_by_id(subject.teacher_id).one(db).await?;
        let progress_percent = progress::subject_percent(db, subject.id).await?;
        rows.push(StudentSubjectRow {
            subject: subject_summary(&subject),
            teacher_name: teacher.map(|t| t.name).unwrap_or_else(|| "Unknown".to_string()),
            status: enrollment.status.as_str().to_string(),
            progress_percent,
        });
    }
    Ok(rows)
}

/// Landing view for a student: enrolled subjects plus average progress.
#[instrument(skip(db))]
pub async fn dashboard(db: &DatabaseConnection, student_id: i32) -> Result<StudentDashboard> {
    let subjects = enrolled_subjects(db, student_id).await?;
    let percents: Vec<f64> = subjects.iter().map(|s| s.progress_percent).collect();
    Ok(StudentDashboard {
        average_progress: progress::average_percent(&percents),
        subjects,
    })
}

/// Detail view of one enrolled subject. `NotFound` both when the subject
/// does not exist and when the student simply is not enrolled.
#[instrument(skip(db))]
pub async fn subject_detail(
    db: &DatabaseConnection,
    student_id: i32,
    subject_id: i32,
) -> Result<SubjectOverview> {
    let enrollment = Enrollment::find_by_id((student_id, subject_id))
        .one(db)
        .await?;
    if enrollment.is_none() {
        return Err(QueryError::NotFound("subject"));
    }

    let subject = Subject::find_by_id(subject_id)
        .one(db)
        .await?
        .ok_or(QueryError::NotFound("subject"))?;

    let topics = Topic::find()
        .filter(topic::Column::SubjectId.eq(subject.id))
        .order_by_asc(topic::Column::Order)
        .all(db)
        .await?;
    let enrolled = Enrollment::find()
        .filter(enrollment::Column::SubjectId.eq(subject.id))
        .count(db)
        .await?;

    Ok(SubjectOverview {
        progress_percent: progress::percent_complete(&topics),
        topics: topics.iter().map(topic_row).collect(),
        subject: subject_summary(&subject),
        enrolled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seed_enrollment, seed_subject, seed_topic, seed_user, setup_db};
    use model::entities::user::Role;

    #[tokio::test]
    async fn unenrolled_subject_reads_as_not_found() {
        let db = setup_db().await.unwrap();
        let teacher = seed_user(&db, "Teacher", "t@example.edu", Role::Teacher, true)
            .await
            .unwrap();
        let student = seed_user(&db, "Student", "s@example.edu", Role::Student, true)
            .await
            .unwrap();
        let subject = seed_subject(&db, "Databases", "CS305", teacher.id)
            .await
            .unwrap();

        // Subject exists but there is no enrollment: NotFound, not Forbidden
        let err = subject_detail(&db, student.id, subject.id)
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::NotFound(_)));

        // Nonexistent subject answers identically
        let err = subject_detail(&db, student.id, 4242).await.unwrap_err();
        assert!(matches!(err, QueryError::NotFound(_)));
    }

    #[tokio::test]
    async fn enrolled_subject_returns_topics_and_progress() {
        let db = setup_db().await.unwrap();
        let teacher = seed_user(&db, "Teacher", "t@example.edu", Role::Teacher, true)
            .await
            .unwrap();
        let student = seed_user(&db, "Student", "s@example.edu", Role::Student, true)
            .await
            .unwrap();
        let subject = seed_subject(&db, "Databases", "CS305", teacher.id)
            .await
            .unwrap();
        seed_topic(&db, subject.id, "Relational model", 1, true)
            .await
            .unwrap();
        seed_topic(&db, subject.id, "SQL", 2, false).await.unwrap();
        seed_enrollment(&db, student.id, subject.id).await.unwrap();

        let detail = subject_detail(&db, student.id, subject.id).await.unwrap();
        assert_eq!(detail.topics.len(), 2);
        assert_eq!(detail.topics[0].order, 1);
        assert_eq!(detail.progress_percent, 50.0);
        assert_eq!(detail.enrolled, 1);
    }

    #[tokio::test]
    async fn dashboard_averages_across_enrollments() {
        let db = setup_db().await.unwrap();
        let teacher = seed_user(&db, "Teacher", "t@example.edu", Role::Teacher, true)
            .await
            .unwrap();
        let student = seed_user(&db, "Student", "s@example.edu", Role::Student, true)
            .await
            .unwrap();

        let full = seed_subject(&db, "Full", "CS100", teacher.id).await.unwrap();
        seed_topic(&db, full.id, "Only", 1, true).await.unwrap();
        let empty = seed_subject(&db, "Empty", "CS101", teacher.id)
            .await
            .unwrap();
        seed_topic(&db, empty.id, "Only", 1, false).await.unwrap();

        seed_enrollment(&db, student.id, full.id).await.unwrap();
        seed_enrollment(&db, student.id, empty.id).await.unwrap();

        let dashboard = dashboard(&db, student.id).await.unwrap();
        assert_eq!(dashboard.subjects.len(), 2);
        assert_eq!(dashboard.average_progress, 50.0);
    }
}
