//! Teacher-scoped operations. Ownership is part of every query or checked
//! before any write: a teacher can only see and mutate subjects they
//! teach, and the check failing is a `Forbidden`, not a `NotFound`,
//! because teachers legitimately know other subjects exist.

use chrono::Utc;
use common::{SubjectOverview, TeacherDashboard, TeacherSubjectRow};
use model::entities::{enrollment, prelude::*, subject, topic};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info, instrument};

use crate::convert::{subject_summary, topic_row};
use crate::error::{QueryError, Result};
use crate::progress;

/// Active subjects owned by the teacher, with aggregate progress and
/// enrollment counts.
#[instrument(skip(db))]
pub async fn subjects_taught(
    db: &DatabaseConnection,
    teacher_id: i32,
) -> Result<Vec<TeacherSubjectRow>> {
    let subjects = Subject::find()
        .filter(subject::Column::TeacherId.eq(teacher_id))
        .filter(subject::Column::IsActive.eq(true))
        .order_by_asc(subject::Column::Code)
        .all(db)
        .await?;

    let mut rows = Vec::with_capacity(subjects.len());
    for subject in subjects {
        let progress_percent = progress::subject_percent(db, subject.id).await?;
        let enrolled = Enrollment::find()
            .filter(enrollment::Column::SubjectId.eq(subject.id))
            .count(db)
            .await?;
        rows.push(TeacherSubjectRow {
            subject: subject_summary(&subject),
            enrolled,
            progress_percent,
        });
    }
    Ok(rows)
}

/// Landing-view aggregates for a teacher.
#[instrument(skip(db))]
pub async fn dashboard(db: &DatabaseConnection, teacher_id: i32) -> Result<TeacherDashboard> {
    let subjects = subjects_taught(db, teacher_id).await?;
    let percents: Vec<f64> = subjects.iter().map(|s| s.progress_percent).collect();
    let pending_updates = subjects
        .iter()
        .filter(|s| s.progress_percent < 100.0)
        .count() as u64;

    Ok(TeacherDashboard {
        total_assigned: subjects.len() as u64,
        avg_progress: progress::average_percent(&percents),
        pending_updates,
        subjects,
    })
}

/// Detail view of one owned subject: ordered topics plus aggregates.
#[instrument(skip(db))]
pub async fn subject_overview(
    db: &DatabaseConnection,
    teacher_id: i32,
    subject_id: i32,
) -> Result<SubjectOverview> {
    let subject = Subject::find_by_id(subject_id)
        .one(db)
        .await?
        .ok_or(QueryError::NotFound("subject"))?;
    if subject.teacher_id != teacher_id {
        return Err(QueryError::Forbidden(
            "subject is taught by another teacher".to_string(),
        ));
    }

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

/// Marks a topic as covered. Fails with `Forbidden` when the topic's
/// subject is taught by someone else; the topic is left untouched in that
/// case. The completion flag, completion date and the denormalized
/// enrollment progress all land in one transaction.
#[instrument(skip(db))]
pub async fn mark_topic_complete(
    db: &DatabaseConnection,
    teacher_id: i32,
    topic_id: i32,
) -> Result<common::TopicRow> {
    let txn = db.begin().await?;

    let topic = Topic::find_by_id(topic_id)
        .one(&txn)
        .await?
        .ok_or(QueryError::NotFound("topic"))?;
    let subject = Subject::find_by_id(topic.subject_id)
        .one(&txn)
        .await?
        .ok_or(QueryError::NotFound("subject"))?;
    if subject.teacher_id != teacher_id {
        return Err(QueryError::Forbidden(
            "topic belongs to another teacher's subject".to_string(),
        ));
    }

    if topic.is_completed {
        debug!(topic_id, "topic already covered, nothing to do");
        txn.commit().await?;
        return Ok(topic_row(&topic));
    }

    let subject_id = topic.subject_id;
    let mut active: topic::ActiveModel = topic.into();
    active.is_completed = Set(true);
    active.completed_date = Set(Some(Utc::now().date_naive()));
    let updated = active.update(&txn).await?;

    let percent = progress::sync_enrollment_progress(&txn, subject_id).await?;
    txn.commit().await?;

    info!(topic_id, subject_id, percent, "topic marked complete");
    Ok(topic_row(&updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seed_enrollment, seed_subject, seed_topic, seed_user, setup_db};
    use model::entities::user::Role;

    #[tokio::test]
    async fn mark_topic_complete_updates_topic_and_enrollment() {
        let db = setup_db().await.unwrap();
        let teacher = seed_user(&db, "Teacher", "t@example.edu", Role::Teacher, true)
            .await
            .unwrap();
        let student = seed_user(&db, "Student", "s@example.edu", Role::Student, true)
            .await
            .unwrap();
        let subject = seed_subject(&db, "Algorithms", "CS301", teacher.id)
            .await
            .unwrap();
        let t1 = seed_topic(&db, subject.id, "Sorting", 1, false).await.unwrap();
        seed_topic(&db, subject.id, "Graphs", 2, false).await.unwrap();
        seed_enrollment(&db, student.id, subject.id).await.unwrap();

        let row = mark_topic_complete(&db, teacher.id, t1.id).await.unwrap();
        assert!(row.is_completed);
        assert!(row.completed_date.is_some());

        // Denormalized enrollment progress follows: 1 of 2 topics
        let enrollment = Enrollment::find_by_id((student.id, subject.id))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(enrollment.progress, 50.0);
    }

    #[tokio::test]
    async fn marking_an_already_covered_topic_is_idempotent() {
        let db = setup_db().await.unwrap();
        let teacher = seed_user(&db, "Teacher", "t@example.edu", Role::Teacher, true)
            .await
            .unwrap();
        let subject = seed_subject(&db, "Algorithms", "CS301", teacher.id)
            .await
            .unwrap();
        let topic = seed_topic(&db, subject.id, "Sorting", 1, true).await.unwrap();

        let row = mark_topic_complete(&db, teacher.id, topic.id).await.unwrap();
        assert!(row.is_completed);
    }

    #[tokio::test]
    async fn foreign_topic_is_forbidden_and_unchanged() {
        let db = setup_db().await.unwrap();
        let owner = seed_user(&db, "Owner", "owner@example.edu", Role::Teacher, true)
            .await
            .unwrap();
        let other = seed_user(&db, "Other", "other@example.edu", Role::Teacher, true)
            .await
            .unwrap();
        let subject = seed_subject(&db, "Algorithms", "CS301", owner.id)
            .await
            .unwrap();
        let topic = seed_topic(&db, subject.id, "Sorting", 1, false).await.unwrap();

        let err = mark_topic_complete(&db, other.id, topic.id)
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::Forbidden(_)));

        let unchanged = Topic::find_by_id(topic.id).one(&db).await.unwrap().unwrap();
        assert!(!unchanged.is_completed);
        assert!(unchanged.completed_date.is_none());
    }

    #[tokio::test]
    async fn missing_topic_is_not_found() {
        let db = setup_db().await.unwrap();
        let teacher = seed_user(&db, "Teacher", "t@example.edu", Role::Teacher, true)
            .await
            .unwrap();

        let err = mark_topic_complete(&db, teacher.id, 4242).await.unwrap_err();
        assert!(matches!(err, QueryError::NotFound(_)));
    }

    #[tokio::test]
    async fn dashboard_counts_pending_subjects() {
        let db = setup_db().await.unwrap();
        let teacher = seed_user(&db, "Teacher", "t@example.edu", Role::Teacher, true)
            .await
            .unwrap();
        let done = seed_subject(&db, "Done", "CS100", teacher.id).await.unwrap();
        seed_topic(&db, done.id, "Only", 1, true).await.unwrap();
        let pending = seed_subject(&db, "Pending", "CS200", teacher.id)
            .await
            .unwrap();
        seed_topic(&db, pending.id, "First", 1, false).await.unwrap();

        let dashboard = dashboard(&db, teacher.id).await.unwrap();
        assert_eq!(dashboard.total_assigned, 2);
        assert_eq!(dashboard.pending_updates, 1);
        assert_eq!(dashboard.avg_progress, 50.0);
    }
}
