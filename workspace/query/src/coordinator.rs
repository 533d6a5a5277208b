//! Coordinator-scoped CRUD over subjects, topics, enrollments and users.
//! No ownership restriction applies beyond role membership (checked at
//! the boundary via `guard::require_role`), but every input is validated
//! here and every multi-row mutation is transactional.

use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};
use common::{CoordinatorOverview, EnrollmentRow, ImportOutcome, SubjectAdminRow, TopicRow};
use model::entities::user::Role;
use model::entities::{enrollment, prelude::*, subject, topic, user};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info, instrument, warn};

use crate::convert::topic_row;
use crate::error::{QueryError, Result};
use crate::progress;

/// Input for creating a subject.
#[derive(Debug, Clone)]
pub struct NewSubject {
    pub name: String,
    pub code: String,
    pub teacher_id: i32,
    pub credits: Option<i32>,
}

/// Input for creating a user on behalf of someone else.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department: Option<String>,
    /// Already-hashed credential; hashing stays outside the query layer.
    pub password_hash: String,
}

/// Patch for a subject; absent fields stay untouched.
#[derive(Debug, Clone, Default)]
pub struct SubjectChanges {
    pub name: Option<String>,
    pub code: Option<String>,
    pub teacher_id: Option<i32>,
    pub credits: Option<i32>,
    pub is_active: Option<bool>,
}

/// Patch for a topic. `expected_date` uses the outer Option for "field
/// present in the request" and the inner for "set vs clear".
#[derive(Debug, Clone, Default)]
pub struct TopicChanges {
    pub name: Option<String>,
    pub expected_date: Option<Option<NaiveDate>>,
}

#[instrument(skip(db))]
pub async fn list_subjects(db: &DatabaseConnection) -> Result<Vec<SubjectAdminRow>> {
    let subjects = Subject::find()
        .find_also_related(User)
        .order_by_asc(subject::Column::Code)
        .all(db)
        .await?;

    Ok(subjects
        .into_iter()
        .map(|(subject, teacher)| SubjectAdminRow {
            id: subject.id,
            name: subject.name,
            code: subject.code,
            teacher_id: subject.teacher_id,
            teacher_name: teacher.map(|t| t.name),
            is_active: subject.is_active,
        })
        .collect())
}

#[instrument(skip(db))]
pub async fn create_subject(db: &DatabaseConnection, input: NewSubject) -> Result<subject::Model> {
    let name = input.name.trim();
    let code = input.code.trim();
    if name.is_empty() || code.is_empty() {
        return Err(QueryError::Validation(
            "name and code are required".to_string(),
        ));
    }

    let teacher = User::find_by_id(input.teacher_id).one(db).await?;
    let valid_teacher = teacher
        .map(|t| t.role == Role::Teacher && t.is_active)
        .unwrap_or(false);
    if !valid_teacher {
        return Err(QueryError::Validation(
            "teacher_id must reference an active teacher".to_string(),
        ));
    }

    let subject = subject::ActiveModel {
        name: Set(name.to_string()),
        code: Set(Some(code.to_string())),
        description: Set(None),
        teacher_id: Set(input.teacher_id),
        course_id: Set(None),
        semester: Set(None),
        credits: Set(input.credits),
        academic_year_id: Set(None),
        total_hours: Set(None),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(subject_id = subject.id, "subject created");
    Ok(subject)
}

#[instrument(skip(db))]
pub async fn update_subject(
    db: &DatabaseConnection,
    subject_id: i32,
    changes: SubjectChanges,
) -> Result<subject::Model> {
    let subject = Subject::find_by_id(subject_id)
        .one(db)
        .await?
        .ok_or(QueryError::NotFound("subject"))?;

    let mut active: subject::ActiveModel = subject.into();
    if let Some(name) = changes.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(QueryError::Validation("name cannot be empty".to_string()));
        }
        active.name = Set(name);
    }
    if let Some(code) = changes.code {
        let code = code.trim().to_string();
        if code.is_empty() {
            return Err(QueryError::Validation("code cannot be empty".to_string()));
        }
        active.code = Set(Some(code));
    }
    if let Some(teacher_id) = changes.teacher_id {
        let teacher = User::find_by_id(teacher_id).one(db).await?;
        let valid_teacher = teacher
            .map(|t| t.role == Role::Teacher && t.is_active)
            .unwrap_or(false);
        if !valid_teacher {
            return Err(QueryError::Validation(
                "teacher_id must reference an active teacher".to_string(),
            ));
        }
        active.teacher_id = Set(teacher_id);
    }
    if let Some(credits) = changes.credits {
        active.credits = Set(Some(credits));
    }
    if let Some(is_active) = changes.is_active {
        active.is_active = Set(is_active);
    }

    Ok(active.update(db).await?)
}

/// Soft delete: the subject stays for history but leaves all listings.
#[instrument(skip(db))]
pub async fn deactivate_subject(db: &DatabaseConnection, subject_id: i32) -> Result<()> {
    let subject = Subject::find_by_id(subject_id)
        .one(db)
        .await?
        .ok_or(QueryError::NotFound("subject"))?;

    let mut active: subject::ActiveModel = subject.into();
    active.is_active = Set(false);
    active.update(db).await?;
    Ok(())
}

/// Ordered topics of a subject.
#[instrument(skip(db))]
pub async fn list_topics(db: &DatabaseConnection, subject_id: i32) -> Result<Vec<TopicRow>> {
    Subject::find_by_id(subject_id)
        .one(db)
        .await?
        .ok_or(QueryError::NotFound("subject"))?;

    let topics = Topic::find()
        .filter(topic::Column::SubjectId.eq(subject_id))
        .order_by_asc(topic::Column::Order)
        .all(db)
        .await?;
    Ok(topics.iter().map(topic_row).collect())
}

/// Appends a topic at the end of the subject's ordering.
#[instrument(skip(db))]
pub async fn add_topic(
    db: &DatabaseConnection,
    subject_id: i32,
    name: &str,
    expected_date: Option<NaiveDate>,
) -> Result<TopicRow> {
    let name = name.trim();
    if name.is_empty() {
        return Err(QueryError::Validation("topic name is required".to_string()));
    }

    let txn = db.begin().await?;
    Subject::find_by_id(subject_id)
        .one(&txn)
        .await?
        .ok_or(QueryError::NotFound("subject"))?;

    let last = Topic::find()
        .filter(topic::Column::SubjectId.eq(subject_id))
        .order_by_desc(topic::Column::Order)
        .one(&txn)
        .await?;
    let next_order = last.map(|t| t.order + 1).unwrap_or(1);

    let topic = topic::ActiveModel {
        subject_id: Set(subject_id),
        name: Set(name.to_string()),
        description: Set(None),
        order: Set(next_order),
        hours_allocated: Set(None),
        expected_date: Set(expected_date),
        completed_date: Set(None),
        is_completed: Set(false),
        completion_notes: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    debug!(topic_id = topic.id, order = topic.order, "topic appended");
    Ok(topic_row(&topic))
}

#[instrument(skip(db))]
pub async fn update_topic(
    db: &DatabaseConnection,
    topic_id: i32,
    changes: TopicChanges,
) -> Result<TopicRow> {
    let topic = Topic::find_by_id(topic_id)
        .one(db)
        .await?
        .ok_or(QueryError::NotFound("topic"))?;

    let mut active: topic::ActiveModel = topic.into();
    if let Some(name) = changes.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(QueryError::Validation("name cannot be empty".to_string()));
        }
        active.name = Set(name);
    }
    if let Some(expected_date) = changes.expected_date {
        active.expected_date = Set(expected_date);
    }

    let updated = active.update(db).await?;
    Ok(topic_row(&updated))
}

/// Deletes a topic and shifts every following topic down one position,
/// keeping the subject's order values a permutation of 1..N.
#[instrument(skip(db))]
pub async fn delete_topic(db: &DatabaseConnection, topic_id: i32) -> Result<()> {
    let txn = db.begin().await?;

    let topic = Topic::find_by_id(topic_id)
        .one(&txn)
        .await?
        .ok_or(QueryError::NotFound("topic"))?;
    let subject_id = topic.subject_id;
    let removed_order = topic.order;

    Topic::delete_by_id(topic.id).exec(&txn).await?;
    Topic::update_many()
        .col_expr(
            topic::Column::Order,
            Expr::col(topic::Column::Order).sub(1),
        )
        .filter(topic::Column::SubjectId.eq(subject_id))
        .filter(topic::Column::Order.gt(removed_order))
        .exec(&txn)
        .await?;

    progress::sync_enrollment_progress(&txn, subject_id).await?;
    txn.commit().await?;
    Ok(())
}

/// Replaces the subject's topic ordering with an explicit full ordering.
///
/// The supplied ids must be exactly the subject's current topic ids (no
/// duplicates, nothing missing, nothing extra); otherwise the call fails
/// with `InvalidOrder` and existing order values stay untouched. On
/// success each topic's `order` becomes its 1-based position in the list,
/// all inside one transaction.
#[instrument(skip(db))]
pub async fn reorder_topics(
    db: &DatabaseConnection,
    subject_id: i32,
    ordered_ids: &[i32],
) -> Result<()> {
    let txn = db.begin().await?;

    Subject::find_by_id(subject_id)
        .one(&txn)
        .await?
        .ok_or(QueryError::NotFound("subject"))?;

    let existing = Topic::find()
        .filter(topic::Column::SubjectId.eq(subject_id))
        .all(&txn)
        .await?;
    let existing_ids: BTreeSet<i32> = existing.iter().map(|t| t.id).collect();
    let supplied_ids: BTreeSet<i32> = ordered_ids.iter().copied().collect();

    if supplied_ids != existing_ids || ordered_ids.len() != existing.len() {
        return Err(QueryError::InvalidOrder(
            "supplied ids must match the subject's topic ids exactly".to_string(),
        ));
    }

    for (position, topic_id) in ordered_ids.iter().enumerate() {
        Topic::update_many()
            .col_expr(topic::Column::Order, Expr::value(position as i32 + 1))
            .filter(topic::Column::Id.eq(*topic_id))
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;
    info!(subject_id, count = ordered_ids.len(), "topics reordered");
    Ok(())
}

/// Enrollments of a subject joined with their students, ordered by name.
#[instrument(skip(db))]
pub async fn list_enrollments(
    db: &DatabaseConnection,
    subject_id: i32,
) -> Result<Vec<EnrollmentRow>> {
    Subject::find_by_id(subject_id)
        .one(db)
        .await?
        .ok_or(QueryError::NotFound("subject"))?;

    let rows = Enrollment::find()
        .filter(enrollment::Column::SubjectId.eq(subject_id))
        .find_also_related(User)
        .all(db)
        .await?;

    let mut listing: Vec<EnrollmentRow> = rows
        .into_iter()
        .filter_map(|(enrollment, student)| {
            student.map(|s| EnrollmentRow {
                student_id: s.id,
                name: s.name,
                email: s.email,
                status: enrollment.status.as_str().to_string(),
                progress: enrollment.progress,
                enrolled_at: enrollment.enrolled_at,
            })
        })
        .collect();
    listing.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(listing)
}

/// Enrolls a single student by email. `NotFound` when no active student
/// carries the email, `Conflict` when the enrollment already exists.
#[instrument(skip(db))]
pub async fn add_enrollment(
    db: &DatabaseConnection,
    subject_id: i32,
    email: &str,
) -> Result<EnrollmentRow> {
    Subject::find_by_id(subject_id)
        .one(db)
        .await?
        .ok_or(QueryError::NotFound("subject"))?;

    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(QueryError::Validation("email is required".to_string()));
    }

    let student = User::find()
        .filter(user::Column::Email.eq(email.clone()))
        .filter(user::Column::IsActive.eq(true))
        .one(db)
        .await?
        .filter(|u| u.role == Role::Student)
        .ok_or(QueryError::NotFound("student"))?;

    let existing = Enrollment::find_by_id((student.id, subject_id))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(QueryError::Conflict(format!(
            "{email} is already enrolled"
        )));
    }

    let enrollment = enrollment::ActiveModel {
        student_id: Set(student.id),
        subject_id: Set(subject_id),
        enrolled_at: Set(Utc::now()),
        status: Set(enrollment::EnrollmentStatus::Active),
        progress: Set(0.0),
    }
    .insert(db)
    .await?;

    Ok(EnrollmentRow {
        student_id: student.id,
        name: student.name,
        email: student.email,
        status: enrollment.status.as_str().to_string(),
        progress: enrollment.progress,
        enrolled_at: enrollment.enrolled_at,
    })
}

#[instrument(skip(db))]
pub async fn remove_enrollment(
    db: &DatabaseConnection,
    subject_id: i32,
    student_id: i32,
) -> Result<()> {
    let result = Enrollment::delete_by_id((student_id, subject_id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(QueryError::NotFound("enrollment"));
    }
    Ok(())
}

/// Bulk enrollment. Each candidate either becomes an enrollment (active
/// student, not yet enrolled) or bumps the skip counter; a bad row never
/// aborts the batch. The whole import commits as one transaction.
#[instrument(skip(db, emails), fields(candidates = emails.len()))]
pub async fn import_enrollments(
    db: &DatabaseConnection,
    subject_id: i32,
    emails: &[String],
) -> Result<ImportOutcome> {
    let txn = db.begin().await?;

    Subject::find_by_id(subject_id)
        .one(&txn)
        .await?
        .ok_or(QueryError::NotFound("subject"))?;

    let mut outcome = ImportOutcome::default();
    for raw in emails {
        let email = raw.trim().to_lowercase();
        if email.is_empty() {
            continue;
        }

        let student = User::find()
            .filter(user::Column::Email.eq(email.clone()))
            .filter(user::Column::IsActive.eq(true))
            .one(&txn)
            .await?
            .filter(|u| u.role == Role::Student);
        let Some(student) = student else {
            debug!(%email, "skipped: no active student with this email");
            outcome.skipped += 1;
            continue;
        };

        let exists = Enrollment::find_by_id((student.id, subject_id))
            .one(&txn)
            .await?
            .is_some();
        if exists {
            debug!(%email, "skipped: already enrolled");
            outcome.skipped += 1;
            continue;
        }

        enrollment::ActiveModel {
            student_id: Set(student.id),
            subject_id: Set(subject_id),
            enrolled_at: Set(Utc::now()),
            status: Set(enrollment::EnrollmentStatus::Active),
            progress: Set(0.0),
        }
        .insert(&txn)
        .await?;
        outcome.added += 1;
    }

    txn.commit().await?;
    info!(
        subject_id,
        added = outcome.added,
        skipped = outcome.skipped,
        "enrollment import finished"
    );
    Ok(outcome)
}

#[instrument(skip(db))]
pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    Ok(User::find()
        .order_by_asc(user::Column::Name)
        .all(db)
        .await?)
}

/// Creates a user with any role. `Conflict` on a duplicate email.
#[instrument(skip(db, input), fields(email = %input.email, role = input.role.as_str()))]
pub async fn create_user(db: &DatabaseConnection, input: NewUser) -> Result<user::Model> {
    let name = input.name.trim();
    let email = input.email.trim().to_lowercase();
    if name.is_empty() || email.is_empty() {
        return Err(QueryError::Validation(
            "name and email are required".to_string(),
        ));
    }

    let existing = User::find()
        .filter(user::Column::Email.eq(email.clone()))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(QueryError::Conflict(format!(
            "email {email} is already registered"
        )));
    }

    let created = user::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email),
        password_hash: Set(input.password_hash),
        role: Set(input.role),
        department: Set(input.department),
        phone: Set(None),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(user_id = created.id, "user created");
    Ok(created)
}

/// Cross-department totals for the coordinator landing view.
#[instrument(skip(db))]
pub async fn overview(db: &DatabaseConnection) -> Result<CoordinatorOverview> {
    let total_users = User::find()
        .filter(user::Column::IsActive.eq(true))
        .count(db)
        .await?;
    let active_subjects = Subject::find()
        .filter(subject::Column::IsActive.eq(true))
        .count(db)
        .await?;

    let teachers = User::find()
        .filter(user::Column::Role.eq(Role::Teacher))
        .filter(user::Column::IsActive.eq(true))
        .all(db)
        .await?;
    let assigned: BTreeSet<i32> = Subject::find()
        .filter(subject::Column::IsActive.eq(true))
        .all(db)
        .await?
        .into_iter()
        .map(|s| s.teacher_id)
        .collect();
    let unassigned_teachers = teachers
        .iter()
        .filter(|t| !assigned.contains(&t.id))
        .count() as u64;

    Ok(CoordinatorOverview {
        total_users,
        active_subjects,
        unassigned_teachers,
    })
}

/// Best-effort audit trail append; failures are logged, never propagated.
pub async fn record_activity<C: ConnectionTrait>(
    db: &C,
    user_id: Option<i32>,
    action: &str,
    detail: Option<String>,
) {
    let entry = model::entities::activity_log::ActiveModel {
        user_id: Set(user_id),
        action: Set(action.to_string()),
        detail: Set(detail),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    if let Err(err) = entry.insert(db).await {
        warn!(action, %err, "failed to record activity log entry");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seed_enrollment, seed_subject, seed_topic, seed_user, setup_db};

    async fn seed_subject_with_topics(
        db: &DatabaseConnection,
        teacher_id: i32,
        completed: &[bool],
    ) -> (subject::Model, Vec<topic::Model>) {
        let subject = seed_subject(db, "Operating Systems", "CS310", teacher_id)
            .await
            .unwrap();
        let mut topics = Vec::new();
        for (idx, done) in completed.iter().enumerate() {
            let topic = seed_topic(
                db,
                subject.id,
                &format!("Unit {}", idx + 1),
                idx as i32 + 1,
                *done,
            )
            .await
            .unwrap();
            topics.push(topic);
        }
        (subject, topics)
    }

    #[tokio::test]
    async fn reorder_applies_one_based_positions() {
        let db = setup_db().await.unwrap();
        let teacher = seed_user(&db, "T", "t@example.edu", Role::Teacher, true)
            .await
            .unwrap();
        let (subject, topics) =
            seed_subject_with_topics(&db, teacher.id, &[false, false, false]).await;

        let reversed: Vec<i32> = topics.iter().rev().map(|t| t.id).collect();
        reorder_topics(&db, subject.id, &reversed).await.unwrap();

        let rows = list_topics(&db, subject.id).await.unwrap();
        assert_eq!(rows.len(), 3);
        // First listed topic is the formerly-last one, now at order 1
        assert_eq!(rows[0].id, topics[2].id);
        assert_eq!(rows[0].order, 1);
        assert_eq!(rows[2].id, topics[0].id);
        assert_eq!(rows[2].order, 3);
    }

    #[tokio::test]
    async fn reorder_rejects_mismatched_id_sets() {
        let db = setup_db().await.unwrap();
        let teacher = seed_user(&db, "T", "t@example.edu", Role::Teacher, true)
            .await
            .unwrap();
        let (subject, topics) =
            seed_subject_with_topics(&db, teacher.id, &[false, false]).await;
        let ids: Vec<i32> = topics.iter().map(|t| t.id).collect();

        // Subset
        let err = reorder_topics(&db, subject.id, &ids[..1]).await.unwrap_err();
        assert!(matches!(err, QueryError::InvalidOrder(_)));

        // Superset
        let mut superset = ids.clone();
        superset.push(9999);
        let err = reorder_topics(&db, subject.id, &superset)
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidOrder(_)));

        // Disjoint
        let err = reorder_topics(&db, subject.id, &[8888, 9999])
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidOrder(_)));

        // Duplicates hiding a missing id
        let err = reorder_topics(&db, subject.id, &[ids[0], ids[0]])
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidOrder(_)));

        // Existing orders unchanged after all the failures
        let rows = list_topics(&db, subject.id).await.unwrap();
        assert_eq!(rows[0].id, topics[0].id);
        assert_eq!(rows[0].order, 1);
        assert_eq!(rows[1].id, topics[1].id);
        assert_eq!(rows[1].order, 2);
    }

    #[tokio::test]
    async fn delete_topic_repacks_following_orders() {
        let db = setup_db().await.unwrap();
        let teacher = seed_user(&db, "T", "t@example.edu", Role::Teacher, true)
            .await
            .unwrap();
        let (subject, topics) =
            seed_subject_with_topics(&db, teacher.id, &[false, false, false]).await;

        delete_topic(&db, topics[0].id).await.unwrap();

        let rows = list_topics(&db, subject.id).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, topics[1].id);
        assert_eq!(rows[0].order, 1);
        assert_eq!(rows[1].id, topics[2].id);
        assert_eq!(rows[1].order, 2);
    }

    #[tokio::test]
    async fn add_topic_appends_after_existing_orders() {
        let db = setup_db().await.unwrap();
        let teacher = seed_user(&db, "T", "t@example.edu", Role::Teacher, true)
            .await
            .unwrap();
        let (subject, _) = seed_subject_with_topics(&db, teacher.id, &[false, false]).await;

        let row = add_topic(&db, subject.id, "Scheduling", None).await.unwrap();
        assert_eq!(row.order, 3);

        let err = add_topic(&db, subject.id, "   ", None).await.unwrap_err();
        assert!(matches!(err, QueryError::Validation(_)));
    }

    #[tokio::test]
    async fn import_counts_added_and_skipped() {
        let db = setup_db().await.unwrap();
        let teacher = seed_user(&db, "T", "t@example.edu", Role::Teacher, true)
            .await
            .unwrap();
        let (subject, _) = seed_subject_with_topics(&db, teacher.id, &[false]).await;

        seed_user(&db, "Valid", "valid_student@x.com", Role::Student, true)
            .await
            .unwrap();
        seed_user(&db, "NotAStudent", "not_a_student@x.com", Role::Teacher, true)
            .await
            .unwrap();
        let enrolled = seed_user(
            &db,
            "Enrolled",
            "already_enrolled@x.com",
            Role::Student,
            true,
        )
        .await
        .unwrap();
        seed_user(&db, "Valid2", "valid_student2@x.com", Role::Student, true)
            .await
            .unwrap();
        seed_enrollment(&db, enrolled.id, subject.id).await.unwrap();

        let emails: Vec<String> = [
            "valid_student@x.com",
            "not_a_student@x.com",
            "already_enrolled@x.com",
            "valid_student2@x.com",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let outcome = import_enrollments(&db, subject.id, &emails).await.unwrap();
        assert_eq!(outcome.added, 2);
        assert_eq!(outcome.skipped, 2);

        // Exactly two new rows on top of the seeded one
        let count = Enrollment::find()
            .filter(enrollment::Column::SubjectId.eq(subject.id))
            .count(&db)
            .await
            .unwrap();
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn add_enrollment_distinguishes_missing_and_duplicate() {
        let db = setup_db().await.unwrap();
        let teacher = seed_user(&db, "T", "t@example.edu", Role::Teacher, true)
            .await
            .unwrap();
        let (subject, _) = seed_subject_with_topics(&db, teacher.id, &[false]).await;
        seed_user(&db, "S", "s@example.edu", Role::Student, true)
            .await
            .unwrap();

        let err = add_enrollment(&db, subject.id, "ghost@example.edu")
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::NotFound(_)));

        add_enrollment(&db, subject.id, "s@example.edu").await.unwrap();
        let err = add_enrollment(&db, subject.id, "s@example.edu")
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::Conflict(_)));
    }

    #[tokio::test]
    async fn create_user_rejects_duplicate_email() {
        let db = setup_db().await.unwrap();
        seed_user(&db, "Existing", "dup@example.edu", Role::Student, true)
            .await
            .unwrap();

        let err = create_user(
            &db,
            NewUser {
                name: "Again".to_string(),
                email: "DUP@example.edu".to_string(),
                role: Role::Student,
                department: None,
                password_hash: "$argon2id$test".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, QueryError::Conflict(_)));
    }

    #[tokio::test]
    async fn create_subject_requires_an_active_teacher() {
        let db = setup_db().await.unwrap();
        let student = seed_user(&db, "S", "s@example.edu", Role::Student, true)
            .await
            .unwrap();

        let err = create_subject(
            &db,
            NewSubject {
                name: "Networks".to_string(),
                code: "CS320".to_string(),
                teacher_id: student.id,
                credits: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, QueryError::Validation(_)));
    }

    #[tokio::test]
    async fn update_subject_patches_only_given_fields() {
        let db = setup_db().await.unwrap();
        let teacher = seed_user(&db, "T", "t@example.edu", Role::Teacher, true)
            .await
            .unwrap();
        let subject = seed_subject(&db, "Old Name", "CS001", teacher.id)
            .await
            .unwrap();

        let updated = update_subject(
            &db,
            subject.id,
            SubjectChanges {
                name: Some("New Name".to_string()),
                credits: Some(3),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.code.as_deref(), Some("CS001"));
        assert_eq!(updated.credits, Some(3));

        // A non-teacher owner is rejected
        let student = seed_user(&db, "S", "s@example.edu", Role::Student, true)
            .await
            .unwrap();
        let err = update_subject(
            &db,
            subject.id,
            SubjectChanges {
                teacher_id: Some(student.id),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, QueryError::Validation(_)));
    }

    #[tokio::test]
    async fn overview_counts_unassigned_teachers() {
        let db = setup_db().await.unwrap();
        let assigned = seed_user(&db, "A", "a@example.edu", Role::Teacher, true)
            .await
            .unwrap();
        seed_user(&db, "B", "b@example.edu", Role::Teacher, true)
            .await
            .unwrap();
        seed_subject(&db, "Compilers", "CS330", assigned.id)
            .await
            .unwrap();

        let overview = overview(&db).await.unwrap();
        assert_eq!(overview.total_users, 2);
        assert_eq!(overview.active_subjects, 1);
        assert_eq!(overview.unassigned_teachers, 1);
    }
}
