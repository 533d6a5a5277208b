//! Shared fixtures for the query-layer tests: an in-memory database with
//! migrations applied plus seed helpers for the common entity shapes.

use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use model::entities::{enrollment, subject, topic, user};
use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, DbErr, Set};

pub async fn setup_db() -> Result<DatabaseConnection, DbErr> {
    // Connect to the SQLite database
    let db = Database::connect("sqlite::memory:").await?;

    // Enable foreign keys
    db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

    // Try to apply migrations first
    Migrator::up(&db, None).await.expect("Migrations failed.");
    Ok(db)
}

pub async fn seed_user(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    role: user::Role,
    active: bool,
) -> Result<user::Model, DbErr> {
    user::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        password_hash: Set("$argon2id$test".to_string()),
        role: Set(role),
        department: Set(Some("CSE".to_string())),
        phone: Set(None),
        is_active: Set(active),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn seed_subject(
    db: &DatabaseConnection,
    name: &str,
    code: &str,
    teacher_id: i32,
) -> Result<subject::Model, DbErr> {
    subject::ActiveModel {
        name: Set(name.to_string()),
        code: Set(Some(code.to_string())),
        description: Set(None),
        teacher_id: Set(teacher_id),
        course_id: Set(None),
        semester: Set(None),
        credits: Set(None),
        academic_year_id: Set(None),
        total_hours: Set(None),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn seed_topic(
    db: &DatabaseConnection,
    subject_id: i32,
    name: &str,
    order: i32,
    is_completed: bool,
) -> Result<topic::Model, DbErr> {
    topic::ActiveModel {
        subject_id: Set(subject_id),
        name: Set(name.to_string()),
        description: Set(None),
        order: Set(order),
        hours_allocated: Set(None),
        expected_date: Set(None),
        completed_date: Set(None),
        is_completed: Set(is_completed),
        completion_notes: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn seed_enrollment(
    db: &DatabaseConnection,
    student_id: i32,
    subject_id: i32,
) -> Result<enrollment::Model, DbErr> {
    enrollment::ActiveModel {
        student_id: Set(student_id),
        subject_id: Set(subject_id),
        enrolled_at: Set(Utc::now()),
        status: Set(enrollment::EnrollmentStatus::Active),
        progress: Set(0.0),
    }
    .insert(db)
    .await
}
