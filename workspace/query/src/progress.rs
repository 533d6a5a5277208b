//! Progress aggregation.
//!
//! `percent_complete` is deliberately a pure function of its input so it
//! can be tested without a database and reused unchanged whether the
//! topics come from "all topics of a subject" or "topics visible to one
//! student". The denormalized `enrollments.progress` column is only ever
//! written through [`sync_enrollment_progress`]; topic completion stays
//! the source of truth.

use model::entities::{enrollment, topic, prelude::*};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::error::Result;

/// Percent of completed topics, rounded to one decimal.
/// An empty sequence yields 0.0 rather than dividing by zero.
pub fn percent_complete(topics: &[topic::Model]) -> f64 {
    let total = topics.len();
    if total == 0 {
        return 0.0;
    }
    let completed = topics.iter().filter(|t| t.is_completed).count();
    round1(completed as f64 / total as f64 * 100.0)
}

/// Mean of already-rounded percentages, rounded to one decimal.
/// Empty input yields 0.0.
pub fn average_percent(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    round1(values.iter().sum::<f64>() / values.len() as f64)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Percent complete for one subject, computed from its topics.
pub async fn subject_percent<C: ConnectionTrait>(db: &C, subject_id: i32) -> Result<f64> {
    let topics = Topic::find()
        .filter(topic::Column::SubjectId.eq(subject_id))
        .order_by_asc(topic::Column::Order)
        .all(db)
        .await?;
    Ok(percent_complete(&topics))
}

/// Recomputes the subject percent and copies it into every enrollment row
/// of the subject. Runs on whatever connection the caller passes, so a
/// mutation can include the sync in its own transaction.
pub async fn sync_enrollment_progress<C: ConnectionTrait>(db: &C, subject_id: i32) -> Result<f64> {
    let percent = subject_percent(db, subject_id).await?;
    Enrollment::update_many()
        .col_expr(enrollment::Column::Progress, Expr::value(percent))
        .filter(enrollment::Column::SubjectId.eq(subject_id))
        .exec(db)
        .await?;
    Ok(percent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn topic(order: i32, is_completed: bool) -> topic::Model {
        topic::Model {
            id: order,
            subject_id: 1,
            name: format!("Topic {order}"),
            description: None,
            order,
            hours_allocated: None,
            expected_date: None,
            completed_date: None,
            is_completed,
            completion_notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_sequence_is_zero() {
        assert_eq!(percent_complete(&[]), 0.0);
    }

    #[test]
    fn none_complete_is_zero() {
        let topics: Vec<_> = (1..=4).map(|i| topic(i, false)).collect();
        assert_eq!(percent_complete(&topics), 0.0);
    }

    #[test]
    fn all_complete_is_hundred() {
        let topics: Vec<_> = (1..=4).map(|i| topic(i, true)).collect();
        assert_eq!(percent_complete(&topics), 100.0);
    }

    #[test]
    fn partial_completion_rounds_to_one_decimal() {
        // 2 of 4 complete
        let topics = vec![
            topic(1, false),
            topic(2, true),
            topic(3, true),
            topic(4, false),
        ];
        assert_eq!(percent_complete(&topics), 50.0);

        // 1 of 3 complete: 33.333... rounds to 33.3
        let topics = vec![topic(1, true), topic(2, false), topic(3, false)];
        assert_eq!(percent_complete(&topics), 33.3);

        // 2 of 3 complete: 66.666... rounds to 66.7
        let topics = vec![topic(1, true), topic(2, true), topic(3, false)];
        assert_eq!(percent_complete(&topics), 66.7);

        // 2 of 5 complete
        let topics: Vec<_> = (1..=5).map(|i| topic(i, i % 2 == 0)).collect();
        assert_eq!(percent_complete(&topics), 40.0);

        // 1 of 7 complete: 14.285... rounds to 14.3
        let topics: Vec<_> = (1..=7).map(|i| topic(i, i == 1)).collect();
        assert_eq!(percent_complete(&topics), 14.3);
    }

    #[test]
    fn average_of_percentages() {
        assert_eq!(average_percent(&[]), 0.0);
        assert_eq!(average_percent(&[50.0]), 50.0);
        assert_eq!(average_percent(&[33.3, 66.7]), 50.0);
        assert_eq!(average_percent(&[10.0, 20.0, 40.0]), 23.3);
    }
}
