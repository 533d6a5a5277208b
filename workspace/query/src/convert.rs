//! Entity-to-transport conversions shared by the scoped modules.

use common::{SubjectSummary, TopicRow};
use model::entities::{subject, topic};

pub(crate) fn subject_summary(subject: &subject::Model) -> SubjectSummary {
    SubjectSummary {
        id: subject.id,
        name: subject.name.clone(),
        code: subject.code.clone(),
        is_active: subject.is_active,
    }
}

pub(crate) fn topic_row(topic: &topic::Model) -> TopicRow {
    TopicRow {
        id: topic.id,
        name: topic.name.clone(),
        order: topic.order,
        is_completed: topic.is_completed,
        expected_date: topic.expected_date,
        completed_date: topic.completed_date,
        hours_allocated: topic.hours_allocated,
    }
}
