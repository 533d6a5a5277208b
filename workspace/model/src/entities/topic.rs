use sea_orm::entity::prelude::*;

/// A syllabus unit inside a subject.
///
/// `order` is 1-based and unique within the subject: across all topics of
/// one subject the order values always form a permutation of 1..N. Every
/// mutation that touches ordering (append, delete, reorder) must leave
/// that invariant intact.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "topics")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub subject_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub order: i32,
    pub hours_allocated: Option<i32>,
    pub expected_date: Option<Date>,
    pub completed_date: Option<Date>,
    #[sea_orm(default_value = "false")]
    pub is_completed: bool,
    pub completion_notes: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subject::Entity",
        from = "Column::SubjectId",
        to = "super::subject::Column::Id"
    )]
    Subject,
    #[sea_orm(has_many = "super::resource::Entity")]
    Resource,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
    #[sea_orm(has_many = "super::topic_progress::Entity")]
    TopicProgress,
}

impl Related<super::subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl Related<super::resource::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Resource.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
