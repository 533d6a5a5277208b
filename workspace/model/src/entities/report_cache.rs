use sea_orm::entity::prelude::*;

/// Durable cache of generated reports. Rows past `expires_at` are stale
/// and may be overwritten or ignored by readers.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "report_cache")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub report_type: String,
    pub filters: Option<Json>,
    pub data: Json,
    pub generated_at: DateTimeUtc,
    pub expires_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
