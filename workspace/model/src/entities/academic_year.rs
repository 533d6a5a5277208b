use sea_orm::entity::prelude::*;

/// An academic year, e.g. "2025-2026". At most one row should have
/// `is_current = true`; the application treats it as the default year.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "academic_years")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub year: String,
    #[sea_orm(default_value = "false")]
    pub is_current: bool,
    pub start_date: Date,
    pub end_date: Date,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::subject::Entity")]
    Subject,
}

impl ActiveModelBehavior for ActiveModel {}
