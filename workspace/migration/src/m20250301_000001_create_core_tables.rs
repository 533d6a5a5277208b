use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Name))
                    .col(string(Users::Email).unique_key())
                    .col(string(Users::PasswordHash))
                    .col(string_len(Users::Role, 20))
                    .col(string_null(Users::Department))
                    .col(string_null(Users::Phone))
                    .col(boolean(Users::IsActive).default(true))
                    .col(timestamp_with_time_zone(Users::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // Create departments table
        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(pk_auto(Departments::Id))
                    .col(string(Departments::Name).unique_key())
                    .col(string(Departments::Code).unique_key())
                    .col(integer_null(Departments::HodId))
                    .col(string_null(Departments::Description))
                    .col(timestamp_with_time_zone(Departments::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_department_hod")
                            .from(Departments::Table, Departments::HodId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create courses table
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(pk_auto(Courses::Id))
                    .col(string(Courses::Name))
                    .col(string(Courses::Code).unique_key())
                    .col(integer(Courses::DepartmentId))
                    .col(integer(Courses::TotalSemesters))
                    .col(string_null(Courses::Description))
                    .col(timestamp_with_time_zone(Courses::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_course_department")
                            .from(Courses::Table, Courses::DepartmentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create academic_years table
        manager
            .create_table(
                Table::create()
                    .table(AcademicYears::Table)
                    .if_not_exists()
                    .col(pk_auto(AcademicYears::Id))
                    .col(string(AcademicYears::Year).unique_key())
                    .col(boolean(AcademicYears::IsCurrent).default(false))
                    .col(date(AcademicYears::StartDate))
                    .col(date(AcademicYears::EndDate))
                    .col(timestamp_with_time_zone(AcademicYears::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // Create subjects table
        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(pk_auto(Subjects::Id))
                    .col(string(Subjects::Name))
                    .col(string_null(Subjects::Code))
                    .col(string_null(Subjects::Description))
                    .col(integer(Subjects::TeacherId))
                    .col(integer_null(Subjects::CourseId))
                    .col(integer_null(Subjects::Semester))
                    .col(integer_null(Subjects::Credits))
                    .col(integer_null(Subjects::AcademicYearId))
                    .col(integer_null(Subjects::TotalHours))
                    .col(boolean(Subjects::IsActive).default(true))
                    .col(timestamp_with_time_zone(Subjects::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subject_teacher")
                            .from(Subjects::Table, Subjects::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subject_course")
                            .from(Subjects::Table, Subjects::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subject_academic_year")
                            .from(Subjects::Table, Subjects::AcademicYearId)
                            .to(AcademicYears::Table, AcademicYears::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create topics table
        manager
            .create_table(
                Table::create()
                    .table(Topics::Table)
                    .if_not_exists()
                    .col(pk_auto(Topics::Id))
                    .col(integer(Topics::SubjectId))
                    .col(string(Topics::Name))
                    .col(string_null(Topics::Description))
                    .col(integer(Topics::Order))
                    .col(integer_null(Topics::HoursAllocated))
                    .col(date_null(Topics::ExpectedDate))
                    .col(date_null(Topics::CompletedDate))
                    .col(boolean(Topics::IsCompleted).default(false))
                    .col(string_null(Topics::CompletionNotes))
                    .col(timestamp_with_time_zone(Topics::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_topic_subject")
                            .from(Topics::Table, Topics::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create enrollments table (composite primary key)
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(integer(Enrollments::StudentId))
                    .col(integer(Enrollments::SubjectId))
                    .col(timestamp_with_time_zone(Enrollments::EnrolledAt))
                    .col(string_len(Enrollments::Status, 20).default("active"))
                    .col(double(Enrollments::Progress).default(0.0))
                    .primary_key(
                        Index::create()
                            .name("pk_enrollments")
                            .col(Enrollments::StudentId)
                            .col(Enrollments::SubjectId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollment_student")
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollment_subject")
                            .from(Enrollments::Table, Enrollments::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Topics::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AcademicYears::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Departments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

// Define identifiers for all tables

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Role,
    Department,
    Phone,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Departments {
    Table,
    Id,
    Name,
    Code,
    HodId,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Courses {
    Table,
    Id,
    Name,
    Code,
    DepartmentId,
    TotalSemesters,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AcademicYears {
    Table,
    Id,
    Year,
    IsCurrent,
    StartDate,
    EndDate,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Subjects {
    Table,
    Id,
    Name,
    Code,
    Description,
    TeacherId,
    CourseId,
    Semester,
    Credits,
    AcademicYearId,
    TotalHours,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Topics {
    Table,
    Id,
    SubjectId,
    Name,
    Description,
    Order,
    HoursAllocated,
    ExpectedDate,
    CompletedDate,
    IsCompleted,
    CompletionNotes,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Enrollments {
    Table,
    StudentId,
    SubjectId,
    EnrolledAt,
    Status,
    Progress,
}
