//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the syllabus tracking application here.
//! The structure follows the relational schema of the original tracker:
//! users are referenced (never owned) by subjects, enrollments and
//! departments, while a subject exclusively owns its topics and
//! enrollments.

pub mod academic_year;
pub mod activity_log;
pub mod comment;
pub mod course;
pub mod department;
pub mod enrollment;
pub mod notification;
pub mod report_cache;
pub mod resource;
pub mod subject;
pub mod topic;
pub mod topic_progress;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::academic_year::Entity as AcademicYear;
    pub use super::activity_log::Entity as ActivityLog;
    pub use super::comment::Entity as Comment;
    pub use super::course::Entity as Course;
    pub use super::department::Entity as Department;
    pub use super::enrollment::Entity as Enrollment;
    pub use super::notification::Entity as Notification;
    pub use super::report_cache::Entity as ReportCache;
    pub use super::resource::Entity as Resource;
    pub use super::subject::Entity as Subject;
    pub use super::topic::Entity as Topic;
    pub use super::topic_progress::Entity as TopicProgress;
    pub use super::user::Entity as User;
}
