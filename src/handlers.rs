pub mod auth;
pub mod coordinator;
pub mod dashboard;
pub mod health;
pub mod student;
pub mod teacher;
