//! Coordinator administration endpoints. Every handler requires the
//! coordinator role; the query layer applies validation and atomicity.

pub mod enrollments;
pub mod subjects;
pub mod topics;
pub mod users;
