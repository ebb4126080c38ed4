//! sea-orm entities owned by the grades service.

pub mod courses;
pub mod enrollments;
pub mod feedbacks;
pub mod users;
