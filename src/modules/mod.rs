pub mod auth;
pub mod conversations;
pub mod course_modules;
pub mod courses;
pub mod payments;
pub mod reviews;
pub mod users;
