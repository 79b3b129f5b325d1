pub use learnhub_models::courses::{
    COURSE_COLUMNS, Course, CourseFilterParams, CreateCourseDto, UpdateCourseDto,
    generate_course_code,
};
pub use learnhub_models::{CourseId, CourseStatus};
