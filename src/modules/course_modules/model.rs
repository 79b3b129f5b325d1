pub use learnhub_models::course_modules::{
    CreateModuleDto, MODULE_COLUMNS, Module, ModuleFilterParams, UpdateModuleDto,
};
pub use learnhub_models::{CourseId, ModuleId, ModuleStatus};
