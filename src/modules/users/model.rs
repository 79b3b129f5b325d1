pub use learnhub_models::users::{
    CreateUserDto, USER_COLUMNS, UpdateUserDto, User, UserFilterParams, UserRecord,
};
pub use learnhub_models::{UserId, UserRole, UserStatus};
