//! # LearnHub Models
//!
//! Domain models and DTOs for the LearnHub API: database entities, request and
//! response bodies, and list filter parameters.
//!
//! # Modules
//!
//! - [`ids`]: typed UUID identifiers
//! - [`enums`]: roles and statuses mapped to Postgres enum types
//! - [`value_types`]: validated value types ([`Email`])
//! - [`auth`]: registration, login, verification and password reset bodies
//! - [`users`]: user accounts
//! - [`courses`]: courses and course code generation
//! - [`course_modules`]: ordered course modules
//! - [`reviews`]: course reviews
//! - [`conversations`]: conversations, messages and key derivation
//! - [`payments`]: course payments
//!
//! # Example
//!
//! ```ignore
//! use learnhub_models::conversations::direct_conversation_key;
//! use learnhub_models::ids::UserId;
//!
//! let (a, b) = (UserId::new(), UserId::new());
//! assert_eq!(direct_conversation_key(&[a, b]), direct_conversation_key(&[b, a]));
//! ```

pub mod auth;
pub mod conversations;
pub mod course_modules;
pub mod courses;
pub mod enums;
pub mod ids;
pub mod payments;
pub mod reviews;
pub mod users;
pub mod value_types;

// Re-export commonly used types at crate root for convenience
pub use enums::{
    ConversationStatus, ConversationType, CourseStatus, ModuleStatus, PaymentStatus, UserRole,
    UserStatus,
};
pub use ids::{ConversationId, CourseId, MessageId, ModuleId, PaymentId, ReviewId, UserId};
pub use value_types::{Email, ValueTypeError};
