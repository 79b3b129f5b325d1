//! # LearnHub Core
//!
//! Core types, errors, and utilities for the LearnHub API.
//!
//! - [`errors`]: the closed [`AppError`] set and its HTTP rendering
//! - [`pagination`]: page-based pagination parameters and metadata
//! - [`password`]: bcrypt hashing and the password policy
//! - [`response`]: the `{success, data, meta}` success envelope
//! - [`serde`]: query-string deserializers
//!
//! # Example
//!
//! ```ignore
//! use learnhub_core::{AppError, ApiResponse, PaginationParams};
//!
//! let error = AppError::not_found("Course not found");
//! let hash = learnhub_core::hash_password("Abc123!@")?;
//! let limit = PaginationParams::default().limit_or(10);
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod response;
pub mod serde;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorResponse};
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, validate_password_strength, verify_password};
pub use response::{ApiResponse, Page};
