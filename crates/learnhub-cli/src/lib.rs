//! # LearnHub CLI
//!
//! Administrative commands that run directly against the database.
//!
//! ```ignore
//! use learnhub_cli::admin::{NewAdmin, create_admin};
//!
//! let admin = NewAdmin::new("root", "Site Admin", "admin@example.com", "Abc123!@")?;
//! let id = create_admin(&pool, &admin).await?;
//! ```

pub mod admin;
