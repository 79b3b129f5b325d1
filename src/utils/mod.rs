//! Shared helpers for the feature modules.
//!
//! - [`codes`]: six-digit verification and reset codes
//! - [`cookies`]: the refresh-token cookie
//! - [`email`]: SMTP delivery of codes

pub mod codes;
pub mod cookies;
pub mod email;
