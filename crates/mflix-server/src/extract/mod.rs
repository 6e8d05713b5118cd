//! HTTP request extractors.
//!
//! - [`AuthHeader`] and [`AuthState`] read and verify session tokens.
//! - [`Json`], [`ValidateJson`], [`Path`] and [`Query`] wrap the axum
//!   extractors and reject with the crate's JSON error body.

pub mod auth;
pub mod reject;

pub use crate::extract::auth::{AuthHeader, AuthState};
pub use crate::extract::reject::{Json, Path, Query, ValidateJson};
