#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;

pub mod extract;
pub mod handler;
pub mod middleware;
pub mod service;

pub use crate::error::{BoxedError, Error, ErrorKind, Result};

/// Tracing target for login, registration and token verification.
pub const TRACING_TARGET_AUTHENTICATION: &str = "mflix_server::authentication";

/// Tracing target for store access from the service layer.
pub const TRACING_TARGET_STORE: &str = "mflix_server::store";
