//! Request types for HTTP handlers.

mod authentications;
mod documents;

pub use authentications::*;
pub use documents::*;
