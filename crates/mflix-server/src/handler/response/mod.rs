//! Response types for HTTP handlers.

mod authentications;
mod documents;
mod errors;
mod monitors;

pub use authentications::*;
pub use documents::*;
pub use errors::*;
pub use monitors::*;
