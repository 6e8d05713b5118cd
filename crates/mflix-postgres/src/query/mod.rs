//! Repository traits implemented for [`PgConnection`].
//!
//! [`PgConnection`]: crate::PgConnection

mod account;
mod document;

pub use account::AccountRepository;
pub use document::DocumentRepository;
