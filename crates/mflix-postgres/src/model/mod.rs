//! Database models mapped onto the diesel schema.

mod account;
mod document;

pub use account::{Account, NewAccount};
pub use document::{Document, NewDocument};
