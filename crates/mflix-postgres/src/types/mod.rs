//! Shared types used by models and queries.

mod collection;
mod constraint;

pub use collection::DocumentCollection;
pub use constraint::{
    AccountConstraints, ConstraintCategory, ConstraintViolation, DocumentConstraints,
};
