use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Named collection a document belongs to.
///
/// Stored as text in the `documents.collection` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DocumentCollection {
    Movies,
    Comments,
    Theaters,
}

impl DocumentCollection {
    /// Returns the column value for this collection.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movies => "movies",
            Self::Comments => "comments",
            Self::Theaters => "theaters",
        }
    }
}
