//! Named constraint violations reported by PostgreSQL.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Categories of database constraint violations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintCategory {
    /// Format, length and range checks.
    Validation,
    /// Timestamp ordering checks.
    Chronological,
    /// Unique indexes.
    Uniqueness,
}

/// Accounts table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum AccountConstraints {
    #[strum(serialize = "accounts_username_not_empty")]
    UsernameNotEmpty,
    #[strum(serialize = "accounts_password_hash_not_empty")]
    PasswordHashNotEmpty,

    #[strum(serialize = "accounts_username_unique_idx")]
    UsernameUnique,
}

impl AccountConstraints {
    /// Creates a new [`AccountConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            Self::UsernameNotEmpty | Self::PasswordHashNotEmpty => ConstraintCategory::Validation,
            Self::UsernameUnique => ConstraintCategory::Uniqueness,
        }
    }
}

impl From<AccountConstraints> for String {
    #[inline]
    fn from(val: AccountConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for AccountConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Documents table constraint violations.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum DocumentConstraints {
    #[strum(serialize = "documents_collection_known")]
    CollectionKnown,
    #[strum(serialize = "documents_body_is_object")]
    BodyIsObject,

    #[strum(serialize = "documents_updated_after_created")]
    UpdatedAfterCreated,
}

impl DocumentConstraints {
    /// Creates a new [`DocumentConstraints`] from the constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            Self::CollectionKnown | Self::BodyIsObject => ConstraintCategory::Validation,
            Self::UpdatedAfterCreated => ConstraintCategory::Chronological,
        }
    }
}

impl From<DocumentConstraints> for String {
    #[inline]
    fn from(val: DocumentConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for DocumentConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Any known constraint violation, grouped by table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ConstraintViolation {
    Account(AccountConstraints),
    Document(DocumentConstraints),
}

impl ConstraintViolation {
    /// Parses a constraint name, returning `None` for unknown constraints.
    ///
    /// ```
    /// use mflix_postgres::types::{AccountConstraints, ConstraintViolation};
    ///
    /// let violation = ConstraintViolation::new("accounts_username_unique_idx");
    /// assert_eq!(
    ///     violation,
    ///     Some(ConstraintViolation::Account(AccountConstraints::UsernameUnique))
    /// );
    /// assert!(ConstraintViolation::new("unknown_constraint").is_none());
    /// ```
    pub fn new(constraint: &str) -> Option<Self> {
        if constraint.starts_with("accounts_") {
            AccountConstraints::new(constraint).map(Self::Account)
        } else if constraint.starts_with("documents_") {
            DocumentConstraints::new(constraint).map(Self::Document)
        } else {
            None
        }
    }

    /// Returns the table the violated constraint belongs to.
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::Account(_) => "accounts",
            Self::Document(_) => "documents",
        }
    }

    /// Returns the category of this constraint violation.
    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            Self::Account(c) => c.categorize(),
            Self::Document(c) => c.categorize(),
        }
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account(c) => write!(f, "{c}"),
            Self::Document(c) => write!(f, "{c}"),
        }
    }
}

impl From<ConstraintViolation> for String {
    #[inline]
    fn from(val: ConstraintViolation) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for ConstraintViolation {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value).ok_or_else(|| format!("unknown constraint: {value}"))
    }
}
