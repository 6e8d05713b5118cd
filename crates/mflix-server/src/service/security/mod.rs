//! Password hashing, credential checks and session tokens.

mod authenticator;
mod identity;
mod password_hasher;
mod session_keys;

pub use authenticator::Authenticator;
pub use identity::IdentityClaim;
pub use password_hasher::PasswordHasher;
pub use session_keys::{SessionClaims, SessionConfig, SessionKeys, SessionToken};
