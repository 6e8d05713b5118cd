//! Session token extraction.

mod auth_header;
mod auth_state;

pub use self::auth_header::AuthHeader;
pub use self::auth_state::AuthState;
