//! Request extractors with uniform error responses.
//!
//! Drop-in replacements for the axum extractors that convert every rejection
//! into the crate's [`Error`] so clients always receive the same JSON shape.
//!
//! [`Error`]: crate::handler::Error

mod enhanced_json;
mod enhanced_path;
mod enhanced_query;
mod validated_json;

pub use self::enhanced_json::Json;
pub use self::enhanced_path::Path;
pub use self::enhanced_query::Query;
pub use self::validated_json::ValidateJson;

/// Trims an error message to keep responses short.
fn sanitize_error_message(message: &str) -> String {
    let lines = message.lines().take(3).collect::<Vec<_>>();
    lines.join(" ").chars().take(200).collect()
}
