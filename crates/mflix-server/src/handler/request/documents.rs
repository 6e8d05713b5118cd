use serde::{Deserialize, Serialize};

use crate::service::DocumentBody;

/// Keys a client may not set on a document body.
const RESERVED_KEYS: [&str; 2] = ["id", "_id"];

/// Body of a create or update request.
///
/// Only JSON objects deserialize; any other JSON value is rejected.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentPayload(DocumentBody);

impl DocumentPayload {
    /// Returns the body with reserved keys removed.
    pub fn into_body(self) -> DocumentBody {
        let mut body = self.0;
        for key in RESERVED_KEYS {
            body.remove(key);
        }
        body
    }
}

/// Path parameters for movie routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoviePathParams {
    pub movie_id: String,
}

/// Path parameters for comment routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentPathParams {
    pub comment_id: String,
}

/// Path parameters for theater routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TheaterPathParams {
    pub theater_id: String,
}

/// Query parameters for listing comments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsQuery {
    /// Restricts the listing to comments on this movie.
    pub id_movie: Option<String>,
}
