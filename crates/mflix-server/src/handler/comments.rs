//! Movie comment handlers.
//!
//! Comments link to a movie through the `movie_id` field of their body.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;

use super::documents::{COMMENT, MOVIE};
use crate::extract::{AuthState, Json, Path, Query};
use crate::handler::Result;
use crate::handler::request::{CommentPathParams, CommentsQuery, DocumentPayload};
use crate::handler::response::{Data, Document, Message, Named};
use crate::service::{DocumentService, ServiceState};

/// Tracing target for comment operations.
const TRACING_TARGET: &str = "mflix_server::handler::comments";

/// Body field referencing the commented movie.
const MOVIE_ID_FIELD: &str = "movie_id";

/// Lists comments, either the first ones or all comments on one movie.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.id))]
async fn list_comments(
    State(documents): State<DocumentService>,
    auth_state: AuthState,
    Query(query): Query<CommentsQuery>,
) -> Result<Json<Data<Vec<Document>>>> {
    let Some(raw_movie_id) = query.id_movie else {
        return COMMENT.list(&documents).await;
    };

    let movie_id = MOVIE.parse_id(&raw_movie_id)?;
    let stored = documents
        .list_by_field(COMMENT.collection, MOVIE_ID_FIELD, &movie_id.to_string())
        .await?;

    tracing::debug!(
        target: TRACING_TARGET,
        movie_id = %movie_id,
        count = stored.len(),
        "comments listed for movie"
    );

    Ok(Json(Data::new(Document::from_stored_many(stored))))
}

/// Creates a comment.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.id))]
async fn create_comment(
    State(documents): State<DocumentService>,
    auth_state: AuthState,
    Json(payload): Json<DocumentPayload>,
) -> Result<(StatusCode, Json<Data<Document>>)> {
    COMMENT.create(&documents, payload).await
}

/// Returns a comment by ID.
#[tracing::instrument(
    skip_all,
    fields(account_id = %auth_state.id, comment_id = %path_params.comment_id)
)]
async fn get_comment(
    State(documents): State<DocumentService>,
    auth_state: AuthState,
    Path(path_params): Path<CommentPathParams>,
) -> Result<Json<Data<Named<Document>>>> {
    COMMENT.get(&documents, &path_params.comment_id).await
}

/// Merges the payload into a comment.
#[tracing::instrument(
    skip_all,
    fields(account_id = %auth_state.id, comment_id = %path_params.comment_id)
)]
async fn update_comment(
    State(documents): State<DocumentService>,
    auth_state: AuthState,
    Path(path_params): Path<CommentPathParams>,
    Json(payload): Json<DocumentPayload>,
) -> Result<Json<Data<Document>>> {
    COMMENT
        .update(&documents, &path_params.comment_id, payload)
        .await
}

/// Deletes a comment.
#[tracing::instrument(
    skip_all,
    fields(account_id = %auth_state.id, comment_id = %path_params.comment_id)
)]
async fn delete_comment(
    State(documents): State<DocumentService>,
    auth_state: AuthState,
    Path(path_params): Path<CommentPathParams>,
) -> Result<Json<Message>> {
    COMMENT.delete(&documents, &path_params.comment_id).await
}

/// Returns a [`Router`] with all comment routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route(
            "/api/movies/comments",
            get(list_comments).post(create_comment),
        )
        .route(
            "/api/movies/comments/{comment_id}",
            get(get_comment).put(update_comment).delete(delete_comment),
        )
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::handler::test::create_test_server;

    #[tokio::test]
    async fn comments_filter_by_movie() -> anyhow::Result<()> {
        let (server, context) = create_test_server()?;
        let token = context.token_for("alice")?;

        let response = server
            .post("/api/movies")
            .authorization_bearer(&token)
            .json(&json!({ "title": "Traffic in Souls" }))
            .await;
        let movie = response.json::<Value>();
        let movie_id = movie["data"]["id"].as_str().unwrap_or_default().to_owned();

        for (text, target) in [("first", movie_id.as_str()), ("second", movie_id.as_str())] {
            server
                .post("/api/movies/comments")
                .authorization_bearer(&token)
                .json(&json!({ "text": text, "movie_id": target }))
                .await
                .assert_status(StatusCode::CREATED);
        }
        server
            .post("/api/movies/comments")
            .authorization_bearer(&token)
            .json(&json!({ "text": "elsewhere", "movie_id": uuid::Uuid::new_v4() }))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .get("/api/movies/comments")
            .add_query_param("idMovie", &movie_id)
            .authorization_bearer(&token)
            .await;
        response.assert_status_ok();
        let listed = response.json::<Value>();
        let comments = listed["data"].as_array().cloned().unwrap_or_default();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0]["text"], "first");

        let response = server
            .get("/api/movies/comments")
            .authorization_bearer(&token)
            .await;
        let listed = response.json::<Value>();
        assert_eq!(listed["data"].as_array().map(Vec::len), Some(3));
        Ok(())
    }

    #[tokio::test]
    async fn invalid_movie_filter_is_bad_request() -> anyhow::Result<()> {
        let (server, context) = create_test_server()?;
        let token = context.token_for("alice")?;

        let response = server
            .get("/api/movies/comments")
            .add_query_param("idMovie", "not-an-id")
            .authorization_bearer(&token)
            .await;
        response.assert_status_bad_request();
        response.assert_json(&json!({
            "error": "Bad Request",
            "message": "Invalid movie ID",
            "resource": "movie",
        }));
        Ok(())
    }

    #[tokio::test]
    async fn comment_lifecycle() -> anyhow::Result<()> {
        let (server, context) = create_test_server()?;
        let token = context.token_for("alice")?;

        let response = server
            .post("/api/movies/comments")
            .authorization_bearer(&token)
            .json(&json!({ "name": "Ned Stark", "text": "Winter is coming" }))
            .await;
        let created = response.json::<Value>();
        let id = created["data"]["id"].as_str().unwrap_or_default().to_owned();

        let response = server
            .get(&format!("/api/movies/comments/{id}"))
            .authorization_bearer(&token)
            .await;
        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>()["data"]["comment"]["text"],
            "Winter is coming"
        );

        let response = server
            .delete(&format!("/api/movies/comments/{id}"))
            .authorization_bearer(&token)
            .await;
        response.assert_json(&json!({ "message": "Comment deleted successfully" }));

        let response = server
            .get("/api/movies/comments/nope")
            .authorization_bearer(&token)
            .await;
        response.assert_status_bad_request();
        Ok(())
    }

    #[tokio::test]
    async fn comments_require_a_session() -> anyhow::Result<()> {
        let (server, _) = create_test_server()?;

        let response = server.get("/api/movies/comments").await;
        response.assert_status_unauthorized();
        response.assert_json(&json!({ "error": "Unauthorized" }));
        Ok(())
    }
}
