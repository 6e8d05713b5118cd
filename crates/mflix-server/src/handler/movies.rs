//! Movie handlers.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;

use super::documents::MOVIE;
use crate::extract::{AuthState, Json, Path};
use crate::handler::Result;
use crate::handler::request::{DocumentPayload, MoviePathParams};
use crate::handler::response::{Data, Document, Message, Named};
use crate::service::{DocumentService, ServiceState};

/// Lists the first movies.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.id))]
async fn list_movies(
    State(documents): State<DocumentService>,
    auth_state: AuthState,
) -> Result<Json<Data<Vec<Document>>>> {
    MOVIE.list(&documents).await
}

/// Creates a movie.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.id))]
async fn create_movie(
    State(documents): State<DocumentService>,
    auth_state: AuthState,
    Json(payload): Json<DocumentPayload>,
) -> Result<(StatusCode, Json<Data<Document>>)> {
    MOVIE.create(&documents, payload).await
}

/// Returns a movie by ID.
#[tracing::instrument(
    skip_all,
    fields(account_id = %auth_state.id, movie_id = %path_params.movie_id)
)]
async fn get_movie(
    State(documents): State<DocumentService>,
    auth_state: AuthState,
    Path(path_params): Path<MoviePathParams>,
) -> Result<Json<Data<Named<Document>>>> {
    MOVIE.get(&documents, &path_params.movie_id).await
}

/// Merges the payload into a movie.
#[tracing::instrument(
    skip_all,
    fields(account_id = %auth_state.id, movie_id = %path_params.movie_id)
)]
async fn update_movie(
    State(documents): State<DocumentService>,
    auth_state: AuthState,
    Path(path_params): Path<MoviePathParams>,
    Json(payload): Json<DocumentPayload>,
) -> Result<Json<Data<Document>>> {
    MOVIE
        .update(&documents, &path_params.movie_id, payload)
        .await
}

/// Deletes a movie.
#[tracing::instrument(
    skip_all,
    fields(account_id = %auth_state.id, movie_id = %path_params.movie_id)
)]
async fn delete_movie(
    State(documents): State<DocumentService>,
    auth_state: AuthState,
    Path(path_params): Path<MoviePathParams>,
) -> Result<Json<Message>> {
    MOVIE.delete(&documents, &path_params.movie_id).await
}

/// Returns a [`Router`] with all movie routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/api/movies", get(list_movies).post(create_movie))
        .route(
            "/api/movies/{movie_id}",
            get(get_movie).put(update_movie).delete(delete_movie),
        )
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use uuid::Uuid;

    use crate::handler::test::create_test_server;

    #[tokio::test]
    async fn movie_lifecycle() -> anyhow::Result<()> {
        let (server, context) = create_test_server()?;
        let token = context.token_for("alice")?;

        let response = server
            .post("/api/movies")
            .authorization_bearer(&token)
            .json(&json!({ "_id": "ignored", "title": "The Great Train Robbery", "year": 1903 }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        let created = response.json::<Value>();
        let id = created["data"]["id"].as_str().unwrap_or_default().to_owned();
        assert!(created["data"].get("_id").is_none());
        assert_eq!(created["data"]["year"], 1903);

        let response = server
            .get(&format!("/api/movies/{id}"))
            .authorization_bearer(&token)
            .await;
        response.assert_status_ok();
        let fetched = response.json::<Value>();
        assert_eq!(fetched["data"]["movie"]["title"], "The Great Train Robbery");

        let response = server
            .put(&format!("/api/movies/{id}"))
            .authorization_bearer(&token)
            .json(&json!({ "year": 1904, "rated": "TV-G" }))
            .await;
        response.assert_status_ok();
        let updated = response.json::<Value>();
        assert_eq!(updated["data"]["title"], "The Great Train Robbery");
        assert_eq!(updated["data"]["year"], 1904);
        assert_eq!(updated["data"]["rated"], "TV-G");

        let response = server
            .delete(&format!("/api/movies/{id}"))
            .authorization_bearer(&token)
            .await;
        response.assert_status_ok();
        response.assert_json(&json!({ "message": "Movie deleted successfully" }));

        let response = server
            .get(&format!("/api/movies/{id}"))
            .authorization_bearer(&token)
            .await;
        response.assert_status_not_found();
        response.assert_json(&json!({
            "error": "Not Found",
            "message": "Movie not found",
            "resource": "movie",
        }));
        Ok(())
    }

    #[tokio::test]
    async fn list_returns_at_most_ten() -> anyhow::Result<()> {
        let (server, context) = create_test_server()?;
        let token = context.token_for("alice")?;

        for index in 0..12 {
            server
                .post("/api/movies")
                .authorization_bearer(&token)
                .json(&json!({ "title": format!("Movie {index}") }))
                .await
                .assert_status(axum::http::StatusCode::CREATED);
        }

        let response = server.get("/api/movies").authorization_bearer(&token).await;
        response.assert_status_ok();
        let listed = response.json::<Value>();
        let movies = listed["data"].as_array().cloned().unwrap_or_default();
        assert_eq!(movies.len(), 10);
        assert_eq!(movies[0]["title"], "Movie 0");
        Ok(())
    }

    #[tokio::test]
    async fn invalid_and_missing_ids() -> anyhow::Result<()> {
        let (server, context) = create_test_server()?;
        let token = context.token_for("alice")?;

        let response = server
            .get("/api/movies/573a1390f29313caabcd4135")
            .authorization_bearer(&token)
            .await;
        response.assert_status_bad_request();
        response.assert_json(&json!({
            "error": "Bad Request",
            "message": "Invalid movie ID",
            "resource": "movie",
        }));

        let missing = Uuid::new_v4();
        for response in [
            server
                .put(&format!("/api/movies/{missing}"))
                .authorization_bearer(&token)
                .json(&json!({ "title": "Nope" }))
                .await,
            server
                .delete(&format!("/api/movies/{missing}"))
                .authorization_bearer(&token)
                .await,
        ] {
            response.assert_status_not_found();
        }
        Ok(())
    }

    #[tokio::test]
    async fn non_object_body_is_bad_request() -> anyhow::Result<()> {
        let (server, context) = create_test_server()?;
        let token = context.token_for("alice")?;

        let response = server
            .post("/api/movies")
            .authorization_bearer(&token)
            .json(&json!(["not", "an", "object"]))
            .await;
        response.assert_status_bad_request();
        Ok(())
    }

    #[tokio::test]
    async fn store_outage_is_internal_error() -> anyhow::Result<()> {
        let (server, context) = create_test_server()?;
        let token = context.token_for("alice")?;
        context.documents.set_unavailable(true);

        let response = server.get("/api/movies").authorization_bearer(&token).await;
        response.assert_status_internal_server_error();
        response.assert_json(&json!({
            "error": "Internal Server Error",
            "message": "Internal server error",
        }));
        Ok(())
    }
}
