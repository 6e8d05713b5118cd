//! Theater handlers.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;

use super::documents::THEATER;
use crate::extract::{AuthState, Json, Path};
use crate::handler::Result;
use crate::handler::request::{DocumentPayload, TheaterPathParams};
use crate::handler::response::{Data, Document, Message, Named};
use crate::service::{DocumentService, ServiceState};

/// Lists the first theaters.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.id))]
async fn list_theaters(
    State(documents): State<DocumentService>,
    auth_state: AuthState,
) -> Result<Json<Data<Vec<Document>>>> {
    THEATER.list(&documents).await
}

/// Creates a theater.
#[tracing::instrument(skip_all, fields(account_id = %auth_state.id))]
async fn create_theater(
    State(documents): State<DocumentService>,
    auth_state: AuthState,
    Json(payload): Json<DocumentPayload>,
) -> Result<(StatusCode, Json<Data<Document>>)> {
    THEATER.create(&documents, payload).await
}

/// Returns a theater by ID.
#[tracing::instrument(
    skip_all,
    fields(account_id = %auth_state.id, theater_id = %path_params.theater_id)
)]
async fn get_theater(
    State(documents): State<DocumentService>,
    auth_state: AuthState,
    Path(path_params): Path<TheaterPathParams>,
) -> Result<Json<Data<Named<Document>>>> {
    THEATER.get(&documents, &path_params.theater_id).await
}

/// Merges the payload into a theater.
#[tracing::instrument(
    skip_all,
    fields(account_id = %auth_state.id, theater_id = %path_params.theater_id)
)]
async fn update_theater(
    State(documents): State<DocumentService>,
    auth_state: AuthState,
    Path(path_params): Path<TheaterPathParams>,
    Json(payload): Json<DocumentPayload>,
) -> Result<Json<Data<Document>>> {
    THEATER
        .update(&documents, &path_params.theater_id, payload)
        .await
}

/// Deletes a theater.
#[tracing::instrument(
    skip_all,
    fields(account_id = %auth_state.id, theater_id = %path_params.theater_id)
)]
async fn delete_theater(
    State(documents): State<DocumentService>,
    auth_state: AuthState,
    Path(path_params): Path<TheaterPathParams>,
) -> Result<Json<Message>> {
    THEATER.delete(&documents, &path_params.theater_id).await
}

/// Returns a [`Router`] with all theater routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/api/theaters", get(list_theaters).post(create_theater))
        .route(
            "/api/theaters/{theater_id}",
            get(get_theater).put(update_theater).delete(delete_theater),
        )
}
