use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use futures::stream::Stream;
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use crate::error::ApiError;
use crate::state::AppState;

use super::dto::{CreateSnippetRequest, CreatedSnippetResponse, SnippetListItem};
use super::repo;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/snippets", get(list_recent))
        .route("/snippets/by-language/:language", get(list_by_language))
        .route("/snippets/events", get(subscribe))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/snippets", post(create_snippet))
}

#[instrument(skip(state, payload))]
pub async fn create_snippet(
    State(state): State<AppState>,
    Json(payload): Json<CreateSnippetRequest>,
) -> Result<(StatusCode, Json<CreatedSnippetResponse>), ApiError> {
    let snippet = repo::insert(
        &state.db,
        &payload.code,
        &payload.language,
        payload.title.as_deref(),
        payload.author.as_deref(),
    )
    .await?;

    // Push the new record to live subscribers; nobody listening is fine.
    if state.events.send(snippet.clone()).is_err() {
        debug!(snippet_id = %snippet.id, "no live subscribers");
    }

    info!(snippet_id = %snippet.id, language = %snippet.language, "snippet created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedSnippetResponse {
            id: snippet.id,
            created_at: snippet.created_at,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_recent(
    State(state): State<AppState>,
) -> Result<Json<Vec<SnippetListItem>>, ApiError> {
    let snippets = repo::list_recent(&state.db).await?;
    Ok(Json(snippets.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn list_by_language(
    State(state): State<AppState>,
    Path(language): Path<String>,
) -> Result<Json<Vec<SnippetListItem>>, ApiError> {
    let snippets = repo::list_by_language(&state.db, &language).await?;
    Ok(Json(snippets.into_iter().map(Into::into).collect()))
}

/// Live subscription: every successful create is delivered to each open
/// stream as a `snippet` event carrying the new record.
#[instrument(skip(state))]
pub async fn subscribe(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events.subscribe();
    let stream = futures::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(snippet) => match Event::default().event("snippet").json_data(&snippet) {
                    Ok(event) => return Some((Ok(event), rx)),
                    Err(e) => {
                        warn!(error = %e, "failed to encode snippet event");
                        continue;
                    }
                },
                // A lagged reader skips ahead; the client refetches the
                // list on every event, so nothing stays stale.
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}
