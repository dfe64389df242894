use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::RequestId;
use crate::models::{Book, PreferenceRecord, Shelf, UserId, VoteTally, VoteType};
use crate::services::{sessions, PanelDirective, VoteOutcome};

use super::AppState;

// Request/Response types

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub user: Option<UserId>,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct BookDetailsResponse {
    #[serde(flatten)]
    pub book: Book,
    pub tally: VoteTally,
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub book: String,
    pub vote: VoteType,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub panel: PanelDirective,
    pub books: Vec<Book>,
}

impl RecommendationsResponse {
    fn hidden() -> Self {
        Self {
            panel: PanelDirective::Hide,
            books: Vec::new(),
        }
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Catalog shelves in display order
pub async fn get_catalog(State(state): State<AppState>) -> Json<Vec<Shelf>> {
    Json(state.catalog.shelves().to_vec())
}

/// Opens a new anonymous session
pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionResponse>) {
    let session_id = state.create_session().await;
    (
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id,
            user: None,
        }),
    )
}

/// Ends a session and drops its tallies
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.remove_session(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Signs a session in by name
pub async fn sign_in(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SignInRequest>,
) -> AppResult<Json<sessions::SignedIn>> {
    let session = state.session(session_id).await?;
    let mut session = session.lock().await;
    let signed_in = sessions::sign_in(state.store.as_ref(), &mut session, &request.name).await?;
    Ok(Json(signed_in))
}

/// Signs a session out, keeping its tallies
pub async fn sign_out(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let session = state.session(session_id).await?;
    sessions::sign_out(&mut *session.lock().await);
    Ok(StatusCode::NO_CONTENT)
}

/// Book detail view with the session's tally for it
pub async fn get_book(
    State(state): State<AppState>,
    Path((session_id, name)): Path<(Uuid, String)>,
) -> AppResult<Json<BookDetailsResponse>> {
    let session = state.session(session_id).await?;
    let (book, tally) = sessions::open_book(&state.catalog, &mut *session.lock().await, &name)?;
    Ok(Json(BookDetailsResponse { book, tally }))
}

/// Applies a like or dislike
pub async fn cast_vote(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<VoteRequest>,
) -> AppResult<Json<VoteOutcome>> {
    let session = state.session(session_id).await?;
    let book = state.catalog.find(&request.book).cloned().ok_or_else(|| {
        AppError::NotFound(format!("Book '{}' is not in the catalog", request.book))
    })?;

    tracing::info!(
        request_id = %request_id,
        session = %session_id,
        book = %book.name,
        vote = %request.vote,
        "Processing vote"
    );

    let mut session = session.lock().await;
    let outcome = state.reconciler.apply_vote(&mut session, &book, request.vote).await;

    Ok(Json(outcome))
}

/// Current recommendations for the session's user
pub async fn get_recommendations(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<RecommendationsResponse>> {
    let session = state.session(session_id).await?;
    let user = session.lock().await.user().cloned();

    let Some(user) = user else {
        return Ok(Json(RecommendationsResponse::hidden()));
    };

    let books = state.recommender.for_user(state.store.as_ref(), &user).await?;
    if books.is_empty() {
        return Ok(Json(RecommendationsResponse::hidden()));
    }

    Ok(Json(RecommendationsResponse {
        panel: PanelDirective::Show,
        books,
    }))
}

/// The signed-in user's stored likes and dislikes
pub async fn get_preferences(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<PreferenceRecord>> {
    let session = state.session(session_id).await?;
    let session = session.lock().await;
    let record = sessions::preferences(state.store.as_ref(), &session).await?;
    Ok(Json(record))
}
