use crate::app_state::AppState;
use crate::components::{AddProductForm, EmailForm};
use crate::data_models::TrackedProduct;
use crate::templates::{HtmlTemplate, IndexTemplate};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Redirect};
use axum::Form;
use std::sync::Arc;
use tracing::debug;

pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let notices = state.orchestrator.take_notices().await;
    let snapshot = state.orchestrator.snapshot().await;
    HtmlTemplate(IndexTemplate::new(snapshot, notices, &state.display))
}

pub async fn products(State(state): State<AppState>) -> Json<Vec<TrackedProduct>> {
    Json(state.orchestrator.snapshot().await.products)
}

/// Answers right away; the page shows the loading card until the backend
/// finishes scraping.
pub async fn add_product(
    State(state): State<AppState>,
    Form(form): Form<AddProductForm>,
) -> Redirect {
    let orchestrator = Arc::clone(&state.orchestrator);
    if let Some(url) = orchestrator.begin_add(&form).await {
        tokio::spawn(async move { orchestrator.complete_add(&url).await });
    }
    Redirect::to("/")
}

pub async fn delete_product(State(state): State<AppState>, Path(id): Path<String>) -> Redirect {
    let orchestrator = Arc::clone(&state.orchestrator);
    let snapshot = orchestrator.begin_delete(&id).await;
    tokio::spawn(async move { orchestrator.complete_delete(&id, snapshot).await });
    Redirect::to("/")
}

pub async fn submit_email(State(state): State<AppState>, Form(form): Form<EmailForm>) -> Redirect {
    state.orchestrator.submit_email(form).await;
    Redirect::to("/")
}

pub async fn dismiss_email_prompt(State(state): State<AppState>) -> Redirect {
    if !state.orchestrator.dismiss_email_prompt().await {
        debug!("email prompt kept open until an email is saved");
    }
    Redirect::to("/")
}

pub async fn change_email(State(state): State<AppState>) -> Redirect {
    state.orchestrator.open_email_prompt().await;
    Redirect::to("/")
}
