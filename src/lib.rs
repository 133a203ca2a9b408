pub mod app_state;
pub mod client;
pub mod components;
pub mod configuration;
pub mod data_models;
pub mod errors;
pub mod mapper;
pub mod notifications;
pub mod orchestrator;
mod routes;
pub mod storage;
pub mod templates;

use crate::app_state::AppState;
use crate::configuration::Settings;
use crate::errors::Error;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn create_app(settings: &Settings) -> Result<(Router, AppState), Error> {
    let app_state = AppState::init(settings)?;
    Ok((router(app_state.clone()), app_state))
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/health_check", get(routes::health_check))
        .route("/api/products", get(routes::products))
        .route("/products", post(routes::add_product))
        .route("/products/:id/delete", post(routes::delete_product))
        .route("/email", post(routes::submit_email))
        .route("/email/dismiss", post(routes::dismiss_email_prompt))
        .route("/email/change", post(routes::change_email))
        .nest_service("/assets", ServeDir::new("assets"))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
