//! HTTP routes for civicad.

use crate::intake::{self, ComplaintForm};
use crate::pages::{self, Flash};
use crate::server::AppState;
use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Form, Json, Router,
};
use civica_common::{ReferenceId, VerificationToken};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

type AppStateArc = Arc<AppState>;

// ============================================================================
// Portal Routes
// ============================================================================

pub fn portal_routes() -> Router<AppStateArc> {
    Router::new().route("/", get(show_form).post(submit_complaint))
}

async fn show_form() -> Html<String> {
    Html(pages::complaint_page(None, &ComplaintForm::default()))
}

/// Process a form submission. Validation failures re-render the form
/// with the submitted values echoed back; accepted submissions always
/// get a reference id, whatever the notification outcome.
async fn submit_complaint(
    State(state): State<AppStateArc>,
    Form(form): Form<ComplaintForm>,
) -> Html<String> {
    let submission = match intake::validate(&form) {
        Ok(s) => s,
        Err(e) => {
            info!("Rejected submission: {}", e);
            return Html(pages::complaint_page(Some(&Flash::error(e.to_string())), &form));
        }
    };

    let reference_id = ReferenceId::generate();
    let token = VerificationToken::generate();
    info!("Accepted complaint {} ({})", reference_id, submission.category);

    let result = state.mailer.dispatch(&submission, &reference_id, &token).await;

    let flash = if result.delivered {
        Flash::success(format!(
            "Complaint submitted. A confirmation email (ref {}) has been sent to {}.",
            reference_id, submission.contact
        ))
    } else {
        let warning = result
            .warning
            .unwrap_or_else(|| "Email was not sent.".to_string());
        Flash::warning(format!("Complaint submitted (ref {}). {}", reference_id, warning))
    };

    Html(pages::complaint_page(Some(&flash), &ComplaintForm::default()))
}

// ============================================================================
// Asset Routes
// ============================================================================

const STYLESHEET: &str = include_str!("../static/style.css");

pub fn asset_routes() -> Router<AppStateArc> {
    Router::new().route("/static/style.css", get(stylesheet))
}

async fn stylesheet() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLESHEET,
    )
}

// ============================================================================
// Health Routes
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/health", get(health_check))
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}
