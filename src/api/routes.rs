//! Axum router and HTTP handlers.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use crate::api::AppState;
use crate::badge::{render_badge_svg, style_for_name};
use crate::models::{AnalysisOutcome, MintOutcome, ReputationError, ReputationResult};

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .route("/check_badge", post(check_badge))
        .route("/mint", post(mint))
        .route("/badge/:file", get(badge_svg))
        .with_state(state)
        .layer(cors)
}

#[derive(Deserialize)]
struct AddressRequest {
    address: Option<String>,
}

#[derive(Deserialize)]
struct MintRequest {
    address: Option<String>,
    reputation_data: Option<Value>,
}

fn requested_address(address: Option<String>) -> Option<String> {
    address
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
}

/// `GET /health`
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "name": state.settings.app.name,
        "version": state.settings.app.version,
        "minting_enabled": state.service.minting_enabled(),
    }))
}

/// `POST /analyze`: score an address and attach a badge preview.
async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AddressRequest>,
) -> impl IntoResponse {
    let Some(address) = requested_address(req.address) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "error": "Address is required"})),
        );
    };

    info!(%address, "Analysis request");
    let outcome = state.service.analyze(&address).await;
    let success = !outcome.is_error();

    let mut data = match serde_json::to_value(&outcome) {
        Ok(data) => data,
        Err(e) => {
            warn!(error = %e, "Failed to serialize analysis");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Analysis failed due to an internal error.",
                    "data": {"rationale": ""},
                })),
            );
        }
    };

    if let (AnalysisOutcome::Scored(result), Some(fields)) = (&outcome, data.as_object_mut()) {
        let preview = render_badge_svg(&result.category.style());
        fields.insert("badge_svg_preview".to_string(), Value::String(preview));
    }

    (StatusCode::OK, Json(json!({"success": success, "data": data})))
}

/// `POST /check_badge`
async fn check_badge(
    State(state): State<AppState>,
    Json(req): Json<AddressRequest>,
) -> impl IntoResponse {
    let Some(address) = requested_address(req.address) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "error": "Address is required"})),
        );
    };

    match state.service.check_badge(&address).await {
        Ok(has_badge) => (
            StatusCode::OK,
            Json(json!({"success": true, "has_badge": has_badge})),
        ),
        Err(e) if e.is_terminal() => (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "error": e.public_message()})),
        ),
        Err(e) => {
            warn!(error = %e, %address, "Badge check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to check badge status due to an internal error.",
                })),
            )
        }
    }
}

/// `POST /mint`: publish metadata and issue a badge for a prior analysis.
async fn mint(
    State(state): State<AppState>,
    Json(req): Json<MintRequest>,
) -> impl IntoResponse {
    let (Some(address), Some(reputation_data)) = (requested_address(req.address), req.reputation_data)
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "message": "Address and reputation data are required"})),
        );
    };

    let result: ReputationResult = match serde_json::from_value(reputation_data) {
        Ok(result) => result,
        Err(e) => {
            let err = ReputationError::InvalidReputation(e.to_string());
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"success": false, "message": err.public_message()})),
            );
        }
    };

    info!(%address, category = %result.category, "Mint request");
    match state.service.try_mint(&address, &result).await {
        Ok(badge) => (StatusCode::OK, Json(json!(MintOutcome::minted(badge)))),
        Err(e) if e.is_terminal() => {
            warn!(error = %e, %address, "Mint rejected");
            (StatusCode::BAD_REQUEST, Json(json!(MintOutcome::failed(&e))))
        }
        Err(e) => {
            error!(error = %e, %address, tx_hash = ?e.tx_hash(), "Mint failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!(MintOutcome::failed(&e))),
            )
        }
    }
}

/// `GET /badge/{category}.svg`: badge artwork preview.
async fn badge_svg(Path(file): Path<String>) -> impl IntoResponse {
    let name = file.strip_suffix(".svg").unwrap_or(&file);
    let svg = render_badge_svg(&style_for_name(name));
    ([(header::CONTENT_TYPE, "image/svg+xml")], svg)
}
