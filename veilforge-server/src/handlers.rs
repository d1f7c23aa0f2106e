//! Request handlers for the entitlement API.
//!
//! Every handler short-circuits on authentication before touching the
//! entitlement engine; feature and plan tags are validated before any store
//! access.

use crate::auth::bearer_token;
use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use veilforge_entitlement::{AccessReason, EntitlementStatus, EventKind};
use veilforge_types::{FeatureTag, Plan, Principal};

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Principal, ApiError> {
    let token = bearer_token(headers)?;
    Ok(state.verifier.verify(token)?)
}

// ── GET /api/health ──────────────────────────────────────────────

pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

// ── GET /api/user-status ─────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UserStatusResponse {
    pub plan: Plan,
}

pub async fn user_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserStatusResponse>, ApiError> {
    let principal = authenticate(&state, &headers)?;
    let status = state.service.status(&principal).await?;
    Ok(Json(UserStatusResponse { plan: status.plan }))
}

// ── GET /api/user-premium-status ─────────────────────────────────

pub async fn premium_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<EntitlementStatus>, ApiError> {
    let principal = authenticate(&state, &headers)?;
    let status = state.service.status(&principal).await?;
    Ok(Json(status))
}

// ── POST /api/video-watched ──────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoWatchedRequest {
    #[serde(default)]
    pub percent_watched: f64,
    #[serde(default)]
    pub watch_session_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoWatchedResponse {
    pub success: bool,
    pub one_time_trial_available: bool,
}

pub async fn video_watched(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<VideoWatchedRequest>,
) -> Result<Json<VideoWatchedResponse>, ApiError> {
    let principal = authenticate(&state, &headers)?;
    let outcome = state
        .service
        .record_watch_progress(&principal, body.percent_watched, body.watch_session_id)
        .await?;
    Ok(Json(VideoWatchedResponse {
        success: outcome.granted,
        one_time_trial_available: outcome.trial_available,
    }))
}

// ── POST /api/consume-trial ──────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ConsumeTrialRequest {
    pub feature: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumeTrialResponse {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<AccessReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trial_consumed: Option<bool>,
}

pub async fn consume_trial(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ConsumeTrialRequest>,
) -> Result<Json<ConsumeTrialResponse>, ApiError> {
    let principal = authenticate(&state, &headers)?;
    let feature: FeatureTag = body
        .feature
        .parse()
        .map_err(|_| ApiError::InvalidFeature(body.feature.clone()))?;

    let outcome = state.service.consume(&principal, feature).await?;
    Ok(Json(ConsumeTrialResponse {
        allowed: outcome.allowed,
        reason: outcome.reason,
        trial_consumed: outcome.trial_consumed.then_some(true),
    }))
}

// ── POST /api/process-multilayer ─────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    #[serde(default)]
    pub payload: Option<Value>,
    #[serde(default)]
    pub force_trial: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    pub ok: bool,
    pub result_url: Option<String>,
    pub message: String,
}

pub async fn process_multilayer(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ProcessRequest>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let principal = authenticate(&state, &headers)?;
    let outcome = state
        .service
        .authorize_processing(&principal, body.force_trial)
        .await?;
    if !outcome.allowed {
        return Err(ApiError::Forbidden);
    }

    // The actual multi-layer pipeline lives outside this core; the demo
    // acknowledges the admitted request and records the attempt.
    state.service.note(&principal.id, EventKind::ProcessingAttempt);
    state
        .service
        .note(&principal.id, EventKind::ProcessingCompleted);

    Ok(Json(ProcessResponse {
        ok: true,
        result_url: None,
        message: "Processed (mock): server-side multi-layer runs outside this core".to_string(),
    }))
}

// ── POST /api/upgrade ────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UpgradeResponse {
    pub plan: Plan,
}

pub async fn upgrade(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UpgradeResponse>, ApiError> {
    let principal = authenticate(&state, &headers)?;
    let plan = state.service.upgrade(&principal).await?;
    Ok(Json(UpgradeResponse { plan }))
}

// ── PUT /api/admin/principals/{id}/plan ──────────────────────────

#[derive(Debug, Deserialize)]
pub struct AdminSetPlanRequest {
    pub plan: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSetPlanResponse {
    pub principal_id: String,
    pub plan: Plan,
}

/// Admin override for a principal's plan, guarded by the `x-admin-key`
/// header. Only the upward transition exists: this core has no downgrade
/// path, so `free` is rejected along with unknown plans.
pub async fn admin_set_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<AdminSetPlanRequest>,
) -> Result<Json<AdminSetPlanResponse>, ApiError> {
    let supplied = headers
        .get("x-admin-key")
        .and_then(|v| v.to_str().ok());
    match (&state.admin_key, supplied) {
        (Some(expected), Some(got)) if expected.as_str() == got => {}
        _ => return Err(ApiError::Forbidden),
    }

    let plan: Plan = body
        .plan
        .parse()
        .map_err(|_| ApiError::InvalidPlan(body.plan.clone()))?;
    if plan != Plan::Premium {
        return Err(ApiError::InvalidPlan(body.plan));
    }

    let principal = Principal::new(id.as_str());
    let plan = state.service.upgrade(&principal).await?;
    Ok(Json(AdminSetPlanResponse {
        principal_id: id,
        plan,
    }))
}
