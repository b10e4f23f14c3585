//! # Credential Verification Routes
//!
//! One POST endpoint per verification entry point:
//!
//! | Route                         | Input                               |
//! |-------------------------------|-------------------------------------|
//! | `/v1/verify/emcc/reference`   | Bare EIA reference number           |
//! | `/v1/verify/emcc/url`         | Pasted EMCC search-result URL       |
//! | `/v1/verify/icf/url`          | Pasted ICF search-result URL        |
//! | `/v1/verify/icf/name`         | Claimed name, server-built search   |
//!
//! Every verification outcome — verified, rejected, pending manual review —
//! is a 200 with a [`VerifyResponse`] body. Non-200 responses are reserved
//! for malformed requests and infrastructure failures.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use accredo_core::{CoachId, IcfLevel, Verdict};
use accredo_verify::{EmccReferenceRequest, EmccUrlRequest, IcfNameRequest, IcfUrlRequest};

use crate::error::AppError;
use crate::state::AppState;

/// Build the verification router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/verify/emcc/reference", post(verify_emcc_reference))
        .route("/v1/verify/emcc/url", post(verify_emcc_url))
        .route("/v1/verify/icf/url", post(verify_icf_url))
        .route("/v1/verify/icf/name", post(verify_icf_name))
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Verify an EMCC award from a bare EIA reference number.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmccReferenceVerifyRequest {
    /// Coach account identifier. A `temp_` prefix marks a provisional
    /// account; verification runs but nothing is persisted.
    pub coach_id: String,
    /// Name the coach claims to hold the award under.
    pub full_name: String,
    /// EIA reference number, e.g. "EIA20230480".
    pub eia_number: String,
}

/// Verify an EMCC award from a pasted directory search-result URL.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmccUrlVerifyRequest {
    pub coach_id: String,
    pub full_name: String,
    /// Search-result URL copied from the EMCC awards directory.
    pub profile_url: String,
}

/// Verify an ICF credential from a pasted directory search-result URL.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IcfUrlVerifyRequest {
    pub coach_id: String,
    pub full_name: String,
    /// Search-result URL copied from the ICF credentialed-coach finder.
    pub profile_url: String,
    /// Location the coach practices in ("City, Country").
    pub location: String,
    /// Claimed credential level: ACC, PCC, MCC or ACTC.
    pub credential_level: String,
}

/// Verify an ICF credential from the claimed name alone.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IcfNameVerifyRequest {
    pub coach_id: String,
    pub full_name: String,
    /// Claimed credential level: ACC, PCC, MCC or ACTC.
    pub credential_level: String,
    /// Optional location for the blended match score.
    #[serde(default)]
    pub location: Option<String>,
}

/// Identity attributes found on the directory for a verified match.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetailsDto {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
}

impl From<accredo_core::MatchDetails> for MatchDetailsDto {
    fn from(details: accredo_core::MatchDetails) -> Self {
        Self {
            name: details.name,
            level: details.level,
            country: details.country,
            profile_url: details.profile_url,
        }
    }
}

/// Outcome of one verification attempt.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    /// Whether the claimed credential was confirmed.
    pub verified: bool,
    /// Confidence in the outcome, 0–100.
    pub confidence: u8,
    /// `verified`, `pending_review` or `rejected`.
    pub status: String,
    /// Attributes found on the directory, present only when verified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_details: Option<MatchDetailsDto>,
    /// User-actionable reason for a non-verified outcome.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Automated verification could not complete; a human will finish the
    /// check and the coach may proceed with onboarding meanwhile.
    #[serde(default)]
    pub pending_manual_review: bool,
}

impl From<Verdict> for VerifyResponse {
    fn from(verdict: Verdict) -> Self {
        let status = verdict.status_str().to_string();
        Self {
            verified: verdict.verified,
            confidence: verdict.confidence,
            status,
            match_details: verdict.match_details.map(MatchDetailsDto::from),
            reason: verdict.reason,
            pending_manual_review: verdict.pending_manual_review,
        }
    }
}

fn parse_level(raw: &str) -> Result<IcfLevel, AppError> {
    raw.parse::<IcfLevel>()
        .map_err(|e| AppError::Validation(e.to_string()))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/verify/emcc/reference — Verify an EMCC award by EIA reference.
#[utoipa::path(
    post,
    path = "/v1/verify/emcc/reference",
    tag = "verify",
    request_body = EmccReferenceVerifyRequest,
    responses(
        (status = 200, description = "Verification verdict", body = VerifyResponse),
        (status = 422, description = "Malformed request body", body = crate::error::ErrorBody),
    )
)]
pub async fn verify_emcc_reference(
    State(state): State<AppState>,
    Json(request): Json<EmccReferenceVerifyRequest>,
) -> Result<Json<VerifyResponse>, AppError> {
    let verdict = state
        .verifier
        .verify_emcc_by_reference(&EmccReferenceRequest {
            coach_id: CoachId::new(request.coach_id),
            full_name: request.full_name,
            eia_number: request.eia_number,
        })
        .await;
    Ok(Json(verdict.into()))
}

/// POST /v1/verify/emcc/url — Verify an EMCC award by search-result URL.
#[utoipa::path(
    post,
    path = "/v1/verify/emcc/url",
    tag = "verify",
    request_body = EmccUrlVerifyRequest,
    responses(
        (status = 200, description = "Verification verdict", body = VerifyResponse),
        (status = 422, description = "Malformed request body", body = crate::error::ErrorBody),
    )
)]
pub async fn verify_emcc_url(
    State(state): State<AppState>,
    Json(request): Json<EmccUrlVerifyRequest>,
) -> Result<Json<VerifyResponse>, AppError> {
    let verdict = state
        .verifier
        .verify_emcc_by_url(&EmccUrlRequest {
            coach_id: CoachId::new(request.coach_id),
            full_name: request.full_name,
            profile_url: request.profile_url,
        })
        .await;
    Ok(Json(verdict.into()))
}

/// POST /v1/verify/icf/url — Verify an ICF credential by search-result URL.
#[utoipa::path(
    post,
    path = "/v1/verify/icf/url",
    tag = "verify",
    request_body = IcfUrlVerifyRequest,
    responses(
        (status = 200, description = "Verification verdict", body = VerifyResponse),
        (status = 422, description = "Malformed request body or unknown credential level", body = crate::error::ErrorBody),
    )
)]
pub async fn verify_icf_url(
    State(state): State<AppState>,
    Json(request): Json<IcfUrlVerifyRequest>,
) -> Result<Json<VerifyResponse>, AppError> {
    let claimed_level = parse_level(&request.credential_level)?;
    let verdict = state
        .verifier
        .verify_icf_by_url(&IcfUrlRequest {
            coach_id: CoachId::new(request.coach_id),
            full_name: request.full_name,
            profile_url: request.profile_url,
            location: request.location,
            claimed_level,
        })
        .await;
    Ok(Json(verdict.into()))
}

/// POST /v1/verify/icf/name — Verify an ICF credential by claimed name.
#[utoipa::path(
    post,
    path = "/v1/verify/icf/name",
    tag = "verify",
    request_body = IcfNameVerifyRequest,
    responses(
        (status = 200, description = "Verification verdict", body = VerifyResponse),
        (status = 422, description = "Malformed request body or unknown credential level", body = crate::error::ErrorBody),
    )
)]
pub async fn verify_icf_name(
    State(state): State<AppState>,
    Json(request): Json<IcfNameVerifyRequest>,
) -> Result<Json<VerifyResponse>, AppError> {
    let claimed_level = parse_level(&request.credential_level)?;
    let verdict = state
        .verifier
        .verify_icf_by_name(&IcfNameRequest {
            coach_id: CoachId::new(request.coach_id),
            full_name: request.full_name,
            claimed_level,
            location: request.location,
        })
        .await;
    Ok(Json(verdict.into()))
}
