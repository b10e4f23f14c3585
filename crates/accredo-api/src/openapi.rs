//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented verification routes into a single
//! OpenAPI spec served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Accredo API — Coach Credential Verification",
        version = "0.3.1",
        description = "Verification of third-party coach accreditations against the public EMCC and ICF directories.\n\nProvides:\n- **EMCC verification** by EIA reference number or pasted search-result URL\n- **ICF verification** by pasted search-result URL or claimed name, with blended name/location/level scoring\n- **Credential cache** so a previously confirmed credential verifies instantly\n- **Duplicate-claim detection** across coach accounts\n\nEvery verification outcome is returned as a verdict body with HTTP 200; non-200 responses indicate malformed requests or infrastructure failures. When automated verification cannot complete (directory outage, scraping proxy unavailable), the verdict is flagged `pendingManualReview` and onboarding may proceed.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        crate::routes::verify::verify_emcc_reference,
        crate::routes::verify::verify_emcc_url,
        crate::routes::verify::verify_icf_url,
        crate::routes::verify::verify_icf_name,
    ),
    components(
        schemas(
            crate::routes::verify::EmccReferenceVerifyRequest,
            crate::routes::verify::EmccUrlVerifyRequest,
            crate::routes::verify::IcfUrlVerifyRequest,
            crate::routes::verify::IcfNameVerifyRequest,
            crate::routes::verify::VerifyResponse,
            crate::routes::verify::MatchDetailsDto,
            crate::error::ErrorBody,
            crate::error::ErrorDetail,
        ),
    ),
    tags(
        (name = "verify", description = "Credential verification against the EMCC and ICF public directories"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router, serving the spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
