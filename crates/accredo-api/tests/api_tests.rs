//! Integration tests for the HTTP surface: health probes, verification
//! endpoints over stubbed directory pages, error envelopes, and the
//! OpenAPI spec route.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use accredo_api::state::AppState;
use accredo_directory::StubFetcher;

/// App with a canned directory page behind the fetcher.
fn app_with_page(html: &str) -> axum::Router {
    accredo_api::app(AppState::in_memory(Box::new(StubFetcher::page(html))))
}

/// App whose fetcher reports the scraping proxy unavailable.
fn app_without_scraping() -> axum::Router {
    accredo_api::app(AppState::in_memory(Box::new(StubFetcher::Unavailable(
        "no credential".into(),
    ))))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::http::Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn emcc_results_row(name: &str, level: &str, reference: &str) -> String {
    format!(
        "<table><tr><th>Country</th><th>Name</th><th>Level</th><th>Ref</th></tr>\
         <tr><td>UK</td><td>{name}</td><td>{level}</td><td>{reference}</td></tr></table>"
    )
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn liveness_probe() {
    let app = app_without_scraping();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health/liveness")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn readiness_probe_without_database() {
    let app = app_without_scraping();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health/readiness")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// -- EMCC verification --------------------------------------------------------

#[tokio::test]
async fn emcc_reference_verification_succeeds() {
    let page = emcc_results_row("Carole Adams", "Senior Practitioner", "EIA20230480");
    let app = app_with_page(&page);

    let response = app
        .oneshot(post_json(
            "/v1/verify/emcc/reference",
            json!({
                "coachId": "coach-1",
                "fullName": "Carole Adams",
                "eiaNumber": "EIA20230480"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["verified"], json!(true));
    assert_eq!(body["confidence"], json!(100));
    assert_eq!(body["status"], json!("verified"));
    assert_eq!(body["matchDetails"]["name"], json!("Carole Adams"));
    assert_eq!(
        body["matchDetails"]["level"],
        json!("Senior Practitioner")
    );
}

#[tokio::test]
async fn emcc_rejection_is_still_a_200_verdict() {
    let page = emcc_results_row("Bob Smith", "Practitioner", "EIA20230480");
    let app = app_with_page(&page);

    let response = app
        .oneshot(post_json(
            "/v1/verify/emcc/reference",
            json!({
                "coachId": "coach-2",
                "fullName": "Carole Adams",
                "eiaNumber": "EIA20230480"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["verified"], json!(false));
    assert_eq!(body["status"], json!("rejected"));
    assert!(body["reason"].as_str().unwrap().contains("Bob Smith"));
    assert!(body.get("matchDetails").is_none());
}

#[tokio::test]
async fn scraping_outage_yields_pending_manual_review() {
    let app = app_without_scraping();

    let response = app
        .oneshot(post_json(
            "/v1/verify/emcc/reference",
            json!({
                "coachId": "coach-3",
                "fullName": "Carole Adams",
                "eiaNumber": "EIA20230480"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["verified"], json!(false));
    assert_eq!(body["status"], json!("pending_review"));
    assert_eq!(body["pendingManualReview"], json!(true));
}

#[tokio::test]
async fn emcc_url_verification_succeeds() {
    let page = emcc_results_row("Carole Adams", "Practitioner", "EIA20230480");
    let app = app_with_page(&page);

    let response = app
        .oneshot(post_json(
            "/v1/verify/emcc/url",
            json!({
                "coachId": "coach-4",
                "fullName": "Carole Adams",
                "profileUrl": "https://www.emccglobal.org/accreditation/eia/eia-awards/?reference=EIA20230480&search=1"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["verified"], json!(true));
}

// -- ICF verification ---------------------------------------------------------

const ICF_PAGE: &str = r#"
    <div class="result">
      <a href="https://apps.coachingfederation.org/profile/912">Jane Doe</a>
      <p>London, United Kingdom</p>
      <p>PCC (2019 - 2025)</p>
    </div>"#;

#[tokio::test]
async fn icf_name_verification_succeeds() {
    let app = app_with_page(ICF_PAGE);

    let response = app
        .oneshot(post_json(
            "/v1/verify/icf/name",
            json!({
                "coachId": "coach-5",
                "fullName": "Jane Doe",
                "credentialLevel": "PCC",
                "location": "London, UK"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["verified"], json!(true));
    assert_eq!(body["confidence"], json!(100));
    assert_eq!(body["matchDetails"]["level"], json!("PCC"));
}

#[tokio::test]
async fn icf_unknown_credential_level_is_422() {
    let app = app_with_page(ICF_PAGE);

    let response = app
        .oneshot(post_json(
            "/v1/verify/icf/name",
            json!({
                "coachId": "coach-6",
                "fullName": "Jane Doe",
                "credentialLevel": "GRANDMASTER"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn icf_url_name_mismatch_is_rejected() {
    let app = app_with_page(ICF_PAGE);

    let response = app
        .oneshot(post_json(
            "/v1/verify/icf/url",
            json!({
                "coachId": "coach-7",
                "fullName": "Bob Smith",
                "profileUrl": "https://apps.coachingfederation.org/eweb/CCFDynamicPage.aspx?webcode=ccfcoachsearch&firstname=Jane&lastname=Doe",
                "location": "London, UK",
                "credentialLevel": "PCC"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["verified"], json!(false));
    assert_eq!(body["status"], json!("rejected"));
}

// -- Request framing ----------------------------------------------------------

#[tokio::test]
async fn missing_required_field_is_422() {
    let app = app_without_scraping();

    let response = app
        .oneshot(post_json(
            "/v1/verify/emcc/reference",
            json!({ "coachId": "coach-8" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// -- OpenAPI ------------------------------------------------------------------

#[tokio::test]
async fn openapi_spec_is_served() {
    let app = app_without_scraping();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["paths"]
        .as_object()
        .unwrap()
        .contains_key("/v1/verify/emcc/reference"));
}
