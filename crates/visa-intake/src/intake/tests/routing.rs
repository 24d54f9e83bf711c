use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::config::IntakeConfig;
use crate::intake::router::intake_router;
use crate::intake::repository::ApplicationRepository;
use crate::intake::service::{IntakeService, GENERIC_ERROR_MESSAGE, PROFILE_NOT_FOUND_MESSAGE};

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("json body")))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request")
}

#[tokio::test]
async fn submit_route_returns_next_step_navigation() {
    let (service, _, _) = build_service();
    let router = intake_router(Arc::new(service));

    let response = router
        .oneshot(post_json(
            "/api/v1/intake/cli-001/steps/0/submit",
            json!({ "values": personal_data_json(), "isEditing": false }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["profileId"], json!("cli-001"));
    assert_eq!(body["step"], json!("personal_data"));
    assert_eq!(body["navigation"]["kind"], json!("step"));
    assert_eq!(body["navigation"]["step"], json!(1));
    assert_eq!(body["navigation"]["url"], json!("/formulario/cli-001?formStep=1"));
}

#[tokio::test]
async fn submit_route_rejects_invalid_values_with_field_errors() {
    let (service, _, _) = build_service();
    let router = intake_router(Arc::new(service));
    let mut values = personal_data_json();
    values["cpf"] = json!("111.111.111-11");

    let response = router
        .oneshot(post_json(
            "/api/v1/intake/cli-001/steps/personal_data/submit",
            json!({ "values": values }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], json!("CPF inválido"));
    assert_eq!(body["fields"][0]["path"], json!("cpf"));
}

#[tokio::test]
async fn submit_route_returns_not_found_message_for_missing_record() {
    let (service, _, _) = build_service();
    let router = intake_router(Arc::new(service));

    let response = router
        .oneshot(post_json(
            "/api/v1/intake/cli-001/steps/10/submit",
            json!({ "values": security().to_json().expect("serializes") }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("message")
        .starts_with("Formulário não encontrado"));
}

#[tokio::test]
async fn save_route_accepts_redirect_step() {
    let (service, _, _) = build_service();
    let router = intake_router(Arc::new(service));

    let response = router
        .oneshot(post_json(
            "/api/v1/intake/cli-001/steps/us_contact/save",
            json!({ "values": { "contactName": "John" }, "redirectStep": 2 }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["navigation"]["url"], json!("/formulario/cli-001?formStep=2"));
}

#[tokio::test]
async fn unknown_step_is_not_found() {
    let (service, _, _) = build_service();
    let router = intake_router(Arc::new(service));

    let response = router
        .oneshot(post_json(
            "/api/v1/intake/cli-001/steps/42/save",
            json!({ "values": {} }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn form_route_returns_null_for_new_applicants() {
    let (service, _, _) = build_service();
    let router = intake_router(Arc::new(service));

    let response = router
        .oneshot(get("/api/v1/intake/cli-001/form"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await, Value::Null);
}

#[tokio::test]
async fn birth_date_route_reports_unknown_profiles() {
    let (service, _, _) = build_service();
    let router = intake_router(Arc::new(service));

    let response = router
        .oneshot(get("/api/v1/intake/nobody/birth-date"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], json!("Perfil não encontrado"));
}

#[tokio::test]
async fn save_route_refuses_applicants_without_a_profile() {
    let (service, applications, _) = build_service();
    let router = intake_router(Arc::new(service));

    let response = router
        .oneshot(post_json(
            "/api/v1/intake/nobody-999/steps/us_contact/save",
            json!({ "values": { "contactName": "John Smith" } }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], json!(PROFILE_NOT_FOUND_MESSAGE));
    assert!(applications.list().expect("list").is_empty());
}

#[tokio::test]
async fn repository_outage_is_a_generic_internal_error() {
    let service = IntakeService::new(
        Arc::new(UnavailableApplications),
        Arc::new(MemoryProfiles::default()),
        Arc::new(MemoryNotifier::default()),
        IntakeConfig::default(),
    );
    let router = intake_router(Arc::new(service));

    let response = router
        .oneshot(get("/api/v1/intake/cli-001/flow"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], json!(GENERIC_ERROR_MESSAGE));
}
