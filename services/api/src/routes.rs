use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use visa_intake::admin::{admin_router, AdminService, BannerRepository, ProfileRepository};
use visa_intake::intake::{
    intake_router, ApplicationRepository, IntakeService, StaffNotifier, StepId,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StepCatalogEntry {
    pub(crate) step: StepId,
    pub(crate) index: u8,
    pub(crate) slug: &'static str,
    pub(crate) label: &'static str,
}

pub(crate) fn with_service_routes<R, P, N, B>(
    intake: Arc<IntakeService<R, P, N>>,
    admin: Arc<AdminService<P, R, B>>,
) -> axum::Router
where
    R: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
    N: StaffNotifier + 'static,
    B: BannerRepository + 'static,
{
    intake_router(intake)
        .merge(admin_router(admin))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/intake/steps", axum::routing::get(step_catalog_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Every wizard step in order, regardless of applicability.
pub(crate) async fn step_catalog_endpoint() -> Json<Vec<StepCatalogEntry>> {
    Json(step_catalog())
}

pub(crate) fn step_catalog() -> Vec<StepCatalogEntry> {
    StepId::ALL
        .into_iter()
        .map(|step| StepCatalogEntry {
            step,
            index: step.index(),
            slug: step.slug(),
            label: step.label(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::build_services;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::NaiveDate;
    use tower::ServiceExt;
    use visa_intake::config::{AdminConfig, IntakeConfig};

    fn router() -> axum::Router {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date");
        let services = build_services(IntakeConfig::default(), AdminConfig::default(), Some(today));
        with_service_routes(services.intake, services.admin)
    }

    async fn read_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn step_catalog_lists_every_step_in_order() {
        let response = router()
            .oneshot(
                Request::get("/api/v1/intake/steps")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        let entries = body.as_array().expect("catalog array");
        assert_eq!(entries.len(), 11);
        assert_eq!(entries[0]["index"], json!(0));
        assert_eq!(entries[7]["step"], json!("partner"));
    }

    #[tokio::test]
    async fn intake_and_admin_routes_share_one_router() {
        let router = router();

        let response = router
            .clone()
            .oneshot(
                Request::get("/api/v1/admin/clients")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(
                Request::get("/api/v1/intake/nobody/flow")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["isComplete"], json!(false));
    }
}
