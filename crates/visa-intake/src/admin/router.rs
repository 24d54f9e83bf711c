use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::{BannerId, ClientCategory};
use super::forms::{BannerInput, ProfileInput};
use super::repository::{BannerRepository, ProfileRepository};
use super::service::{AdminService, AdminServiceError};
use super::table::TableQuery;
use crate::intake::domain::ProfileId;
use crate::intake::repository::ApplicationRepository;
use crate::intake::service::GENERIC_ERROR_MESSAGE;

type SharedService<P, A, B> = Arc<AdminService<P, A, B>>;

#[derive(Debug, Deserialize)]
pub struct ProspectsQuery {
    pub category: ClientCategory,
}

/// Router builder exposing the staff dashboard.
pub fn admin_router<P, A, B>(service: SharedService<P, A, B>) -> Router
where
    P: ProfileRepository + 'static,
    A: ApplicationRepository + 'static,
    B: BannerRepository + 'static,
{
    Router::new()
        .route("/api/v1/admin/clients", get(table_handler::<P, A, B>))
        .route("/api/v1/admin/clients/export", get(export_handler::<P, A, B>))
        .route(
            "/api/v1/admin/clients/:profile_id",
            get(details_handler::<P, A, B>),
        )
        .route("/api/v1/admin/prospects", get(prospects_handler::<P, A, B>))
        .route("/api/v1/admin/profiles", post(profile_handler::<P, A, B>))
        .route(
            "/api/v1/admin/banners",
            get(banners_handler::<P, A, B>).post(create_banner_handler::<P, A, B>),
        )
        .route(
            "/api/v1/admin/banners/:banner_id",
            put(update_banner_handler::<P, A, B>),
        )
        .with_state(service)
}

pub(crate) async fn table_handler<P, A, B>(
    State(service): State<SharedService<P, A, B>>,
    Query(query): Query<TableQuery>,
) -> Response
where
    P: ProfileRepository + 'static,
    A: ApplicationRepository + 'static,
    B: BannerRepository + 'static,
{
    match service.client_table(&query) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn export_handler<P, A, B>(
    State(service): State<SharedService<P, A, B>>,
    Query(query): Query<TableQuery>,
) -> Response
where
    P: ProfileRepository + 'static,
    A: ApplicationRepository + 'static,
    B: BannerRepository + 'static,
{
    match service.export_csv(&query) {
        Ok(csv) => {
            let filename = match query.category {
                Some(category) => format!("clientes-{}.csv", category.slug()),
                None => "clientes.csv".to_string(),
            };
            let headers = [
                (header::CONTENT_TYPE, mime::TEXT_CSV_UTF_8.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{filename}\""),
                ),
            ];
            (StatusCode::OK, headers, csv).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn details_handler<P, A, B>(
    State(service): State<SharedService<P, A, B>>,
    Path(profile_id): Path<String>,
) -> Response
where
    P: ProfileRepository + 'static,
    A: ApplicationRepository + 'static,
    B: BannerRepository + 'static,
{
    match service.client_details(&ProfileId(profile_id)) {
        Ok(details) => (StatusCode::OK, axum::Json(details)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn prospects_handler<P, A, B>(
    State(service): State<SharedService<P, A, B>>,
    Query(query): Query<ProspectsQuery>,
) -> Response
where
    P: ProfileRepository + 'static,
    A: ApplicationRepository + 'static,
    B: BannerRepository + 'static,
{
    match service.prospects(query.category) {
        Ok(rows) => (StatusCode::OK, axum::Json(rows)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn profile_handler<P, A, B>(
    State(service): State<SharedService<P, A, B>>,
    axum::Json(input): axum::Json<ProfileInput>,
) -> Response
where
    P: ProfileRepository + 'static,
    A: ApplicationRepository + 'static,
    B: BannerRepository + 'static,
{
    let creating = input.id.is_none();
    match service.upsert_profile(input) {
        Ok(profile) => {
            let status = if creating {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, axum::Json(profile)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn banners_handler<P, A, B>(
    State(service): State<SharedService<P, A, B>>,
) -> Response
where
    P: ProfileRepository + 'static,
    A: ApplicationRepository + 'static,
    B: BannerRepository + 'static,
{
    match service.banners() {
        Ok(banners) => (StatusCode::OK, axum::Json(banners)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_banner_handler<P, A, B>(
    State(service): State<SharedService<P, A, B>>,
    axum::Json(input): axum::Json<BannerInput>,
) -> Response
where
    P: ProfileRepository + 'static,
    A: ApplicationRepository + 'static,
    B: BannerRepository + 'static,
{
    match service.create_banner(input) {
        Ok(banner) => (StatusCode::CREATED, axum::Json(banner)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_banner_handler<P, A, B>(
    State(service): State<SharedService<P, A, B>>,
    Path(banner_id): Path<String>,
    axum::Json(input): axum::Json<BannerInput>,
) -> Response
where
    P: ProfileRepository + 'static,
    A: ApplicationRepository + 'static,
    B: BannerRepository + 'static,
{
    match service.update_banner(&BannerId(banner_id), input) {
        Ok(banner) => (StatusCode::OK, axum::Json(banner)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: AdminServiceError) -> Response {
    match err {
        AdminServiceError::Validation(errors) => {
            let message = errors
                .first()
                .map(|field| field.message.clone())
                .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
            let payload = json!({
                "error": message,
                "fields": errors,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        AdminServiceError::NotFound(message) => {
            let payload = json!({ "error": message });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        other => {
            error!(error = %other, "admin request failed");
            let payload = json!({ "error": GENERIC_ERROR_MESSAGE });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
