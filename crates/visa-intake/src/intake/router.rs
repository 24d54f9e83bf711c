use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use super::domain::{ProfileId, StepId};
use super::repository::{ApplicationRepository, StaffNotifier};
use super::service::{
    IntakeService, IntakeServiceError, SaveRequest, SubmitRequest, GENERIC_ERROR_MESSAGE,
};
use super::steps::StepValues;
use crate::admin::ProfileRepository;

pub const UNKNOWN_STEP_MESSAGE: &str = "Etapa não encontrada";

type SharedService<R, P, N> = Arc<IntakeService<R, P, N>>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBody {
    #[serde(default)]
    pub values: Value,
    #[serde(default)]
    pub redirect_step: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBody {
    #[serde(default)]
    pub values: Value,
    #[serde(default)]
    pub is_editing: bool,
}

/// Router builder exposing the wizard mutations and queries.
pub fn intake_router<R, P, N>(service: SharedService<R, P, N>) -> Router
where
    R: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
    N: StaffNotifier + 'static,
{
    Router::new()
        .route(
            "/api/v1/intake/:profile_id/steps/:step/save",
            post(save_handler::<R, P, N>),
        )
        .route(
            "/api/v1/intake/:profile_id/steps/:step/submit",
            post(submit_handler::<R, P, N>),
        )
        .route("/api/v1/intake/:profile_id/form", get(form_handler::<R, P, N>))
        .route(
            "/api/v1/intake/:profile_id/birth-date",
            get(birth_date_handler::<R, P, N>),
        )
        .route("/api/v1/intake/:profile_id/flow", get(flow_handler::<R, P, N>))
        .with_state(service)
}

pub(crate) async fn save_handler<R, P, N>(
    State(service): State<SharedService<R, P, N>>,
    Path((profile_id, step)): Path<(String, String)>,
    axum::Json(body): axum::Json<SaveBody>,
) -> Response
where
    R: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
    N: StaffNotifier + 'static,
{
    let Some(step) = StepId::parse(&step) else {
        return not_found(UNKNOWN_STEP_MESSAGE);
    };
    let redirect_step = match body.redirect_step.as_ref().filter(|value| !value.is_null()) {
        None => None,
        Some(raw) => match step_from_value(raw) {
            Some(target) => Some(target),
            None => return not_found(UNKNOWN_STEP_MESSAGE),
        },
    };
    let values = match decode_values(step, body.values) {
        Ok(values) => values,
        Err(err) => return error_response(err),
    };

    let request = SaveRequest {
        profile_id: ProfileId(profile_id),
        values,
        redirect_step,
    };
    match service.save(request) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn submit_handler<R, P, N>(
    State(service): State<SharedService<R, P, N>>,
    Path((profile_id, step)): Path<(String, String)>,
    axum::Json(body): axum::Json<SubmitBody>,
) -> Response
where
    R: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
    N: StaffNotifier + 'static,
{
    let Some(step) = StepId::parse(&step) else {
        return not_found(UNKNOWN_STEP_MESSAGE);
    };
    let values = match decode_values(step, body.values) {
        Ok(values) => values,
        Err(err) => return error_response(err),
    };

    let request = SubmitRequest {
        profile_id: ProfileId(profile_id),
        values,
        is_editing: body.is_editing,
    };
    match service.submit(request) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn form_handler<R, P, N>(
    State(service): State<SharedService<R, P, N>>,
    Path(profile_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
    N: StaffNotifier + 'static,
{
    match service.get_form(&ProfileId(profile_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn birth_date_handler<R, P, N>(
    State(service): State<SharedService<R, P, N>>,
    Path(profile_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
    N: StaffNotifier + 'static,
{
    match service.profile_birth_date(&ProfileId(profile_id)) {
        Ok(birth_date) => {
            let payload = json!({
                "birthDate": birth_date.map(|date| date.format("%Y-%m-%d").to_string()),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn flow_handler<R, P, N>(
    State(service): State<SharedService<R, P, N>>,
    Path(profile_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
    N: StaffNotifier + 'static,
{
    match service.flow(&ProfileId(profile_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

fn decode_values(step: StepId, values: Value) -> Result<StepValues, IntakeServiceError> {
    let values = if values.is_null() { json!({}) } else { values };
    StepValues::from_json(step, values).map_err(|source| IntakeServiceError::Payload { step, source })
}

fn step_from_value(raw: &Value) -> Option<StepId> {
    match raw {
        Value::Number(number) => number
            .as_u64()
            .and_then(|index| u8::try_from(index).ok())
            .and_then(StepId::from_index),
        Value::String(text) => StepId::parse(text),
        _ => None,
    }
}

fn not_found(message: &str) -> Response {
    let payload = json!({ "error": message });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

pub(crate) fn error_response(err: IntakeServiceError) -> Response {
    match err {
        IntakeServiceError::Validation(errors) => {
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
        IntakeServiceError::Payload { step, source } => {
            let payload = json!({
                "error": format!("dados inválidos para a etapa {step}"),
                "detail": source.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        err if err.is_not_found() => not_found(&err.user_message()),
        other => {
            error!(error = %other, "intake request failed");
            let payload = json!({ "error": GENERIC_ERROR_MESSAGE });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
