use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::domain::{ApplicationRecord, ProfileId, StepId};
use super::flow::Navigation;
use super::masks::Mask;
use super::repository::ApplicationRepository;
use super::service::{
    IntakeService, IntakeServiceError, SaveRequest, StepOutcome, SubmitRequest,
    GENERIC_ERROR_MESSAGE,
};
use super::steps::StepValues;
use super::validation::{self, ValidationErrors};
use crate::admin::ProfileRepository;
use crate::intake::repository::StaffNotifier;

pub const SAVED_MESSAGE: &str = "Dados salvos com sucesso";
pub const SUBMITTED_MESSAGE: &str = "Etapa concluída com sucesso";

/// Calls a mounted form makes against the backend.
pub trait IntakeApi: Send + Sync {
    fn get_form(&self, profile_id: &ProfileId)
        -> Result<Option<ApplicationRecord>, IntakeServiceError>;
    fn save(&self, request: SaveRequest) -> Result<StepOutcome, IntakeServiceError>;
    fn submit(&self, request: SubmitRequest) -> Result<StepOutcome, IntakeServiceError>;
}

impl<R, P, N> IntakeApi for IntakeService<R, P, N>
where
    R: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
    N: StaffNotifier + 'static,
{
    fn get_form(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Option<ApplicationRecord>, IntakeServiceError> {
        IntakeService::get_form(self, profile_id)
    }

    fn save(&self, request: SaveRequest) -> Result<StepOutcome, IntakeServiceError> {
        IntakeService::save(self, request)
    }

    fn submit(&self, request: SubmitRequest) -> Result<StepOutcome, IntakeServiceError> {
        IntakeService::submit(self, request)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == ToastKind::Error
    }
}

/// Result of a form action. `navigation` is only set when the mutation resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct FormFeedback {
    pub toast: Toast,
    pub navigation: Option<Navigation>,
    pub errors: ValidationErrors,
}

impl FormFeedback {
    fn failed(toast: Toast, errors: ValidationErrors) -> Self {
        Self {
            toast,
            navigation: None,
            errors,
        }
    }
}

/// Headless controller for one mounted wizard step.
pub struct StepForm<A> {
    api: Arc<A>,
    profile_id: ProfileId,
    step: StepId,
    persisted: StepValues,
    values: StepValues,
    errors: ValidationErrors,
}

impl<A: IntakeApi> StepForm<A> {
    /// Load defaults from the persisted record, or empty ones for a new applicant.
    pub fn mount(api: Arc<A>, profile_id: ProfileId, step: StepId) -> Result<Self, Toast> {
        let record = api
            .get_form(&profile_id)
            .map_err(|err| Toast::error(err.user_message()))?;
        let persisted = record
            .map(|record| record.section(step))
            .unwrap_or_else(|| StepValues::empty(step));

        debug!(profile_id = %profile_id, %step, "step form mounted");
        Ok(Self {
            api,
            profile_id,
            step,
            values: persisted.clone(),
            persisted,
            errors: ValidationErrors::new(),
        })
    }

    pub fn step(&self) -> StepId {
        self.step
    }

    pub fn profile_id(&self) -> &ProfileId {
        &self.profile_id
    }

    pub fn values(&self) -> &StepValues {
        &self.values
    }

    /// Typed access, used for list fields and their draft slots.
    pub fn values_mut(&mut self) -> &mut StepValues {
        &mut self.values
    }

    pub fn persisted(&self) -> &StepValues {
        &self.persisted
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Set a scalar field by its wire name, applying the field's input mask.
    pub fn set_text(&mut self, field: &str, value: &str) -> Result<(), IntakeServiceError> {
        let step = self.step;
        let payload = |source| IntakeServiceError::Payload { step, source };

        let mut json = self.values.to_json().map_err(payload)?;
        let text = match Mask::for_field(field) {
            Some(mask) => mask.apply(value),
            None => value.to_string(),
        };
        if let Value::Object(fields) = &mut json {
            fields.insert(field.to_string(), Value::String(text));
        }

        let mut updated = StepValues::from_json(step, json).map_err(payload)?;
        carry_drafts(&mut updated, &self.values);
        self.values = updated;
        Ok(())
    }

    /// Current text of a scalar field, empty when unset.
    pub fn text(&self, field: &str) -> String {
        self.values
            .to_json()
            .ok()
            .and_then(|json| match json.get(field) {
                Some(Value::String(text)) => Some(text.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Persist without validation. With a redirect, blank fields fall back to
    /// the persisted values before the call.
    pub fn save(&mut self, redirect_step: Option<StepId>) -> FormFeedback {
        let values = match redirect_step {
            Some(_) => match self.values.fill_blanks_from(&self.persisted) {
                Ok(values) => values,
                Err(_) => {
                    return FormFeedback::failed(
                        Toast::error(GENERIC_ERROR_MESSAGE),
                        ValidationErrors::new(),
                    )
                }
            },
            None => self.values.clone(),
        };

        let request = SaveRequest {
            profile_id: self.profile_id.clone(),
            values,
            redirect_step,
        };
        match self.api.save(request) {
            Ok(outcome) => self.resolved(outcome, SAVED_MESSAGE),
            Err(err) => FormFeedback::failed(Toast::error(err.user_message()), ValidationErrors::new()),
        }
    }

    /// Validate locally, then submit. Invalid values never reach the backend.
    pub fn submit(&mut self, is_editing: bool) -> FormFeedback {
        if let Err(errors) = validation::validate_step(&self.values) {
            self.errors = errors.clone();
            let message = IntakeServiceError::Validation(errors.clone()).user_message();
            return FormFeedback::failed(Toast::error(message), errors);
        }

        let request = SubmitRequest {
            profile_id: self.profile_id.clone(),
            values: self.values.clone(),
            is_editing,
        };
        match self.api.submit(request) {
            Ok(outcome) => self.resolved(outcome, SUBMITTED_MESSAGE),
            Err(err) => {
                let errors = match &err {
                    IntakeServiceError::Validation(errors) => errors.clone(),
                    _ => ValidationErrors::new(),
                };
                self.errors = errors.clone();
                FormFeedback::failed(Toast::error(err.user_message()), errors)
            }
        }
    }

    fn resolved(&mut self, outcome: StepOutcome, message: &str) -> FormFeedback {
        self.persisted = outcome.record.section(self.step);
        self.errors = ValidationErrors::new();
        FormFeedback {
            toast: Toast::success(message),
            navigation: outcome.navigation,
            errors: ValidationErrors::new(),
        }
    }
}

/// Draft slots are not part of the wire format, so they are restored after a
/// JSON round trip.
fn carry_drafts(target: &mut StepValues, source: &StepValues) {
    match (target, source) {
        (StepValues::PersonalData(to), StepValues::PersonalData(from)) => {
            to.other_names.set_draft(from.other_names.draft().clone());
        }
        (StepValues::ContactAddress(to), StepValues::ContactAddress(from)) => {
            to.other_phones.set_draft(from.other_phones.draft().clone());
            to.other_emails.set_draft(from.other_emails.draft().clone());
        }
        (StepValues::AboutTravel(to), StepValues::AboutTravel(from)) => {
            to.travel_companions
                .set_draft(from.travel_companions.draft().clone());
        }
        (StepValues::Family(to), StepValues::Family(from)) => {
            to.relatives_in_the_usa
                .set_draft(from.relatives_in_the_usa.draft().clone());
        }
        (StepValues::WorkEducation(to), StepValues::WorkEducation(from)) => {
            to.previous_jobs.set_draft(from.previous_jobs.draft().clone());
            to.courses.set_draft(from.courses.draft().clone());
        }
        _ => {}
    }
}
