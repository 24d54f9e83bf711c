use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{ApplicationRecord, ProfileId, StepId};
use super::flow::{FlowContext, FlowView, Navigation, NavigationView, StepFlow};
use super::repository::{
    ApplicationRepository, NotifyError, RepositoryError, StaffNotice, StaffNotifier,
};
use super::steps::StepValues;
use super::validation::{self, ValidationErrors};
use crate::admin::ProfileRepository;
use crate::config::IntakeConfig;

pub const GENERIC_ERROR_MESSAGE: &str = "Ocorreu um erro, tente novamente mais tarde";
pub const FORM_NOT_FOUND_MESSAGE: &str =
    "Formulário não encontrado, preencha os dados pessoais primeiro";
pub const PROFILE_NOT_FOUND_MESSAGE: &str = "Perfil não encontrado";

/// Partial persist, optionally followed by a jump to any step.
#[derive(Debug, Clone)]
pub struct SaveRequest {
    pub profile_id: ProfileId,
    pub values: StepValues,
    pub redirect_step: Option<StepId>,
}

/// Full validation, persist, then advance along the step flow.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub profile_id: ProfileId,
    pub values: StepValues,
    pub is_editing: bool,
}

#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub record: ApplicationRecord,
    pub step: StepId,
    pub navigation: Option<Navigation>,
}

impl StepOutcome {
    pub fn view(&self) -> StepOutcomeView {
        StepOutcomeView {
            profile_id: self.record.profile_id.clone(),
            step: self.step,
            is_complete: self.record.is_complete,
            navigation: self
                .navigation
                .map(|navigation| navigation.view(&self.record.profile_id)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOutcomeView {
    pub profile_id: ProfileId,
    pub step: StepId,
    pub is_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation: Option<NavigationView>,
}

/// One mutex per record so a save and a submit on the same applicant never interleave.
/// Entries live only while some caller holds a lease on them.
#[derive(Debug, Default)]
struct RecordLocks {
    locks: Mutex<HashMap<ProfileId, Arc<Mutex<()>>>>,
}

impl RecordLocks {
    fn lease(&self, id: &ProfileId) -> RecordLease<'_> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        let handle = locks.entry(id.clone()).or_default().clone();
        RecordLease {
            registry: self,
            id: id.clone(),
            handle,
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

struct RecordLease<'a> {
    registry: &'a RecordLocks,
    id: ProfileId,
    handle: Arc<Mutex<()>>,
}

impl RecordLease<'_> {
    fn lock(&self) -> MutexGuard<'_, ()> {
        self.handle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for RecordLease<'_> {
    fn drop(&mut self) {
        let mut locks = self
            .registry
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Clones are only handed out under the registry lock: two means the map and us.
        if Arc::strong_count(&self.handle) == 2 {
            locks.remove(&self.id);
        }
    }
}

/// Service composing the application store, profile lookup, and staff notifications.
pub struct IntakeService<R, P, N> {
    repository: Arc<R>,
    profiles: Arc<P>,
    notifier: Arc<N>,
    config: IntakeConfig,
    locks: RecordLocks,
    reference_date: Option<NaiveDate>,
}

impl<R, P, N> IntakeService<R, P, N>
where
    R: ApplicationRepository + 'static,
    P: ProfileRepository + 'static,
    N: StaffNotifier + 'static,
{
    pub fn new(repository: Arc<R>, profiles: Arc<P>, notifier: Arc<N>, config: IntakeConfig) -> Self {
        Self {
            repository,
            profiles,
            notifier,
            config,
            locks: RecordLocks::default(),
            reference_date: None,
        }
    }

    /// Pin "today" for age checks.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Utc::now().date_naive())
    }

    /// `getForm`: the persisted record, or `None` for a brand new applicant.
    pub fn get_form(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Option<ApplicationRecord>, IntakeServiceError> {
        Ok(self.repository.fetch(profile_id)?)
    }

    /// `getProfileBirthDate`.
    pub fn profile_birth_date(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Option<NaiveDate>, IntakeServiceError> {
        let profile = self
            .profiles
            .fetch(profile_id)?
            .ok_or_else(|| IntakeServiceError::NotFound(PROFILE_NOT_FOUND_MESSAGE.to_string()))?;
        Ok(profile.birth_date)
    }

    pub fn flow(&self, profile_id: &ProfileId) -> Result<FlowView, IntakeServiceError> {
        let record = self.repository.fetch(profile_id)?;
        let ctx = self.flow_context(profile_id, record.as_ref())?;
        Ok(FlowView::build(profile_id.clone(), record.as_ref(), ctx))
    }

    /// Persist a draft without validation. Creates the record on first save.
    pub fn save(&self, request: SaveRequest) -> Result<StepOutcome, IntakeServiceError> {
        let SaveRequest {
            profile_id,
            values,
            redirect_step,
        } = request;
        let step = values.step();

        let lease = self.locks.lease(&profile_id);
        let _guard = lease.lock();

        let now = Utc::now();
        let mut record = match self.repository.fetch(&profile_id)? {
            Some(record) => record,
            None => self.new_record(&profile_id, now)?,
        };

        let values = match redirect_step {
            Some(_) => values.fill_blanks_from(&record.section(step)),
            None => Ok(values),
        }
        .and_then(|values| values.normalized())
        .map_err(|source| IntakeServiceError::Payload { step, source })?;

        record.apply(values);
        record.updated_at = now;
        let record = self.repository.upsert(record)?;

        info!(profile_id = %profile_id, %step, redirect = ?redirect_step, "step draft saved");

        Ok(StepOutcome {
            record,
            step,
            navigation: redirect_step.map(Navigation::Step),
        })
    }

    /// Validate, persist, and route to the next applicable step or the summary.
    pub fn submit(&self, request: SubmitRequest) -> Result<StepOutcome, IntakeServiceError> {
        let SubmitRequest {
            profile_id,
            values,
            is_editing,
        } = request;
        let step = values.step();

        let values = values
            .normalized()
            .map_err(|source| IntakeServiceError::Payload { step, source })?;
        if let Err(errors) = validation::validate_step(&values) {
            warn!(profile_id = %profile_id, %step, errors = errors.len(), "step submission rejected");
            return Err(IntakeServiceError::Validation(errors));
        }

        let lease = self.locks.lease(&profile_id);
        let _guard = lease.lock();

        let now = Utc::now();
        let mut record = match self.repository.fetch(&profile_id)? {
            Some(record) => record,
            None if step == StepFlow::first_step() => self.new_record(&profile_id, now)?,
            None => {
                return Err(IntakeServiceError::NotFound(
                    FORM_NOT_FOUND_MESSAGE.to_string(),
                ))
            }
        };

        let was_complete = record.is_complete;
        record.apply(values);
        record.completed_steps.insert(step);
        record.updated_at = now;

        let ctx = self.flow_context(&profile_id, Some(&record))?;
        let next = StepFlow::next_step(step, ctx);
        if next.is_none() {
            record.is_complete = true;
        }

        let navigation = match next {
            _ if is_editing || was_complete => Navigation::Summary,
            Some(next) => Navigation::Step(next),
            None => Navigation::Summary,
        };

        let record = self.repository.upsert(record)?;
        info!(profile_id = %profile_id, %step, ?navigation, "step submitted");

        if record.is_complete && !was_complete {
            if let Err(err) = self.notify_completed(&record) {
                warn!(profile_id = %profile_id, error = %err, "completion notice not delivered");
            }
        }

        Ok(StepOutcome {
            record,
            step,
            navigation: Some(navigation),
        })
    }

    /// Records only exist for applicants that already have a profile.
    fn new_record(
        &self,
        profile_id: &ProfileId,
        now: DateTime<Utc>,
    ) -> Result<ApplicationRecord, IntakeServiceError> {
        if self.profiles.fetch(profile_id)?.is_none() {
            warn!(profile_id = %profile_id, "application for unknown profile refused");
            return Err(IntakeServiceError::NotFound(
                PROFILE_NOT_FOUND_MESSAGE.to_string(),
            ));
        }
        Ok(ApplicationRecord::new(profile_id.clone(), now))
    }

    #[cfg(test)]
    pub(crate) fn tracked_records(&self) -> usize {
        self.locks.len()
    }

    fn flow_context(
        &self,
        profile_id: &ProfileId,
        record: Option<&ApplicationRecord>,
    ) -> Result<FlowContext, IntakeServiceError> {
        let recorded_birth_date = record.and_then(|record| record.personal_data.birth_date);
        let fallback = match recorded_birth_date {
            Some(_) => None,
            None => self
                .profiles
                .fetch(profile_id)?
                .and_then(|profile| profile.birth_date),
        };
        Ok(FlowContext::from_record(
            record,
            fallback,
            self.today(),
            self.config.adult_age,
        ))
    }

    fn notify_completed(&self, record: &ApplicationRecord) -> Result<(), NotifyError> {
        let mut details = BTreeMap::new();
        details.insert(
            "applicant".to_string(),
            format!(
                "{} {}",
                record.personal_data.first_name, record.personal_data.last_name
            )
            .trim()
            .to_string(),
        );
        details.insert(
            "completed_steps".to_string(),
            record.completed_steps.len().to_string(),
        );
        self.notifier.notify(StaffNotice {
            template: "application_completed".to_string(),
            profile_id: record.profile_id.clone(),
            details,
        })
    }
}

/// Error raised by the intake service.
#[derive(Debug, thiserror::Error)]
pub enum IntakeServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("{0}")]
    NotFound(String),
    #[error("payload does not match step {step}: {source}")]
    Payload {
        step: StepId,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl IntakeServiceError {
    /// Text shown to the applicant: not-found messages verbatim, everything
    /// unexpected collapsed into the generic retry message.
    pub fn user_message(&self) -> String {
        match self {
            IntakeServiceError::NotFound(message) => message.clone(),
            IntakeServiceError::Repository(RepositoryError::NotFound) => {
                FORM_NOT_FOUND_MESSAGE.to_string()
            }
            IntakeServiceError::Validation(errors) => errors
                .first()
                .map(|error| error.message.clone())
                .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
            IntakeServiceError::Payload { .. } | IntakeServiceError::Repository(_) => {
                GENERIC_ERROR_MESSAGE.to_string()
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            IntakeServiceError::NotFound(_)
                | IntakeServiceError::Repository(RepositoryError::NotFound)
        )
    }
}
