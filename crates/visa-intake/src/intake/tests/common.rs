use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::{json, Value};

use crate::admin::{ClientCategory, Profile, ProfileRepository};
use crate::config::IntakeConfig;
use crate::intake::domain::{ApplicationRecord, ProfileId, StepId};
use crate::intake::form::IntakeApi;
use crate::intake::repository::{
    ApplicationRepository, NotifyError, RepositoryError, StaffNotice, StaffNotifier,
};
use crate::intake::service::{
    IntakeService, IntakeServiceError, SaveRequest, StepOutcome, SubmitRequest,
};
use crate::intake::steps::StepValues;

pub(super) type TestService = IntakeService<MemoryApplications, MemoryProfiles, MemoryNotifier>;

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
}

pub(super) fn profile_id() -> ProfileId {
    ProfileId("cli-001".to_string())
}

pub(super) fn profile(id: &ProfileId, birth_date: Option<NaiveDate>) -> Profile {
    Profile {
        id: id.clone(),
        name: "Maria Souza".to_string(),
        email: "maria@example.com".to_string(),
        phone: "(11) 98765-4321".to_string(),
        cpf: "462.835.518-58".to_string(),
        birth_date,
        category: ClientCategory::AmericanVisa,
        is_prospect: false,
        visa: Default::default(),
        passport: Default::default(),
        eta: Default::default(),
        created_at: Utc
            .with_ymd_and_hms(2026, 1, 5, 12, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

pub(super) fn personal_data_json() -> Value {
    json!({
        "firstName": "Maria",
        "lastName": "Souza",
        "cpf": "46283551858",
        "otherNamesConfirmation": "Não",
        "sex": "Feminino",
        "maritalStatus": "Solteiro",
        "birthDate": "1990-04-12",
        "birthCity": "São Paulo",
        "birthState": "SP",
        "birthCountry": "Brasil",
        "originCountry": "Brasil",
        "otherNationalityConfirmation": "Não"
    })
}

pub(super) fn personal_data() -> StepValues {
    StepValues::from_json(StepId::PersonalData, personal_data_json()).expect("valid fixture")
}

pub(super) fn married_personal_data() -> StepValues {
    let mut json = personal_data_json();
    json["maritalStatus"] = json!("Casado");
    StepValues::from_json(StepId::PersonalData, json).expect("valid fixture")
}

pub(super) fn minor_personal_data() -> StepValues {
    let mut json = personal_data_json();
    json["maritalStatus"] = json!("Casado");
    json["birthDate"] = json!("2012-02-01");
    StepValues::from_json(StepId::PersonalData, json).expect("valid fixture")
}

pub(super) fn family() -> StepValues {
    StepValues::from_json(
        StepId::Family,
        json!({
            "fatherName": "José Souza",
            "fatherInTheUsaConfirmation": "Não",
            "motherName": "Ana Souza",
            "motherInTheUsaConfirmation": "Não",
            "relativesInTheUsaConfirmation": "Não"
        }),
    )
    .expect("valid fixture")
}

pub(super) fn security() -> StepValues {
    let mut json = json!({});
    for key in [
        "contagiousDiseaseConfirmation",
        "mentalDisorderConfirmation",
        "drugUseConfirmation",
        "arrestedConfirmation",
        "controlledSubstancesConfirmation",
        "moneyLaunderingConfirmation",
        "humanTraffickingConfirmation",
        "terrorismConfirmation",
        "visaFraudConfirmation",
        "deportedConfirmation",
    ] {
        json[key] = json!("Não");
    }
    StepValues::from_json(StepId::Security, json).expect("valid fixture")
}

pub(super) fn us_contact_draft() -> StepValues {
    StepValues::from_json(
        StepId::UsContact,
        json!({ "contactName": "John Smith", "contactAddress": "1 Main St, Orlando" }),
    )
    .expect("valid fixture")
}

pub(super) fn build_service() -> (TestService, Arc<MemoryApplications>, Arc<MemoryNotifier>) {
    let applications = Arc::new(MemoryApplications::default());
    let profiles = Arc::new(MemoryProfiles::default());
    profiles
        .upsert(profile(&profile_id(), None))
        .expect("seed profile");
    let notifier = Arc::new(MemoryNotifier::default());
    let service = IntakeService::new(
        applications.clone(),
        profiles,
        notifier.clone(),
        IntakeConfig::default(),
    )
    .with_reference_date(today());
    (service, applications, notifier)
}

pub(super) fn stored(applications: &MemoryApplications, id: &ProfileId) -> ApplicationRecord {
    applications
        .fetch(id)
        .expect("fetch succeeds")
        .expect("record present")
}

#[derive(Default, Clone)]
pub(super) struct MemoryApplications {
    records: Arc<Mutex<HashMap<ProfileId, ApplicationRecord>>>,
}

impl ApplicationRepository for MemoryApplications {
    fn fetch(&self, id: &ProfileId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn upsert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.profile_id.clone(), record.clone());
        Ok(record)
    }

    fn list(&self) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryProfiles {
    profiles: Arc<Mutex<HashMap<ProfileId, Profile>>>,
}

impl ProfileRepository for MemoryProfiles {
    fn fetch(&self, id: &ProfileId) -> Result<Option<Profile>, RepositoryError> {
        let guard = self.profiles.lock().expect("profile mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn upsert(&self, profile: Profile) -> Result<Profile, RepositoryError> {
        let mut guard = self.profiles.lock().expect("profile mutex poisoned");
        guard.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    fn list(&self) -> Result<Vec<Profile>, RepositoryError> {
        let guard = self.profiles.lock().expect("profile mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    notices: Arc<Mutex<Vec<StaffNotice>>>,
}

impl MemoryNotifier {
    pub(super) fn notices(&self) -> Vec<StaffNotice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }
}

impl StaffNotifier for MemoryNotifier {
    fn notify(&self, notice: StaffNotice) -> Result<(), NotifyError> {
        self.notices
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct OfflineNotifier;

impl StaffNotifier for OfflineNotifier {
    fn notify(&self, _notice: StaffNotice) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp offline".to_string()))
    }
}

pub(super) struct UnavailableApplications;

impl ApplicationRepository for UnavailableApplications {
    fn fetch(&self, _id: &ProfileId) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn upsert(&self, _record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Call recorded by [`RecordingApi`].
#[derive(Debug, Clone)]
pub(super) enum ApiCall {
    Save(SaveRequest),
    Submit(SubmitRequest),
}

/// Fake backend that records every mutation and answers from a fixed record.
pub(super) struct RecordingApi {
    record: Option<ApplicationRecord>,
    calls: Mutex<Vec<ApiCall>>,
    failure: Option<fn() -> IntakeServiceError>,
}

impl RecordingApi {
    pub(super) fn new(record: Option<ApplicationRecord>) -> Self {
        Self {
            record,
            calls: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    pub(super) fn failing(failure: fn() -> IntakeServiceError) -> Self {
        Self {
            record: None,
            calls: Mutex::new(Vec::new()),
            failure: Some(failure),
        }
    }

    pub(super) fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    fn respond(&self, values: StepValues) -> Result<StepOutcome, IntakeServiceError> {
        if let Some(failure) = self.failure {
            return Err(failure());
        }
        let mut record = self
            .record
            .clone()
            .unwrap_or_else(|| ApplicationRecord::new(profile_id(), Utc::now()));
        let step = values.step();
        record.apply(values);
        Ok(StepOutcome {
            record,
            step,
            navigation: None,
        })
    }
}

impl IntakeApi for RecordingApi {
    fn get_form(
        &self,
        _profile_id: &ProfileId,
    ) -> Result<Option<ApplicationRecord>, IntakeServiceError> {
        Ok(self.record.clone())
    }

    fn save(&self, request: SaveRequest) -> Result<StepOutcome, IntakeServiceError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(ApiCall::Save(request.clone()));
        let redirect = request.redirect_step;
        let mut outcome = self.respond(request.values)?;
        outcome.navigation = redirect.map(crate::intake::flow::Navigation::Step);
        Ok(outcome)
    }

    fn submit(&self, request: SubmitRequest) -> Result<StepOutcome, IntakeServiceError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(ApiCall::Submit(request.clone()));
        self.respond(request.values)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
