use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::admin::domain::{
    Banner, BannerId, BannerImage, ClientCategory, EtaTracking, PassportTracking, Profile,
    ShippingStatus, VisaStatus, VisaTracking,
};
use crate::admin::forms::{BannerInput, ProfileInput};
use crate::admin::repository::{BannerRepository, ProfileRepository};
use crate::admin::service::AdminService;
use crate::config::AdminConfig;
use crate::intake::domain::{ApplicationRecord, ProfileId, StepId};
use crate::intake::repository::{ApplicationRepository, RepositoryError};

pub(super) type TestService = AdminService<MemoryProfiles, MemoryApplications, MemoryBanners>;

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
}

fn client(id: &str, name: &str, category: ClientCategory, order: i64) -> Profile {
    Profile {
        id: ProfileId(id.to_string()),
        name: name.to_string(),
        email: format!("{id}@example.com"),
        phone: "(11) 98765-4321".to_string(),
        cpf: String::new(),
        birth_date: None,
        category,
        is_prospect: false,
        visa: VisaTracking::default(),
        passport: PassportTracking::default(),
        eta: EtaTracking::default(),
        created_at: Utc
            .with_ymd_and_hms(2026, 1, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp")
            + Duration::minutes(order),
    }
}

/// Two visa clients (one overdue), one passport client, and one E-TA prospect.
pub(super) fn seeded_profiles() -> Vec<Profile> {
    let mut overdue = client("cli-ana", "Ana Ribeiro", ClientCategory::AmericanVisa, 1);
    overdue.visa.status = VisaStatus::Scheduled;
    overdue.visa.scheduled_on = Some(today() - Duration::days(31));

    let mut recent = client("cli-bruno", "Bruno Lima", ClientCategory::AmericanVisa, 2);
    recent.visa.scheduled_on = Some(today() - Duration::days(3));

    let mut passport = client("cli-carla", "Carla Dias", ClientCategory::Passport, 3);
    passport.cpf = "462.835.518-58".to_string();
    passport.passport.shipping = ShippingStatus::Sent;
    passport.passport.sent_on = Some(today() - Duration::days(22));

    let mut prospect = client("cli-davi", "Davi Nunes", ClientCategory::Eta, 4);
    prospect.is_prospect = true;

    vec![overdue, recent, passport, prospect]
}

pub(super) fn build_service() -> (
    TestService,
    Arc<MemoryProfiles>,
    Arc<MemoryApplications>,
    Arc<MemoryBanners>,
) {
    let profiles = Arc::new(MemoryProfiles::default());
    for profile in seeded_profiles() {
        profiles.upsert(profile).expect("seed profile");
    }
    let applications = Arc::new(MemoryApplications::default());
    let mut record = ApplicationRecord::new(ProfileId("cli-ana".to_string()), Utc::now());
    record.completed_steps.insert(StepId::PersonalData);
    record.completed_steps.insert(StepId::ContactAddress);
    applications.upsert(record).expect("seed application");
    let banners = Arc::new(MemoryBanners::default());

    let service = AdminService::new(
        profiles.clone(),
        applications.clone(),
        banners.clone(),
        AdminConfig::default(),
    )
    .with_reference_date(today());
    (service, profiles, applications, banners)
}

pub(super) fn profile_input() -> ProfileInput {
    ProfileInput {
        id: None,
        name: "Elisa Prado".to_string(),
        email: "Elisa@Example.com ".to_string(),
        phone: "11987654321".to_string(),
        cpf: "46283551858".to_string(),
        birth_date: NaiveDate::from_ymd_opt(1988, 7, 3),
        category: Some(ClientCategory::Passport),
        is_prospect: true,
        visa: VisaTracking::default(),
        passport: PassportTracking::default(),
        eta: EtaTracking::default(),
    }
}

pub(super) fn banner_input() -> BannerInput {
    BannerInput {
        title: "Promoção de férias".to_string(),
        link: "https://example.com/ferias".to_string(),
        image: BannerImage {
            key: "banners/ferias.png".to_string(),
            url: "https://cdn.example.com/banners/ferias.png".to_string(),
            content_type: String::new(),
        },
        active: true,
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
pub(super) struct MemoryBanners {
    banners: Arc<Mutex<HashMap<BannerId, Banner>>>,
}

impl BannerRepository for MemoryBanners {
    fn insert(&self, banner: Banner) -> Result<Banner, RepositoryError> {
        let mut guard = self.banners.lock().expect("banner mutex poisoned");
        if guard.contains_key(&banner.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(banner.id.clone(), banner.clone());
        Ok(banner)
    }

    fn update(&self, banner: Banner) -> Result<Banner, RepositoryError> {
        let mut guard = self.banners.lock().expect("banner mutex poisoned");
        if !guard.contains_key(&banner.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(banner.id.clone(), banner.clone());
        Ok(banner)
    }

    fn fetch(&self, id: &BannerId) -> Result<Option<Banner>, RepositoryError> {
        let guard = self.banners.lock().expect("banner mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Banner>, RepositoryError> {
        let guard = self.banners.lock().expect("banner mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}
