use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;
use visa_intake::admin::{
    AdminService, AdminServiceError, Banner, BannerId, BannerImage, BannerInput, BannerRepository,
    ClientCategory, EtaStatus, Profile, ProfileInput, ProfileRepository, ShippingStatus,
    VisaStatus,
};
use visa_intake::config::{AdminConfig, IntakeConfig};
use visa_intake::intake::{
    ApplicationRecord, ApplicationRepository, IntakeService, NotifyError, ProfileId,
    RepositoryError, StaffNotice, StaffNotifier,
};

pub(crate) type Intake =
    IntakeService<InMemoryApplicationRepository, InMemoryProfileRepository, InMemoryStaffNotifier>;
pub(crate) type Admin = AdminService<
    InMemoryProfileRepository,
    InMemoryApplicationRepository,
    InMemoryBannerRepository,
>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    records: Arc<Mutex<HashMap<ProfileId, ApplicationRecord>>>,
}

impl ApplicationRepository for InMemoryApplicationRepository {
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
pub(crate) struct InMemoryProfileRepository {
    profiles: Arc<Mutex<HashMap<ProfileId, Profile>>>,
}

impl ProfileRepository for InMemoryProfileRepository {
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
pub(crate) struct InMemoryBannerRepository {
    banners: Arc<Mutex<HashMap<BannerId, Banner>>>,
}

impl BannerRepository for InMemoryBannerRepository {
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

/// Logs staff notices and keeps them for inspection.
#[derive(Default, Clone)]
pub(crate) struct InMemoryStaffNotifier {
    notices: Arc<Mutex<Vec<StaffNotice>>>,
}

impl StaffNotifier for InMemoryStaffNotifier {
    fn notify(&self, notice: StaffNotice) -> Result<(), NotifyError> {
        info!(
            template = %notice.template,
            profile_id = %notice.profile_id,
            "staff notice queued"
        );
        let mut guard = self.notices.lock().expect("notifier mutex poisoned");
        guard.push(notice);
        Ok(())
    }
}

impl InMemoryStaffNotifier {
    pub(crate) fn notices(&self) -> Vec<StaffNotice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }
}

/// Both services wired to shared in-memory stores.
pub(crate) struct Services {
    pub(crate) intake: Arc<Intake>,
    pub(crate) admin: Arc<Admin>,
    pub(crate) notifier: Arc<InMemoryStaffNotifier>,
}

pub(crate) fn build_services(
    intake_config: IntakeConfig,
    admin_config: AdminConfig,
    reference_date: Option<NaiveDate>,
) -> Services {
    let applications = Arc::new(InMemoryApplicationRepository::default());
    let profiles = Arc::new(InMemoryProfileRepository::default());
    let banners = Arc::new(InMemoryBannerRepository::default());
    let notifier = Arc::new(InMemoryStaffNotifier::default());

    let mut intake = IntakeService::new(
        applications.clone(),
        profiles.clone(),
        notifier.clone(),
        intake_config,
    );
    let mut admin = AdminService::new(profiles, applications, banners, admin_config);
    if let Some(date) = reference_date {
        intake = intake.with_reference_date(date);
        admin = admin.with_reference_date(date);
    }

    Services {
        intake: Arc::new(intake),
        admin: Arc::new(admin),
        notifier,
    }
}

/// Sample clients and one banner so the dashboard has something to show.
pub(crate) fn seed_dashboard(admin: &Admin, today: NaiveDate) -> Result<Vec<Profile>, AdminServiceError> {
    let days_ago = |days: i64| today.checked_sub_signed(chrono::Duration::days(days));

    let mut visa = sample_input("Ana Ribeiro", "ana.ribeiro@example.com", ClientCategory::AmericanVisa);
    visa.birth_date = NaiveDate::from_ymd_opt(1991, 3, 14);
    visa.visa.status = VisaStatus::Scheduled;
    visa.visa.scheduled_on = days_ago(34);

    let mut passport = sample_input("Carla Dias", "carla.dias@example.com", ClientCategory::Passport);
    passport.cpf = "462.835.518-58".to_string();
    passport.passport.shipping = ShippingStatus::Sent;
    passport.passport.sent_on = days_ago(24);

    let mut eta = sample_input("Davi Nunes", "davi.nunes@example.com", ClientCategory::Eta);
    eta.is_prospect = true;
    eta.eta.status = EtaStatus::InAnalysis;
    eta.eta.requested_on = days_ago(5);

    let profiles = [visa, passport, eta]
        .into_iter()
        .map(|input| admin.upsert_profile(input))
        .collect::<Result<Vec<_>, _>>()?;

    admin.create_banner(BannerInput {
        title: "Agende sua entrevista".to_string(),
        link: "https://example.com/visto-americano".to_string(),
        image: BannerImage {
            key: "banners/entrevista.jpg".to_string(),
            url: "https://cdn.example.com/banners/entrevista.jpg".to_string(),
            content_type: String::new(),
        },
        active: true,
    })?;

    info!(clients = profiles.len(), "dashboard seeded");
    Ok(profiles)
}

fn sample_input(name: &str, email: &str, category: ClientCategory) -> ProfileInput {
    ProfileInput {
        id: None,
        name: name.to_string(),
        email: email.to_string(),
        phone: "11987654321".to_string(),
        cpf: String::new(),
        birth_date: None,
        category: Some(category),
        is_prospect: false,
        visa: Default::default(),
        passport: Default::default(),
        eta: Default::default(),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
