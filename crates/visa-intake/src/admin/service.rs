use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{Banner, BannerId, ClientCategory, Profile};
use super::forms::{BannerInput, ProfileInput};
use super::repository::{BannerRepository, ProfileRepository};
use super::table::{export_csv, ClientRow, ExportError, TableQuery, TableView};
use super::warnings::DateWarning;
use crate::config::AdminConfig;
use crate::intake::domain::{ApplicationRecord, ProfileId};
use crate::intake::repository::{ApplicationRepository, RepositoryError};
use crate::intake::validation::ValidationErrors;

pub const CLIENT_NOT_FOUND_MESSAGE: &str = "Cliente não encontrado";
pub const BANNER_NOT_FOUND_MESSAGE: &str = "Banner não encontrado";

/// Everything the client detail page shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDetails {
    pub profile: Profile,
    pub application: Option<ApplicationRecord>,
    pub category_label: &'static str,
    pub status: &'static str,
    pub warning: Option<DateWarning>,
    pub warning_label: Option<&'static str>,
    pub completed_steps: usize,
    pub is_complete: bool,
}

/// Staff dashboard over profiles, applications, and banners.
pub struct AdminService<P, A, B> {
    profiles: Arc<P>,
    applications: Arc<A>,
    banners: Arc<B>,
    config: AdminConfig,
    reference_date: Option<NaiveDate>,
    sequence: AtomicU64,
}

impl<P, A, B> AdminService<P, A, B>
where
    P: ProfileRepository + 'static,
    A: ApplicationRepository + 'static,
    B: BannerRepository + 'static,
{
    pub fn new(profiles: Arc<P>, applications: Arc<A>, banners: Arc<B>, config: AdminConfig) -> Self {
        Self {
            profiles,
            applications,
            banners,
            config,
            reference_date: None,
            sequence: AtomicU64::new(1),
        }
    }

    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    fn today(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Utc::now().date_naive())
    }

    fn rows(&self) -> Result<Vec<ClientRow>, AdminServiceError> {
        let today = self.today();
        let mut profiles = self.profiles.list()?;
        profiles.sort_by(|left, right| left.created_at.cmp(&right.created_at));
        Ok(profiles
            .iter()
            .map(|profile| ClientRow::from_profile(profile, today, self.config.warnings))
            .collect())
    }

    pub fn client_table(&self, query: &TableQuery) -> Result<TableView, AdminServiceError> {
        Ok(TableView::build(query, self.rows()?))
    }

    /// `getClientDetails`.
    pub fn client_details(&self, profile_id: &ProfileId) -> Result<ClientDetails, AdminServiceError> {
        let profile = self
            .profiles
            .fetch(profile_id)?
            .ok_or_else(|| AdminServiceError::NotFound(CLIENT_NOT_FOUND_MESSAGE.to_string()))?;
        let application = self.applications.fetch(profile_id)?;
        let warning = DateWarning::evaluate(
            profile.tracked_date(),
            self.today(),
            self.config.warnings,
        );

        Ok(ClientDetails {
            category_label: profile.category.label(),
            status: profile.status_label(),
            warning,
            warning_label: warning.map(DateWarning::label),
            completed_steps: application
                .as_ref()
                .map(|record| record.completed_steps.len())
                .unwrap_or(0),
            is_complete: application
                .as_ref()
                .map(|record| record.is_complete)
                .unwrap_or(false),
            application,
            profile,
        })
    }

    /// `getProspectsClients`.
    pub fn prospects(&self, category: ClientCategory) -> Result<Vec<ClientRow>, AdminServiceError> {
        let query = TableQuery {
            prospects: Some(true),
            ..TableQuery::for_category(category)
        };
        Ok(query.apply(self.rows()?))
    }

    pub fn export_csv(&self, query: &TableQuery) -> Result<String, AdminServiceError> {
        let view = self.client_table(query)?;
        let csv = export_csv(&view)?;
        info!(rows = view.total, category = ?query.category, "client table exported");
        Ok(csv)
    }

    pub fn upsert_profile(&self, input: ProfileInput) -> Result<Profile, AdminServiceError> {
        if let Err(errors) = input.validate() {
            warn!(errors = errors.len(), "profile form rejected");
            return Err(AdminServiceError::Validation(errors));
        }

        let (id, created_at) = match input.id.clone() {
            Some(id) => {
                let existing = self.profiles.fetch(&id)?.ok_or_else(|| {
                    AdminServiceError::NotFound(CLIENT_NOT_FOUND_MESSAGE.to_string())
                })?;
                (id, existing.created_at)
            }
            None => (self.next_profile_id()?, Utc::now()),
        };

        let profile = self.profiles.upsert(input.into_profile(id, created_at)?)?;
        info!(profile_id = %profile.id, category = profile.category.slug(), "profile saved");
        Ok(profile)
    }

    pub fn banners(&self) -> Result<Vec<Banner>, AdminServiceError> {
        let mut banners = self.banners.list()?;
        banners.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(banners)
    }

    pub fn create_banner(&self, input: BannerInput) -> Result<Banner, AdminServiceError> {
        let now = Utc::now();
        let id = BannerId(format!("banner-{}", self.sequence.fetch_add(1, Ordering::SeqCst)));
        let banner = self.banners.insert(input.into_banner(id, now, now)?)?;
        info!(banner_id = %banner.id.0, "banner created");
        Ok(banner)
    }

    pub fn update_banner(&self, id: &BannerId, input: BannerInput) -> Result<Banner, AdminServiceError> {
        let existing = self
            .banners
            .fetch(id)?
            .ok_or_else(|| AdminServiceError::NotFound(BANNER_NOT_FOUND_MESSAGE.to_string()))?;
        let banner = input.into_banner(id.clone(), existing.created_at, Utc::now())?;
        let banner = self.banners.update(banner)?;
        info!(banner_id = %banner.id.0, "banner updated");
        Ok(banner)
    }

    fn next_profile_id(&self) -> Result<ProfileId, AdminServiceError> {
        loop {
            let id = ProfileId(format!(
                "cliente-{:04}",
                self.sequence.fetch_add(1, Ordering::SeqCst)
            ));
            if self.profiles.fetch(&id)?.is_none() {
                return Ok(id);
            }
        }
    }
}

/// Error raised by the admin service.
#[derive(Debug, thiserror::Error)]
pub enum AdminServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
