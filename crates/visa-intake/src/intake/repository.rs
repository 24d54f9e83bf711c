use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{ApplicationRecord, ProfileId};

/// Storage abstraction over the relational application table.
pub trait ApplicationRepository: Send + Sync {
    fn fetch(&self, id: &ProfileId) -> Result<Option<ApplicationRecord>, RepositoryError>;
    /// Insert or replace the record keyed by its profile id.
    fn upsert(&self, record: ApplicationRecord) -> Result<ApplicationRecord, RepositoryError>;
    fn list(&self) -> Result<Vec<ApplicationRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook telling staff an applicant finished the wizard.
pub trait StaffNotifier: Send + Sync {
    fn notify(&self, notice: StaffNotice) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffNotice {
    pub template: String,
    pub profile_id: ProfileId,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
