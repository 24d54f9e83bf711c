use super::domain::{Banner, BannerId, Profile};
use crate::intake::domain::ProfileId;
use crate::intake::repository::RepositoryError;

/// Storage abstraction over client profiles.
pub trait ProfileRepository: Send + Sync {
    fn fetch(&self, id: &ProfileId) -> Result<Option<Profile>, RepositoryError>;
    fn upsert(&self, profile: Profile) -> Result<Profile, RepositoryError>;
    fn list(&self) -> Result<Vec<Profile>, RepositoryError>;
}

/// Storage abstraction over homepage banners.
pub trait BannerRepository: Send + Sync {
    fn insert(&self, banner: Banner) -> Result<Banner, RepositoryError>;
    fn update(&self, banner: Banner) -> Result<Banner, RepositoryError>;
    fn fetch(&self, id: &BannerId) -> Result<Option<Banner>, RepositoryError>;
    fn list(&self) -> Result<Vec<Banner>, RepositoryError>;
}
