//! Staff dashboard: client grid, client details, prospects pipeline, profile
//! and banner forms.

pub mod domain;
pub mod forms;
pub mod repository;
pub mod router;
pub mod service;
pub mod table;
pub mod warnings;

#[cfg(test)]
mod tests;

pub use domain::{
    Banner, BannerId, BannerImage, ClientCategory, EtaStatus, EtaTracking, PassportStatus,
    PassportTracking, Profile, ShippingStatus, VisaStatus, VisaTracking,
};
pub use forms::{BannerInput, ProfileInput};
pub use repository::{BannerRepository, ProfileRepository};
pub use router::admin_router;
pub use service::{AdminService, AdminServiceError, ClientDetails};
pub use table::{
    export_csv, ClientRow, Column, ColumnSet, ExportError, SortDirection, TableQuery, TableView,
};
pub use warnings::{DateWarning, WarningThresholds};
