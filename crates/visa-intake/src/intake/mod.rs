//! Multi-step visa application wizard.
//!
//! One [`ApplicationRecord`] per applicant is built incrementally: every step
//! saves its own section, declarative schemas gate submission, and
//! [`StepFlow`] decides where the applicant goes next.

pub mod domain;
pub mod drafts;
pub mod flow;
pub mod form;
pub mod masks;
pub mod repository;
pub mod router;
pub mod service;
pub mod session;
pub mod steps;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{ApplicationRecord, Confirmation, ProfileId, StepId};
pub use drafts::{DraftEntry, DraftList};
pub use flow::{FlowContext, FlowView, Navigation, StepFlow};
pub use form::{FormFeedback, IntakeApi, StepForm, Toast, ToastKind};
pub use repository::{
    ApplicationRepository, NotifyError, RepositoryError, StaffNotice, StaffNotifier,
};
pub use router::intake_router;
pub use service::{
    IntakeService, IntakeServiceError, SaveRequest, StepOutcome, SubmitRequest,
    GENERIC_ERROR_MESSAGE,
};
pub use session::{Command, Location, WizardSession};
pub use steps::StepValues;
pub use validation::{FieldError, ValidationErrors};
