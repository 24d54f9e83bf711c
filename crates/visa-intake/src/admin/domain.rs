use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::intake::domain::{blank_date, ProfileId};

/// Dashboard category. Each cares about a different subset of status fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientCategory {
    AmericanVisa,
    Passport,
    Eta,
}

impl ClientCategory {
    pub const ALL: [ClientCategory; 3] = [
        ClientCategory::AmericanVisa,
        ClientCategory::Passport,
        ClientCategory::Eta,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ClientCategory::AmericanVisa => "Visto americano",
            ClientCategory::Passport => "Passaporte",
            ClientCategory::Eta => "E-TA",
        }
    }

    pub const fn slug(self) -> &'static str {
        match self {
            ClientCategory::AmericanVisa => "american_visa",
            ClientCategory::Passport => "passport",
            ClientCategory::Eta => "eta",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.slug() == raw.trim())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisaStatus {
    #[default]
    Pending,
    Scheduled,
    Approved,
    Denied,
}

impl VisaStatus {
    pub const fn label(self) -> &'static str {
        match self {
            VisaStatus::Pending => "Pendente",
            VisaStatus::Scheduled => "Agendado",
            VisaStatus::Approved => "Aprovado",
            VisaStatus::Denied => "Negado",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassportStatus {
    #[default]
    AwaitingDocuments,
    Processing,
    Issued,
}

impl PassportStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PassportStatus::AwaitingDocuments => "Aguardando documentos",
            PassportStatus::Processing => "Em processamento",
            PassportStatus::Issued => "Emitido",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingStatus {
    #[default]
    NotSent,
    Sent,
    Delivered,
    Returned,
}

impl ShippingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ShippingStatus::NotSent => "Não enviado",
            ShippingStatus::Sent => "Enviado",
            ShippingStatus::Delivered => "Entregue",
            ShippingStatus::Returned => "Devolvido",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EtaStatus {
    #[default]
    NotRequested,
    InAnalysis,
    Approved,
    Denied,
}

impl EtaStatus {
    pub const fn label(self) -> &'static str {
        match self {
            EtaStatus::NotRequested => "Não solicitado",
            EtaStatus::InAnalysis => "Em análise",
            EtaStatus::Approved => "Aprovado",
            EtaStatus::Denied => "Negado",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisaTracking {
    pub status: VisaStatus,
    #[serde(with = "blank_date")]
    pub interview_date: Option<NaiveDate>,
    #[serde(with = "blank_date")]
    pub scheduled_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PassportTracking {
    pub status: PassportStatus,
    pub shipping: ShippingStatus,
    #[serde(with = "blank_date")]
    pub sent_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EtaTracking {
    pub status: EtaStatus,
    #[serde(with = "blank_date")]
    pub requested_on: Option<NaiveDate>,
}

/// Client as seen by staff. Prospects are profiles still in the sales pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub cpf: String,
    #[serde(default, with = "blank_date")]
    pub birth_date: Option<NaiveDate>,
    pub category: ClientCategory,
    #[serde(default)]
    pub is_prospect: bool,
    #[serde(default)]
    pub visa: VisaTracking,
    #[serde(default)]
    pub passport: PassportTracking,
    #[serde(default)]
    pub eta: EtaTracking,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Date the dashboard watches for this client's category.
    pub fn tracked_date(&self) -> Option<NaiveDate> {
        match self.category {
            ClientCategory::AmericanVisa => self.visa.scheduled_on,
            ClientCategory::Passport => self.passport.sent_on,
            ClientCategory::Eta => self.eta.requested_on,
        }
    }

    pub fn status_label(&self) -> &'static str {
        match self.category {
            ClientCategory::AmericanVisa => self.visa.status.label(),
            ClientCategory::Passport => self.passport.status.label(),
            ClientCategory::Eta => self.eta.status.label(),
        }
    }
}

/// Already-uploaded image reference; the upload itself happens elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BannerImage {
    pub key: String,
    pub url: String,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BannerId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: BannerId,
    pub title: String,
    #[serde(default)]
    pub link: String,
    pub image: BannerImage,
    #[serde(default)]
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
