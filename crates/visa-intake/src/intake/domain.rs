use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::steps::{
    AboutTravel, AdditionalInformation, ContactAddress, Family, Partner, PassportData,
    PersonalData, PreviousTravel, SecurityQuestionnaire, StepValues, UsContact, WorkEducation,
};

/// Identifier of the applicant profile that owns an application record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProfileId(pub String);

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `"Sim" | "Não"` answer gating dependent fields. Blank answers stay unanswered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Confirmation {
    #[default]
    Unanswered,
    Yes,
    No,
}

impl Confirmation {
    pub const YES_LABEL: &'static str = "Sim";
    pub const NO_LABEL: &'static str = "Não";

    pub const fn label(self) -> &'static str {
        match self {
            Confirmation::Unanswered => "",
            Confirmation::Yes => Self::YES_LABEL,
            Confirmation::No => Self::NO_LABEL,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "" => Some(Confirmation::Unanswered),
            "Sim" | "sim" => Some(Confirmation::Yes),
            "Não" | "não" | "Nao" | "nao" => Some(Confirmation::No),
            _ => None,
        }
    }

    pub const fn is_yes(self) -> bool {
        matches!(self, Confirmation::Yes)
    }
}

impl Serialize for Confirmation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Confirmation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(Confirmation::Unanswered),
            Some(value) => Confirmation::parse(&value).ok_or_else(|| {
                serde::de::Error::custom(format!("expected \"Sim\" or \"Não\", found '{value}'"))
            }),
        }
    }
}

/// Wizard pages in their fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    PersonalData,
    ContactAddress,
    Passport,
    AboutTravel,
    PreviousTravel,
    UsContact,
    Family,
    Partner,
    WorkEducation,
    AdditionalInformation,
    Security,
}

impl StepId {
    pub const ALL: [StepId; 11] = [
        StepId::PersonalData,
        StepId::ContactAddress,
        StepId::Passport,
        StepId::AboutTravel,
        StepId::PreviousTravel,
        StepId::UsContact,
        StepId::Family,
        StepId::Partner,
        StepId::WorkEducation,
        StepId::AdditionalInformation,
        StepId::Security,
    ];

    pub const fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub const fn slug(self) -> &'static str {
        match self {
            StepId::PersonalData => "personal_data",
            StepId::ContactAddress => "contact_address",
            StepId::Passport => "passport",
            StepId::AboutTravel => "about_travel",
            StepId::PreviousTravel => "previous_travel",
            StepId::UsContact => "us_contact",
            StepId::Family => "family",
            StepId::Partner => "partner",
            StepId::WorkEducation => "work_education",
            StepId::AdditionalInformation => "additional_information",
            StepId::Security => "security",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            StepId::PersonalData => "Dados pessoais",
            StepId::ContactAddress => "Endereço e contatos",
            StepId::Passport => "Passaporte",
            StepId::AboutTravel => "Sobre a viagem",
            StepId::PreviousTravel => "Viagens anteriores",
            StepId::UsContact => "Contato nos EUA",
            StepId::Family => "Família",
            StepId::Partner => "Cônjuge",
            StepId::WorkEducation => "Trabalho e educação",
            StepId::AdditionalInformation => "Informações adicionais",
            StepId::Security => "Segurança",
        }
    }

    /// Accepts either the numeric step (`"3"`) or its slug (`"about_travel"`).
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(index) = raw.parse::<u8>() {
            return Self::from_index(index);
        }
        Self::ALL.iter().copied().find(|step| step.slug() == raw)
    }

    /// Step selected by a `formStep=N` query string; anything unreadable mounts the first step.
    pub fn from_query(query: &str) -> Self {
        query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "formStep")
            .and_then(|(_, value)| value.parse::<u8>().ok())
            .and_then(Self::from_index)
            .unwrap_or(StepId::PersonalData)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Marital statuses that bring the partner step into the wizard.
pub const PARTNERED_MARITAL_STATUSES: &[&str] = &["Casado", "União Estável"];

/// One row per applicant. Every step upserts its own section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub profile_id: ProfileId,
    #[serde(default)]
    pub personal_data: PersonalData,
    #[serde(default)]
    pub contact_address: ContactAddress,
    #[serde(default)]
    pub passport: PassportData,
    #[serde(default)]
    pub about_travel: AboutTravel,
    #[serde(default)]
    pub previous_travel: PreviousTravel,
    #[serde(default)]
    pub us_contact: UsContact,
    #[serde(default)]
    pub family: Family,
    #[serde(default)]
    pub partner: Partner,
    #[serde(default)]
    pub work_education: WorkEducation,
    #[serde(default)]
    pub additional_information: AdditionalInformation,
    #[serde(default)]
    pub security: SecurityQuestionnaire,
    #[serde(default)]
    pub completed_steps: BTreeSet<StepId>,
    #[serde(default)]
    pub is_complete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApplicationRecord {
    pub fn new(profile_id: ProfileId, now: DateTime<Utc>) -> Self {
        Self {
            profile_id,
            personal_data: PersonalData::default(),
            contact_address: ContactAddress::default(),
            passport: PassportData::default(),
            about_travel: AboutTravel::default(),
            previous_travel: PreviousTravel::default(),
            us_contact: UsContact::default(),
            family: Family::default(),
            partner: Partner::default(),
            work_education: WorkEducation::default(),
            additional_information: AdditionalInformation::default(),
            security: SecurityQuestionnaire::default(),
            completed_steps: BTreeSet::new(),
            is_complete: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Snapshot of the persisted values of one step.
    pub fn section(&self, step: StepId) -> StepValues {
        match step {
            StepId::PersonalData => StepValues::PersonalData(self.personal_data.clone()),
            StepId::ContactAddress => StepValues::ContactAddress(self.contact_address.clone()),
            StepId::Passport => StepValues::Passport(self.passport.clone()),
            StepId::AboutTravel => StepValues::AboutTravel(self.about_travel.clone()),
            StepId::PreviousTravel => StepValues::PreviousTravel(self.previous_travel.clone()),
            StepId::UsContact => StepValues::UsContact(self.us_contact.clone()),
            StepId::Family => StepValues::Family(self.family.clone()),
            StepId::Partner => StepValues::Partner(self.partner.clone()),
            StepId::WorkEducation => StepValues::WorkEducation(self.work_education.clone()),
            StepId::AdditionalInformation => {
                StepValues::AdditionalInformation(self.additional_information.clone())
            }
            StepId::Security => StepValues::Security(self.security.clone()),
        }
    }

    /// Replace the section addressed by `values`.
    pub fn apply(&mut self, values: StepValues) {
        match values {
            StepValues::PersonalData(section) => self.personal_data = section,
            StepValues::ContactAddress(section) => self.contact_address = section,
            StepValues::Passport(section) => self.passport = section,
            StepValues::AboutTravel(section) => self.about_travel = section,
            StepValues::PreviousTravel(section) => self.previous_travel = section,
            StepValues::UsContact(section) => self.us_contact = section,
            StepValues::Family(section) => self.family = section,
            StepValues::Partner(section) => self.partner = section,
            StepValues::WorkEducation(section) => self.work_education = section,
            StepValues::AdditionalInformation(section) => self.additional_information = section,
            StepValues::Security(section) => self.security = section,
        }
    }

    pub fn has_partner(&self) -> bool {
        PARTNERED_MARITAL_STATUSES.contains(&self.personal_data.marital_status.trim())
    }
}

/// Serde helpers for dates that arrive as `""` when the input was left blank.
pub(crate) mod blank_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(Some)
                .map_err(|err| {
                    serde::de::Error::custom(format!(
                        "failed to parse '{value}' as YYYY-MM-DD ({err})"
                    ))
                }),
        }
    }
}
