use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::domain::{blank_date, Confirmation, StepId};
use super::drafts::{DraftEntry, DraftList};
use super::masks::Mask;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OtherName {
    pub name: String,
}

impl DraftEntry for OtherName {
    fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OtherPhone {
    pub phone: String,
}

impl DraftEntry for OtherPhone {
    fn is_blank(&self) -> bool {
        self.phone.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OtherEmail {
    pub email: String,
}

impl DraftEntry for OtherEmail {
    fn is_blank(&self) -> bool {
        self.email.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TravelCompanion {
    pub name: String,
    pub relation: String,
}

impl DraftEntry for TravelCompanion {
    fn is_blank(&self) -> bool {
        self.name.trim().is_empty() && self.relation.trim().is_empty()
    }
}

/// Relative living in the USA (`name`, `relation`, immigration `situation`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelativeAbroad {
    pub name: String,
    pub relation: String,
    pub situation: String,
}

impl DraftEntry for RelativeAbroad {
    fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
            && self.relation.trim().is_empty()
            && self.situation.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreviousJob {
    pub company: String,
    pub role: String,
    #[serde(with = "blank_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(with = "blank_date")]
    pub end_date: Option<NaiveDate>,
}

impl DraftEntry for PreviousJob {
    fn is_blank(&self) -> bool {
        self.company.trim().is_empty()
            && self.role.trim().is_empty()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Course {
    pub institution: String,
    pub course: String,
    #[serde(with = "blank_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(with = "blank_date")]
    pub end_date: Option<NaiveDate>,
}

impl DraftEntry for Course {
    fn is_blank(&self) -> bool {
        self.institution.trim().is_empty()
            && self.course.trim().is_empty()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalData {
    pub first_name: String,
    pub last_name: String,
    pub cpf: String,
    pub other_names_confirmation: Confirmation,
    pub other_names: DraftList<OtherName>,
    pub sex: String,
    pub marital_status: String,
    #[serde(with = "blank_date")]
    pub birth_date: Option<NaiveDate>,
    pub birth_city: String,
    pub birth_state: String,
    pub birth_country: String,
    pub origin_country: String,
    pub other_nationality_confirmation: Confirmation,
    pub other_nationality: String,
    pub us_social_security_number: String,
    pub us_taxpayer_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactAddress {
    pub address: String,
    pub address_number: String,
    pub complement: String,
    pub district: String,
    pub city: String,
    pub state: String,
    pub cep: String,
    pub country: String,
    pub different_postal_address_confirmation: Confirmation,
    pub postal_address: String,
    pub postal_city: String,
    pub postal_state: String,
    pub postal_cep: String,
    pub postal_country: String,
    pub residential_phone: String,
    pub cell_phone: String,
    pub business_phone: String,
    pub other_phones_confirmation: Confirmation,
    pub other_phones: DraftList<OtherPhone>,
    pub email: String,
    pub other_emails_confirmation: Confirmation,
    pub other_emails: DraftList<OtherEmail>,
    pub social_media: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PassportData {
    pub passport_number: String,
    pub passport_city: String,
    pub passport_state: String,
    pub passport_country: String,
    #[serde(with = "blank_date")]
    pub passport_issue_date: Option<NaiveDate>,
    #[serde(with = "blank_date")]
    pub passport_expire_date: Option<NaiveDate>,
    pub lost_passport_confirmation: Confirmation,
    pub lost_passport_number: String,
    pub lost_passport_country: String,
    pub lost_passport_details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AboutTravel {
    pub travel_purpose: String,
    #[serde(with = "blank_date")]
    pub arrival_date: Option<NaiveDate>,
    pub stay_length: String,
    pub us_stay_address: String,
    pub other_payer_confirmation: Confirmation,
    pub payer_name: String,
    pub payer_relation: String,
    pub payer_phone: String,
    pub travel_company_confirmation: Confirmation,
    pub travel_companions: DraftList<TravelCompanion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreviousTravel {
    pub has_been_on_usa_confirmation: Confirmation,
    #[serde(with = "blank_date")]
    pub last_arrival_date: Option<NaiveDate>,
    pub last_stay_length: String,
    pub american_visa_confirmation: Confirmation,
    pub visa_number: String,
    #[serde(with = "blank_date")]
    pub visa_issue_date: Option<NaiveDate>,
    pub visa_denied_confirmation: Confirmation,
    pub visa_denied_details: String,
    pub immigration_petition_confirmation: Confirmation,
    pub immigration_petition_details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UsContact {
    pub organization_or_person: String,
    pub contact_name: String,
    pub contact_relation: String,
    pub contact_address: String,
    pub contact_phone_number: String,
    pub contact_email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Family {
    pub father_name: String,
    #[serde(with = "blank_date")]
    pub father_birth_date: Option<NaiveDate>,
    pub father_in_the_usa_confirmation: Confirmation,
    pub father_usa_situation: String,
    pub mother_name: String,
    #[serde(with = "blank_date")]
    pub mother_birth_date: Option<NaiveDate>,
    pub mother_in_the_usa_confirmation: Confirmation,
    pub mother_usa_situation: String,
    pub relatives_in_the_usa_confirmation: Confirmation,
    pub relatives_in_the_usa: DraftList<RelativeAbroad>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Partner {
    pub partner_name: String,
    #[serde(with = "blank_date")]
    pub partner_birth_date: Option<NaiveDate>,
    pub partner_nationality: String,
    pub partner_birth_city: String,
    pub partner_different_address_confirmation: Confirmation,
    pub partner_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkEducation {
    pub occupation: String,
    pub company_name: String,
    pub company_address: String,
    pub company_phone: String,
    pub monthly_salary: String,
    pub job_description: String,
    pub previous_job_confirmation: Confirmation,
    pub previous_jobs: DraftList<PreviousJob>,
    pub courses_confirmation: Confirmation,
    pub courses: DraftList<Course>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdditionalInformation {
    pub fluent_languages: String,
    pub five_years_other_country_confirmation: Confirmation,
    pub visited_countries: String,
    pub social_organization_confirmation: Confirmation,
    pub organization_name: String,
    pub weapon_training_confirmation: Confirmation,
    pub weapon_training_details: String,
    pub military_service_confirmation: Confirmation,
    pub military_service_country: String,
    pub military_service_details: String,
    pub insurgent_organization_confirmation: Confirmation,
    pub insurgent_organization_details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecurityQuestionnaire {
    pub contagious_disease_confirmation: Confirmation,
    pub contagious_disease_details: String,
    pub mental_disorder_confirmation: Confirmation,
    pub mental_disorder_details: String,
    pub drug_use_confirmation: Confirmation,
    pub drug_use_details: String,
    pub arrested_confirmation: Confirmation,
    pub arrested_details: String,
    pub controlled_substances_confirmation: Confirmation,
    pub controlled_substances_details: String,
    pub money_laundering_confirmation: Confirmation,
    pub money_laundering_details: String,
    pub human_trafficking_confirmation: Confirmation,
    pub human_trafficking_details: String,
    pub terrorism_confirmation: Confirmation,
    pub terrorism_details: String,
    pub visa_fraud_confirmation: Confirmation,
    pub visa_fraud_details: String,
    pub deported_confirmation: Confirmation,
    pub deported_details: String,
}

/// Values of a single step, as edited by a form or carried by a mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StepValues {
    PersonalData(PersonalData),
    ContactAddress(ContactAddress),
    Passport(PassportData),
    AboutTravel(AboutTravel),
    PreviousTravel(PreviousTravel),
    UsContact(UsContact),
    Family(Family),
    Partner(Partner),
    WorkEducation(WorkEducation),
    AdditionalInformation(AdditionalInformation),
    Security(SecurityQuestionnaire),
}

impl StepValues {
    pub fn empty(step: StepId) -> Self {
        match step {
            StepId::PersonalData => StepValues::PersonalData(PersonalData::default()),
            StepId::ContactAddress => StepValues::ContactAddress(ContactAddress::default()),
            StepId::Passport => StepValues::Passport(PassportData::default()),
            StepId::AboutTravel => StepValues::AboutTravel(AboutTravel::default()),
            StepId::PreviousTravel => StepValues::PreviousTravel(PreviousTravel::default()),
            StepId::UsContact => StepValues::UsContact(UsContact::default()),
            StepId::Family => StepValues::Family(Family::default()),
            StepId::Partner => StepValues::Partner(Partner::default()),
            StepId::WorkEducation => StepValues::WorkEducation(WorkEducation::default()),
            StepId::AdditionalInformation => {
                StepValues::AdditionalInformation(AdditionalInformation::default())
            }
            StepId::Security => StepValues::Security(SecurityQuestionnaire::default()),
        }
    }

    pub fn step(&self) -> StepId {
        match self {
            StepValues::PersonalData(_) => StepId::PersonalData,
            StepValues::ContactAddress(_) => StepId::ContactAddress,
            StepValues::Passport(_) => StepId::Passport,
            StepValues::AboutTravel(_) => StepId::AboutTravel,
            StepValues::PreviousTravel(_) => StepId::PreviousTravel,
            StepValues::UsContact(_) => StepId::UsContact,
            StepValues::Family(_) => StepId::Family,
            StepValues::Partner(_) => StepId::Partner,
            StepValues::WorkEducation(_) => StepId::WorkEducation,
            StepValues::AdditionalInformation(_) => StepId::AdditionalInformation,
            StepValues::Security(_) => StepId::Security,
        }
    }

    /// Decode the JSON object of one step. Unknown keys are ignored, missing keys default.
    pub fn from_json(step: StepId, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match step {
            StepId::PersonalData => StepValues::PersonalData(serde_json::from_value(value)?),
            StepId::ContactAddress => StepValues::ContactAddress(serde_json::from_value(value)?),
            StepId::Passport => StepValues::Passport(serde_json::from_value(value)?),
            StepId::AboutTravel => StepValues::AboutTravel(serde_json::from_value(value)?),
            StepId::PreviousTravel => StepValues::PreviousTravel(serde_json::from_value(value)?),
            StepId::UsContact => StepValues::UsContact(serde_json::from_value(value)?),
            StepId::Family => StepValues::Family(serde_json::from_value(value)?),
            StepId::Partner => StepValues::Partner(serde_json::from_value(value)?),
            StepId::WorkEducation => StepValues::WorkEducation(serde_json::from_value(value)?),
            StepId::AdditionalInformation => {
                StepValues::AdditionalInformation(serde_json::from_value(value)?)
            }
            StepId::Security => StepValues::Security(serde_json::from_value(value)?),
        })
    }

    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Resolve every blank field to the value persisted for the same step.
    pub fn fill_blanks_from(&self, persisted: &StepValues) -> Result<Self, serde_json::Error> {
        let mut draft = self.to_json()?;
        let persisted = persisted.to_json()?;

        if let (Value::Object(draft_fields), Value::Object(persisted_fields)) =
            (&mut draft, &persisted)
        {
            for (key, stored) in persisted_fields {
                let blank = draft_fields.get(key).map(is_blank).unwrap_or(true);
                if blank && !is_blank(stored) {
                    draft_fields.insert(key.clone(), stored.clone());
                }
            }
        }

        Self::from_json(self.step(), draft)
    }

    /// Re-apply display masks (CPF, CEP, phones) to every masked text field.
    pub fn normalized(&self) -> Result<Self, serde_json::Error> {
        let mut value = self.to_json()?;
        if let Value::Object(fields) = &mut value {
            mask_fields(fields);
        }
        Self::from_json(self.step(), value)
    }
}

fn mask_fields(fields: &mut Map<String, Value>) {
    for (key, value) in fields.iter_mut() {
        match value {
            Value::String(text) => {
                if let Some(mask) = Mask::for_field(key) {
                    *text = mask.apply(text);
                }
            }
            Value::Array(items) => {
                for item in items {
                    if let Value::Object(nested) = item {
                        mask_fields(nested);
                    }
                }
            }
            _ => {}
        }
    }
}

/// `null`, whitespace-only strings, empty arrays and objects whose members are all blank.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.values().all(is_blank),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
