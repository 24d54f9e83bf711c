use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    Banner, BannerId, BannerImage, ClientCategory, EtaTracking, PassportTracking, Profile,
    VisaTracking,
};
use crate::intake::domain::{blank_date, ProfileId};
use crate::intake::masks::{format_cpf, format_phone};
use crate::intake::validation::{
    validate, Condition, ConditionalRule, Constraint, FieldRule, Schema, ValidationErrors,
    REQUIRED_MESSAGE,
};

pub const INVALID_IMAGE_MESSAGE: &str = "Formato de imagem inválido";

static PROFILE_SCHEMA: Schema = Schema {
    fields: &[
        FieldRule {
            path: "name",
            constraints: &[Constraint::Required, Constraint::MinLength(3)],
        },
        FieldRule {
            path: "email",
            constraints: &[Constraint::Required, Constraint::Email],
        },
        FieldRule {
            path: "phone",
            constraints: &[Constraint::Phone],
        },
        FieldRule {
            path: "cpf",
            constraints: &[Constraint::Cpf],
        },
        FieldRule {
            path: "category",
            constraints: &[Constraint::Required],
        },
    ],
    rules: &[ConditionalRule {
        trigger: "category",
        condition: Condition::OneOf(&["passport"]),
        dependents: &["cpf"],
    }],
};

static BANNER_SCHEMA: Schema = Schema {
    fields: &[
        FieldRule {
            path: "title",
            constraints: &[Constraint::Required, Constraint::MinLength(3)],
        },
        FieldRule {
            path: "image.key",
            constraints: &[Constraint::Required],
        },
        FieldRule {
            path: "image.url",
            constraints: &[Constraint::Required],
        },
    ],
    rules: &[],
};

/// Staff-edited client profile. `id` is absent when creating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    #[serde(default)]
    pub id: Option<ProfileId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub cpf: String,
    #[serde(default, with = "blank_date")]
    pub birth_date: Option<NaiveDate>,
    pub category: Option<ClientCategory>,
    #[serde(default)]
    pub is_prospect: bool,
    #[serde(default)]
    pub visa: VisaTracking,
    #[serde(default)]
    pub passport: PassportTracking,
    #[serde(default)]
    pub eta: EtaTracking,
}

impl ProfileInput {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let json = serde_json::to_value(self).map_err(|err| {
            let mut errors = ValidationErrors::new();
            errors.add("profile", err.to_string());
            errors
        })?;
        validate(&PROFILE_SCHEMA, &json)
    }

    /// Build the stored profile. `created_at` survives edits.
    pub fn into_profile(self, id: ProfileId, created_at: DateTime<Utc>) -> Result<Profile, ValidationErrors> {
        self.validate()?;
        let Some(category) = self.category else {
            let mut errors = ValidationErrors::new();
            errors.add("category", REQUIRED_MESSAGE);
            return Err(errors);
        };
        Ok(Profile {
            id,
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: format_phone(&self.phone),
            cpf: format_cpf(&self.cpf),
            birth_date: self.birth_date,
            category,
            is_prospect: self.is_prospect,
            visa: self.visa,
            passport: self.passport,
            eta: self.eta,
            created_at,
        })
    }
}

/// Homepage banner form. The image is uploaded beforehand; only its reference is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub image: BannerImage,
    #[serde(default = "active_by_default")]
    pub active: bool,
}

fn active_by_default() -> bool {
    true
}

impl BannerInput {
    /// Content type as sent, or guessed from the upload key when blank.
    pub fn content_type(&self) -> Option<mime::Mime> {
        let declared = self.image.content_type.trim();
        if declared.is_empty() {
            mime_guess::from_path(&self.image.key).first()
        } else {
            declared.parse().ok()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let json = serde_json::to_value(self).map_err(|err| {
            let mut errors = ValidationErrors::new();
            errors.add("banner", err.to_string());
            errors
        })?;

        let mut errors = match validate(&BANNER_SCHEMA, &json) {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        let is_image = self
            .content_type()
            .map(|content_type| content_type.type_() == mime::IMAGE)
            .unwrap_or(false);
        if !is_image {
            errors.add("image.contentType", INVALID_IMAGE_MESSAGE);
        }
        errors.into_result()
    }

    pub fn into_banner(
        self,
        id: BannerId,
        created_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Banner, ValidationErrors> {
        self.validate()?;
        let content_type = self
            .content_type()
            .map(|content_type| content_type.essence_str().to_string())
            .unwrap_or_default();
        Ok(Banner {
            id,
            title: self.title.trim().to_string(),
            link: self.link.trim().to_string(),
            image: BannerImage {
                key: self.image.key,
                url: self.image.url,
                content_type,
            },
            active: self.active,
            created_at,
            updated_at: now,
        })
    }
}
