use super::super::domain::StepId;
use super::Condition::{Affirmative, OneOf};
use super::Constraint::{Cep, Cpf, Email, MinLength, Phone, Required};
use super::{ConditionalRule, FieldRule, Schema};

const fn field(path: &'static str, constraints: &'static [super::Constraint]) -> FieldRule {
    FieldRule { path, constraints }
}

const fn when_yes(trigger: &'static str, dependents: &'static [&'static str]) -> ConditionalRule {
    ConditionalRule {
        trigger,
        condition: Affirmative,
        dependents,
    }
}

const REQUIRED: &[super::Constraint] = &[Required];

pub fn schema_for(step: StepId) -> &'static Schema {
    match step {
        StepId::PersonalData => &PERSONAL_DATA,
        StepId::ContactAddress => &CONTACT_ADDRESS,
        StepId::Passport => &PASSPORT,
        StepId::AboutTravel => &ABOUT_TRAVEL,
        StepId::PreviousTravel => &PREVIOUS_TRAVEL,
        StepId::UsContact => &US_CONTACT,
        StepId::Family => &FAMILY,
        StepId::Partner => &PARTNER,
        StepId::WorkEducation => &WORK_EDUCATION,
        StepId::AdditionalInformation => &ADDITIONAL_INFORMATION,
        StepId::Security => &SECURITY,
    }
}

static PERSONAL_DATA: Schema = Schema {
    fields: &[
        field("firstName", &[Required, MinLength(2)]),
        field("lastName", &[Required, MinLength(2)]),
        field("cpf", &[Required, Cpf]),
        field("otherNamesConfirmation", REQUIRED),
        field("sex", REQUIRED),
        field("maritalStatus", REQUIRED),
        field("birthDate", REQUIRED),
        field("birthCity", REQUIRED),
        field("birthState", REQUIRED),
        field("birthCountry", REQUIRED),
        field("originCountry", REQUIRED),
        field("otherNationalityConfirmation", REQUIRED),
    ],
    rules: &[
        when_yes("otherNamesConfirmation", &["otherNames"]),
        when_yes("otherNationalityConfirmation", &["otherNationality"]),
    ],
};

static CONTACT_ADDRESS: Schema = Schema {
    fields: &[
        field("address", REQUIRED),
        field("addressNumber", REQUIRED),
        field("district", REQUIRED),
        field("city", REQUIRED),
        field("state", REQUIRED),
        field("cep", &[Required, Cep]),
        field("country", REQUIRED),
        field("differentPostalAddressConfirmation", REQUIRED),
        field("postalCep", &[Cep]),
        field("residentialPhone", &[Phone]),
        field("cellPhone", &[Required, Phone]),
        field("businessPhone", &[Phone]),
        field("otherPhonesConfirmation", REQUIRED),
        field("email", &[Required, Email]),
        field("otherEmailsConfirmation", REQUIRED),
    ],
    rules: &[
        when_yes(
            "differentPostalAddressConfirmation",
            &[
                "postalAddress",
                "postalCity",
                "postalState",
                "postalCep",
                "postalCountry",
            ],
        ),
        when_yes("otherPhonesConfirmation", &["otherPhones"]),
        when_yes("otherEmailsConfirmation", &["otherEmails"]),
    ],
};

static PASSPORT: Schema = Schema {
    fields: &[
        field("passportNumber", &[Required, MinLength(5)]),
        field("passportCountry", REQUIRED),
        field("passportIssueDate", REQUIRED),
        field("passportExpireDate", REQUIRED),
        field("lostPassportConfirmation", REQUIRED),
    ],
    rules: &[when_yes(
        "lostPassportConfirmation",
        &[
            "lostPassportNumber",
            "lostPassportCountry",
            "lostPassportDetails",
        ],
    )],
};

static ABOUT_TRAVEL: Schema = Schema {
    fields: &[
        field("travelPurpose", REQUIRED),
        field("arrivalDate", REQUIRED),
        field("stayLength", REQUIRED),
        field("otherPayerConfirmation", REQUIRED),
        field("payerPhone", &[Phone]),
        field("travelCompanyConfirmation", REQUIRED),
    ],
    rules: &[
        when_yes(
            "otherPayerConfirmation",
            &["payerName", "payerRelation", "payerPhone"],
        ),
        when_yes("travelCompanyConfirmation", &["travelCompanions"]),
    ],
};

static PREVIOUS_TRAVEL: Schema = Schema {
    fields: &[
        field("hasBeenOnUsaConfirmation", REQUIRED),
        field("americanVisaConfirmation", REQUIRED),
        field("visaDeniedConfirmation", REQUIRED),
        field("immigrationPetitionConfirmation", REQUIRED),
    ],
    rules: &[
        when_yes(
            "hasBeenOnUsaConfirmation",
            &["lastArrivalDate", "lastStayLength"],
        ),
        when_yes("americanVisaConfirmation", &["visaNumber", "visaIssueDate"]),
        when_yes("visaDeniedConfirmation", &["visaDeniedDetails"]),
        when_yes(
            "immigrationPetitionConfirmation",
            &["immigrationPetitionDetails"],
        ),
    ],
};

static US_CONTACT: Schema = Schema {
    fields: &[
        field("organizationOrPerson", REQUIRED),
        field("contactName", REQUIRED),
        field("contactAddress", REQUIRED),
        field("contactPhoneNumber", &[Required, MinLength(8)]),
        field("contactEmail", &[Email]),
    ],
    rules: &[],
};

static FAMILY: Schema = Schema {
    fields: &[
        field("fatherName", REQUIRED),
        field("fatherInTheUsaConfirmation", REQUIRED),
        field("motherName", REQUIRED),
        field("motherInTheUsaConfirmation", REQUIRED),
        field("relativesInTheUsaConfirmation", REQUIRED),
    ],
    rules: &[
        when_yes("fatherInTheUsaConfirmation", &["fatherUsaSituation"]),
        when_yes("motherInTheUsaConfirmation", &["motherUsaSituation"]),
        when_yes("relativesInTheUsaConfirmation", &["relativesInTheUsa"]),
    ],
};

static PARTNER: Schema = Schema {
    fields: &[
        field("partnerName", REQUIRED),
        field("partnerBirthDate", REQUIRED),
        field("partnerNationality", REQUIRED),
        field("partnerBirthCity", REQUIRED),
        field("partnerDifferentAddressConfirmation", REQUIRED),
    ],
    rules: &[when_yes(
        "partnerDifferentAddressConfirmation",
        &["partnerAddress"],
    )],
};

static WORK_EDUCATION: Schema = Schema {
    fields: &[
        field("occupation", REQUIRED),
        field("companyPhone", &[Phone]),
        field("previousJobConfirmation", REQUIRED),
        field("coursesConfirmation", REQUIRED),
    ],
    rules: &[
        ConditionalRule {
            trigger: "occupation",
            condition: OneOf(&["Empregado", "Empresário", "Autônomo"]),
            dependents: &["companyName", "companyAddress", "monthlySalary"],
        },
        when_yes("previousJobConfirmation", &["previousJobs"]),
        when_yes("coursesConfirmation", &["courses"]),
    ],
};

static ADDITIONAL_INFORMATION: Schema = Schema {
    fields: &[
        field("fluentLanguages", REQUIRED),
        field("fiveYearsOtherCountryConfirmation", REQUIRED),
        field("socialOrganizationConfirmation", REQUIRED),
        field("weaponTrainingConfirmation", REQUIRED),
        field("militaryServiceConfirmation", REQUIRED),
        field("insurgentOrganizationConfirmation", REQUIRED),
    ],
    rules: &[
        when_yes("fiveYearsOtherCountryConfirmation", &["visitedCountries"]),
        when_yes("socialOrganizationConfirmation", &["organizationName"]),
        when_yes("weaponTrainingConfirmation", &["weaponTrainingDetails"]),
        when_yes(
            "militaryServiceConfirmation",
            &["militaryServiceCountry", "militaryServiceDetails"],
        ),
        when_yes(
            "insurgentOrganizationConfirmation",
            &["insurgentOrganizationDetails"],
        ),
    ],
};

static SECURITY: Schema = Schema {
    fields: &[
        field("contagiousDiseaseConfirmation", REQUIRED),
        field("mentalDisorderConfirmation", REQUIRED),
        field("drugUseConfirmation", REQUIRED),
        field("arrestedConfirmation", REQUIRED),
        field("controlledSubstancesConfirmation", REQUIRED),
        field("moneyLaunderingConfirmation", REQUIRED),
        field("humanTraffickingConfirmation", REQUIRED),
        field("terrorismConfirmation", REQUIRED),
        field("visaFraudConfirmation", REQUIRED),
        field("deportedConfirmation", REQUIRED),
    ],
    rules: &[
        when_yes("contagiousDiseaseConfirmation", &["contagiousDiseaseDetails"]),
        when_yes("mentalDisorderConfirmation", &["mentalDisorderDetails"]),
        when_yes("drugUseConfirmation", &["drugUseDetails"]),
        when_yes("arrestedConfirmation", &["arrestedDetails"]),
        when_yes(
            "controlledSubstancesConfirmation",
            &["controlledSubstancesDetails"],
        ),
        when_yes("moneyLaunderingConfirmation", &["moneyLaunderingDetails"]),
        when_yes("humanTraffickingConfirmation", &["humanTraffickingDetails"]),
        when_yes("terrorismConfirmation", &["terrorismDetails"]),
        when_yes("visaFraudConfirmation", &["visaFraudDetails"]),
        when_yes("deportedConfirmation", &["deportedDetails"]),
    ],
};
