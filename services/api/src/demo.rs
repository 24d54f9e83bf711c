use crate::infra::{build_services, seed_dashboard};
use chrono::{Local, NaiveDate};
use clap::Args;
use serde_json::{json, Value};
use visa_intake::admin::{ProfileInput, TableQuery};
use visa_intake::config::{AdminConfig, IntakeConfig};
use visa_intake::error::AppError;
use visa_intake::intake::domain::PARTNERED_MARITAL_STATUSES;
use visa_intake::intake::flow::age_on;
use visa_intake::intake::{
    Command, FlowContext, IntakeServiceError, Location, StepFlow, StepId, StepValues,
    WizardSession,
};

const DEFAULT_BIRTH_DATE: (i32, u32, u32) = (1990, 4, 12);
const DEFAULT_MARITAL_STATUS: &str = "Solteiro";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Applicant birth date (YYYY-MM-DD). Defaults to 1990-04-12.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) birth_date: Option<NaiveDate>,
    /// Applicant marital status, e.g. "Casado" to include the partner step.
    #[arg(long)]
    pub(crate) marital_status: Option<String>,
    /// Override the reference date (defaults to today).
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Skip the staff dashboard portion of the demo.
    #[arg(long)]
    pub(crate) skip_dashboard: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct StepPlanArgs {
    /// Applicant birth date (YYYY-MM-DD); unknown ages count as adults.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) birth_date: Option<NaiveDate>,
    /// Applicant marital status.
    #[arg(long)]
    pub(crate) marital_status: Option<String>,
    /// Reference date for the age check (defaults to today).
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_step_plan(args: StepPlanArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let config = IntakeConfig::default();
    let marital_status = args.marital_status.unwrap_or_default();
    let ctx = FlowContext {
        is_minor: args
            .birth_date
            .map(|birth| age_on(birth, today) < config.adult_age)
            .unwrap_or(false),
        has_partner: PARTNERED_MARITAL_STATUSES.contains(&marital_status.trim()),
    };

    println!("Wizard steps");
    println!(
        "  Minor: {} | Partner: {}",
        yes_no(ctx.is_minor),
        yes_no(ctx.has_partner)
    );
    for step in StepId::ALL {
        let marker = if StepFlow::is_applicable(step, ctx) {
            "x"
        } else {
            " "
        };
        println!("  [{}] {:>2} {} ({})", marker, step.index(), step.label(), step.slug());
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let birth_date = args.birth_date.or_else(|| {
        let (year, month, day) = DEFAULT_BIRTH_DATE;
        NaiveDate::from_ymd_opt(year, month, day)
    });
    let marital_status = args
        .marital_status
        .unwrap_or_else(|| DEFAULT_MARITAL_STATUS.to_string());

    let services = build_services(IntakeConfig::default(), AdminConfig::default(), Some(today));
    seed_dashboard(&services.admin, today)?;
    let applicant = services.admin.upsert_profile(ProfileInput {
        id: None,
        name: "Maria Souza".to_string(),
        email: "maria.souza@example.com".to_string(),
        phone: "11987654321".to_string(),
        cpf: "46283551858".to_string(),
        birth_date,
        category: Some(visa_intake::admin::ClientCategory::AmericanVisa),
        is_prospect: false,
        visa: Default::default(),
        passport: Default::default(),
        eta: Default::default(),
    })?;

    println!("Visa intake demo");
    println!("  Applicant: {} ({})", applicant.name, applicant.id);
    println!("  Marital status: {}", marital_status);

    let mut session = match WizardSession::open(services.intake.clone(), applicant.id.clone(), "formStep=0") {
        Ok(session) => session,
        Err(toast) => {
            println!("  Wizard unavailable: {}", toast.message);
            return Ok(());
        }
    };

    for _ in 0..=StepId::ALL.len() {
        let Location::Step(step) = session.location() else {
            break;
        };
        let answers = sample_answers(step, birth_date, &marital_status);
        let values = StepValues::from_json(step, answers)
            .map_err(|source| IntakeServiceError::Payload { step, source })?;
        if let Some(form) = session.form_mut() {
            *form.values_mut() = values;
        }

        match session.handle(Command::Submit { is_editing: false }) {
            Ok(Some(feedback)) if feedback.toast.is_error() => {
                println!("  {:>2} {}: {}", step.index(), step.label(), feedback.toast.message);
                for error in feedback.errors.iter() {
                    println!("       {} - {}", error.path, error.message);
                }
                return Ok(());
            }
            Ok(Some(feedback)) => {
                println!(
                    "  {:>2} {}: {} -> {}",
                    step.index(),
                    step.label(),
                    feedback.toast.message,
                    session.url()
                );
            }
            Ok(None) => break,
            Err(toast) => {
                println!("  {:>2} {}: {}", step.index(), step.label(), toast.message);
                return Ok(());
            }
        }
    }

    let flow = services.intake.flow(&applicant.id)?;
    println!(
        "  Application complete: {} ({} of {} steps)",
        yes_no(flow.is_complete),
        flow.steps.iter().filter(|entry| entry.completed).count(),
        flow.steps.len()
    );

    let notices = services.notifier.notices();
    if notices.is_empty() {
        println!("  Staff notices: none dispatched");
    } else {
        println!("  Staff notices:");
        for notice in notices {
            println!("    - {} for {}", notice.template, notice.profile_id);
        }
    }

    if args.skip_dashboard {
        return Ok(());
    }

    let table = services.admin.client_table(&TableQuery::default())?;
    println!("\nStaff dashboard ({} clients)", table.total);
    for row in &table.rows {
        let cell = |key: &str| row.cells.get(key).map(String::as_str).unwrap_or_default();
        println!(
            "  {:<14} {:<16} {:<22} {:<12} {}",
            cell("name"),
            cell("category"),
            cell("status"),
            cell("trackedDate"),
            cell("warning")
        );
    }

    let details = services.admin.client_details(&applicant.id)?;
    println!(
        "\n  {}: {} completed steps, complete: {}",
        details.profile.name,
        details.completed_steps,
        yes_no(details.is_complete)
    );
    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "sim"
    } else {
        "não"
    }
}

/// Answers that pass every step's validation.
fn sample_answers(step: StepId, birth_date: Option<NaiveDate>, marital_status: &str) -> Value {
    let no = "Não";
    match step {
        StepId::PersonalData => json!({
            "firstName": "Maria",
            "lastName": "Souza",
            "cpf": "46283551858",
            "otherNamesConfirmation": no,
            "sex": "Feminino",
            "maritalStatus": marital_status,
            "birthDate": birth_date.map(|date| date.format("%Y-%m-%d").to_string()),
            "birthCity": "São Paulo",
            "birthState": "SP",
            "birthCountry": "Brasil",
            "originCountry": "Brasil",
            "otherNationalityConfirmation": no
        }),
        StepId::ContactAddress => json!({
            "address": "Rua das Flores",
            "addressNumber": "120",
            "district": "Centro",
            "city": "São Paulo",
            "state": "SP",
            "cep": "01001000",
            "country": "Brasil",
            "differentPostalAddressConfirmation": no,
            "cellPhone": "11987654321",
            "otherPhonesConfirmation": no,
            "email": "maria.souza@example.com",
            "otherEmailsConfirmation": no
        }),
        StepId::Passport => json!({
            "passportNumber": "FX123456",
            "passportCountry": "Brasil",
            "passportIssueDate": "2022-05-10",
            "passportExpireDate": "2032-05-09",
            "lostPassportConfirmation": no
        }),
        StepId::AboutTravel => json!({
            "travelPurpose": "Turismo",
            "arrivalDate": "2027-01-15",
            "stayLength": "15 dias",
            "otherPayerConfirmation": no,
            "travelCompanyConfirmation": "Sim",
            "travelCompanions": [{ "name": "Lucas Souza", "relation": "Irmão" }]
        }),
        StepId::PreviousTravel => json!({
            "hasBeenOnUsaConfirmation": no,
            "americanVisaConfirmation": no,
            "visaDeniedConfirmation": no,
            "immigrationPetitionConfirmation": no
        }),
        StepId::UsContact => json!({
            "organizationOrPerson": "Pessoa",
            "contactName": "John Smith",
            "contactAddress": "1 Main St, Orlando, FL",
            "contactPhoneNumber": "+1 407 555 0100",
            "contactEmail": "john.smith@example.com"
        }),
        StepId::Family => json!({
            "fatherName": "José Souza",
            "fatherInTheUsaConfirmation": no,
            "motherName": "Ana Souza",
            "motherInTheUsaConfirmation": no,
            "relativesInTheUsaConfirmation": no
        }),
        StepId::Partner => json!({
            "partnerName": "Pedro Lima",
            "partnerBirthDate": "1988-08-20",
            "partnerNationality": "Brasileira",
            "partnerBirthCity": "Campinas",
            "partnerDifferentAddressConfirmation": no
        }),
        StepId::WorkEducation => json!({
            "occupation": "Empregado",
            "companyName": "Acme Ltda",
            "companyAddress": "Av. Paulista, 1000",
            "monthlySalary": "8000",
            "previousJobConfirmation": no,
            "coursesConfirmation": no
        }),
        StepId::AdditionalInformation => json!({
            "fluentLanguages": "Português, Inglês",
            "fiveYearsOtherCountryConfirmation": no,
            "socialOrganizationConfirmation": no,
            "weaponTrainingConfirmation": no,
            "militaryServiceConfirmation": no,
            "insurgentOrganizationConfirmation": no
        }),
        StepId::Security => json!({
            "contagiousDiseaseConfirmation": no,
            "mentalDisorderConfirmation": no,
            "drugUseConfirmation": no,
            "arrestedConfirmation": no,
            "controlledSubstancesConfirmation": no,
            "moneyLaunderingConfirmation": no,
            "humanTraffickingConfirmation": no,
            "terrorismConfirmation": no,
            "visaFraudConfirmation": no,
            "deportedConfirmation": no
        }),
    }
}
