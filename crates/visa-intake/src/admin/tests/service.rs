use super::common::*;
use crate::admin::domain::{BannerId, ClientCategory};
use crate::admin::repository::ProfileRepository;
use crate::admin::service::{AdminServiceError, BANNER_NOT_FOUND_MESSAGE, CLIENT_NOT_FOUND_MESSAGE};
use crate::admin::table::{Column, SortDirection, TableQuery};
use crate::admin::warnings::DateWarning;
use crate::intake::domain::ProfileId;

#[test]
fn client_table_filters_by_category_with_its_columns() {
    let (service, _, _, _) = build_service();

    let view = service
        .client_table(&TableQuery::for_category(ClientCategory::AmericanVisa))
        .expect("table");

    assert_eq!(view.total, 2);
    let keys: Vec<&str> = view.columns.iter().map(|column| column.key).collect();
    assert!(keys.contains(&"interviewDate"));
    assert!(!keys.contains(&"shippingStatus"));
    assert_eq!(view.rows[0].cells["name"], "Ana Ribeiro");
    assert_eq!(view.rows[0].cells["visaStatus"], "Agendado");
    assert_eq!(view.rows[0].warning, Some(DateWarning::Expired));
    assert_eq!(view.rows[0].cells["warning"], "Prazo vencido");
}

#[test]
fn client_table_sorts_and_searches_across_categories() {
    let (service, _, _, _) = build_service();

    let query = TableQuery {
        sort: Some(Column::Name),
        direction: SortDirection::Desc,
        ..TableQuery::default()
    };
    let view = service.client_table(&query).expect("table");
    let names: Vec<&str> = view
        .rows
        .iter()
        .map(|row| row.cells["name"].as_str())
        .collect();
    assert_eq!(names, ["Davi Nunes", "Carla Dias", "Bruno Lima", "Ana Ribeiro"]);

    let query = TableQuery {
        query: Some("462.835".to_string()),
        ..TableQuery::default()
    };
    let view = service.client_table(&query).expect("table");
    assert_eq!(view.total, 1);
    assert_eq!(view.rows[0].profile_id, ProfileId("cli-carla".to_string()));
    assert_eq!(view.rows[0].warning, Some(DateWarning::Approaching));
}

#[test]
fn client_details_include_application_progress() {
    let (service, _, _, _) = build_service();

    let details = service
        .client_details(&ProfileId("cli-ana".to_string()))
        .expect("details");

    assert_eq!(details.category_label, "Visto americano");
    assert_eq!(details.status, "Agendado");
    assert_eq!(details.warning_label, Some("Prazo vencido"));
    assert_eq!(details.completed_steps, 2);
    assert!(!details.is_complete);

    let without_form = service
        .client_details(&ProfileId("cli-davi".to_string()))
        .expect("details");
    assert!(without_form.application.is_none());
}

#[test]
fn missing_client_is_not_found() {
    let (service, _, _, _) = build_service();

    match service.client_details(&ProfileId("ghost".to_string())) {
        Err(AdminServiceError::NotFound(message)) => assert_eq!(message, CLIENT_NOT_FOUND_MESSAGE),
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn prospects_are_filtered_by_category() {
    let (service, _, _, _) = build_service();

    let eta = service.prospects(ClientCategory::Eta).expect("prospects");
    assert_eq!(eta.len(), 1);
    assert_eq!(eta[0].name, "Davi Nunes");

    assert!(service
        .prospects(ClientCategory::AmericanVisa)
        .expect("prospects")
        .is_empty());
}

#[test]
fn export_uses_the_visible_columns() {
    let (service, _, _, _) = build_service();

    let csv = service
        .export_csv(&TableQuery::for_category(ClientCategory::Passport))
        .expect("csv");

    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("Nome,E-mail,Telefone,Categoria,Status do passaporte,Envio,Enviado em,Alerta")
    );
    let row = lines.next().expect("one client");
    assert!(row.starts_with("Carla Dias,cli-carla@example.com"));
    assert!(row.ends_with("Enviado,27/09/2026,Prazo próximo do vencimento"));
    assert_eq!(lines.next(), None);
}

#[test]
fn upsert_profile_creates_then_edits_keeping_creation_time() {
    let (service, profiles, _, _) = build_service();

    let created = service.upsert_profile(profile_input()).expect("created");
    assert!(created.id.0.starts_with("cliente-"));
    assert_eq!(created.email, "elisa@example.com");
    assert_eq!(created.cpf, "462.835.518-58");
    assert_eq!(created.phone, "(11) 98765-4321");

    let mut edit = profile_input();
    edit.id = Some(created.id.clone());
    edit.is_prospect = false;
    let edited = service.upsert_profile(edit).expect("edited");

    assert_eq!(edited.created_at, created.created_at);
    let stored = profiles
        .fetch(&created.id)
        .expect("fetch")
        .expect("stored");
    assert!(!stored.is_prospect);
}

#[test]
fn passport_profiles_require_a_cpf() {
    let (service, _, _, _) = build_service();
    let mut input = profile_input();
    input.cpf = String::new();

    match service.upsert_profile(input) {
        Err(AdminServiceError::Validation(errors)) => {
            assert!(errors.for_path("cpf").is_some());
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn banners_are_created_updated_and_listed() {
    let (service, _, _, _) = build_service();

    let banner = service.create_banner(banner_input()).expect("created");
    assert_eq!(banner.image.content_type, "image/png");

    let mut update = banner_input();
    update.title = "Promoção de inverno".to_string();
    update.active = false;
    let updated = service.update_banner(&banner.id, update).expect("updated");
    assert_eq!(updated.created_at, banner.created_at);
    assert!(!updated.active);

    let listed = service.banners().expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Promoção de inverno");
}

#[test]
fn updating_an_unknown_banner_is_not_found() {
    let (service, _, _, _) = build_service();

    match service.update_banner(&BannerId("banner-999".to_string()), banner_input()) {
        Err(AdminServiceError::NotFound(message)) => assert_eq!(message, BANNER_NOT_FOUND_MESSAGE),
        other => panic!("expected not found, got {other:?}"),
    }
}
