use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{ClientCategory, EtaTracking, PassportTracking, Profile, VisaTracking};
use super::warnings::{DateWarning, WarningThresholds};
use crate::intake::domain::ProfileId;
use crate::intake::masks::digits;

/// Grid column. Which ones are visible depends on the category being viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Column {
    Name,
    Email,
    Phone,
    Category,
    Status,
    TrackedDate,
    VisaStatus,
    InterviewDate,
    ScheduledOn,
    PassportStatus,
    ShippingStatus,
    SentOn,
    EtaStatus,
    RequestedOn,
    Warning,
}

impl Column {
    pub const fn key(self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::Email => "email",
            Column::Phone => "phone",
            Column::Category => "category",
            Column::Status => "status",
            Column::TrackedDate => "trackedDate",
            Column::VisaStatus => "visaStatus",
            Column::InterviewDate => "interviewDate",
            Column::ScheduledOn => "scheduledOn",
            Column::PassportStatus => "passportStatus",
            Column::ShippingStatus => "shippingStatus",
            Column::SentOn => "sentOn",
            Column::EtaStatus => "etaStatus",
            Column::RequestedOn => "requestedOn",
            Column::Warning => "warning",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Column::Name => "Nome",
            Column::Email => "E-mail",
            Column::Phone => "Telefone",
            Column::Category => "Categoria",
            Column::Status => "Status",
            Column::TrackedDate => "Data de acompanhamento",
            Column::VisaStatus => "Status do visto",
            Column::InterviewDate => "Data da entrevista",
            Column::ScheduledOn => "Agendado em",
            Column::PassportStatus => "Status do passaporte",
            Column::ShippingStatus => "Envio",
            Column::SentOn => "Enviado em",
            Column::EtaStatus => "Status do E-TA",
            Column::RequestedOn => "Solicitado em",
            Column::Warning => "Alerta",
        }
    }
}

/// Ordered visible columns for one view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnSet(Vec<Column>);

impl ColumnSet {
    pub fn for_category(category: Option<ClientCategory>) -> Self {
        let specific: &[Column] = match category {
            Some(ClientCategory::AmericanVisa) => &[
                Column::VisaStatus,
                Column::InterviewDate,
                Column::ScheduledOn,
            ],
            Some(ClientCategory::Passport) => &[
                Column::PassportStatus,
                Column::ShippingStatus,
                Column::SentOn,
            ],
            Some(ClientCategory::Eta) => &[Column::EtaStatus, Column::RequestedOn],
            None => &[Column::Status, Column::TrackedDate],
        };

        let mut columns = vec![Column::Name, Column::Email, Column::Phone, Column::Category];
        columns.extend_from_slice(specific);
        columns.push(Column::Warning);
        Self(columns)
    }

    pub fn columns(&self) -> &[Column] {
        &self.0
    }

    pub fn contains(&self, column: Column) -> bool {
        self.0.contains(&column)
    }
}

/// Summary of one client as shown in the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRow {
    pub profile_id: ProfileId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub cpf: String,
    pub category: ClientCategory,
    pub is_prospect: bool,
    pub status: &'static str,
    pub tracked_date: Option<NaiveDate>,
    pub warning: Option<DateWarning>,
    #[serde(skip)]
    visa: VisaTracking,
    #[serde(skip)]
    passport: PassportTracking,
    #[serde(skip)]
    eta: EtaTracking,
}

/// Typed cell content, used for sorting.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue {
    Date(NaiveDate),
    Text(String),
}

impl ClientRow {
    pub fn from_profile(profile: &Profile, today: NaiveDate, thresholds: WarningThresholds) -> Self {
        let tracked_date = profile.tracked_date();
        Self {
            profile_id: profile.id.clone(),
            name: profile.name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            cpf: profile.cpf.clone(),
            category: profile.category,
            is_prospect: profile.is_prospect,
            status: profile.status_label(),
            tracked_date,
            warning: DateWarning::evaluate(tracked_date, today, thresholds),
            visa: profile.visa.clone(),
            passport: profile.passport.clone(),
            eta: profile.eta.clone(),
        }
    }

    pub fn warning_label(&self) -> &'static str {
        self.warning.map(DateWarning::label).unwrap_or_default()
    }

    /// Display text of a cell; empty when the value is unset.
    pub fn cell(&self, column: Column) -> String {
        match self.sort_value(column) {
            Some(SortValue::Date(date)) => date.format("%d/%m/%Y").to_string(),
            Some(SortValue::Text(text)) => text,
            None => String::new(),
        }
    }

    fn sort_value(&self, column: Column) -> Option<SortValue> {
        let text = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| SortValue::Text(value.to_string()))
        };
        let date = |value: Option<NaiveDate>| value.map(SortValue::Date);

        match column {
            Column::Name => text(&self.name),
            Column::Email => text(&self.email),
            Column::Phone => text(&self.phone),
            Column::Category => text(self.category.label()),
            Column::Status => text(self.status),
            Column::TrackedDate => date(self.tracked_date),
            Column::VisaStatus => text(self.visa.status.label()),
            Column::InterviewDate => date(self.visa.interview_date),
            Column::ScheduledOn => date(self.visa.scheduled_on),
            Column::PassportStatus => text(self.passport.status.label()),
            Column::ShippingStatus => text(self.passport.shipping.label()),
            Column::SentOn => date(self.passport.sent_on),
            Column::EtaStatus => text(self.eta.status.label()),
            Column::RequestedOn => date(self.eta.requested_on),
            Column::Warning => text(self.warning_label()),
        }
    }

    fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let needle_digits = digits(&needle);
        self.name.to_lowercase().contains(&needle)
            || self.email.to_lowercase().contains(&needle)
            || self.cpf.contains(&needle)
            || (needle_digits.len() >= 3 && digits(&self.cpf).contains(&needle_digits))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Filters and ordering of the client grid, as read from the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableQuery {
    pub category: Option<ClientCategory>,
    pub query: Option<String>,
    pub prospects: Option<bool>,
    pub sort: Option<Column>,
    pub direction: SortDirection,
}

impl TableQuery {
    pub fn for_category(category: ClientCategory) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    /// Filter then sort. The sort is stable and empty cells always go last.
    pub fn apply(&self, rows: Vec<ClientRow>) -> Vec<ClientRow> {
        let mut rows: Vec<ClientRow> = rows
            .into_iter()
            .filter(|row| self.category.map_or(true, |category| row.category == category))
            .filter(|row| self.prospects.map_or(true, |flag| row.is_prospect == flag))
            .filter(|row| self.query.as_deref().map_or(true, |query| row.matches_text(query)))
            .collect();

        if let Some(column) = self.sort {
            let direction = self.direction;
            rows.sort_by(|left, right| {
                match (left.sort_value(column), right.sort_value(column)) {
                    (None, None) => Ordering::Equal,
                    (None, Some(_)) => Ordering::Greater,
                    (Some(_), None) => Ordering::Less,
                    (Some(left), Some(right)) => {
                        let ordering = compare_values(&left, &right);
                        match direction {
                            SortDirection::Asc => ordering,
                            SortDirection::Desc => ordering.reverse(),
                        }
                    }
                }
            });
        }
        rows
    }
}

fn compare_values(left: &SortValue, right: &SortValue) -> Ordering {
    match (left, right) {
        (SortValue::Text(left), SortValue::Text(right)) => {
            left.to_lowercase().cmp(&right.to_lowercase())
        }
        _ => left.cmp(right),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnView {
    pub key: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    pub profile_id: ProfileId,
    pub is_prospect: bool,
    pub warning: Option<DateWarning>,
    pub cells: BTreeMap<&'static str, String>,
}

/// Rendered grid: visible columns plus one cell per visible column and row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub category: Option<ClientCategory>,
    #[serde(skip)]
    pub column_set: ColumnSet,
    pub columns: Vec<ColumnView>,
    pub rows: Vec<RowView>,
    pub total: usize,
}

impl TableView {
    pub fn build(query: &TableQuery, rows: Vec<ClientRow>) -> Self {
        let column_set = ColumnSet::for_category(query.category);
        let rows = query.apply(rows);

        let columns = column_set
            .columns()
            .iter()
            .map(|column| ColumnView {
                key: column.key(),
                label: column.label(),
            })
            .collect();
        let rows: Vec<RowView> = rows
            .iter()
            .map(|row| RowView {
                profile_id: row.profile_id.clone(),
                is_prospect: row.is_prospect,
                warning: row.warning,
                cells: column_set
                    .columns()
                    .iter()
                    .map(|column| (column.key(), row.cell(*column)))
                    .collect(),
            })
            .collect();

        Self {
            category: query.category,
            total: rows.len(),
            column_set,
            columns,
            rows,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush csv buffer: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv output is not valid utf-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// CSV of the view's visible columns, labels as the header row.
pub fn export_csv(view: &TableView) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(view.column_set.columns().iter().map(|column| column.label()))?;
    for row in &view.rows {
        let record = view
            .column_set
            .columns()
            .iter()
            .map(|column| row.cells.get(column.key()).map(String::as_str).unwrap_or_default());
        writer.write_record(record)?;
    }
    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::domain::{ShippingStatus, VisaStatus};
    use chrono::{TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
    }

    fn profile(id: &str, name: &str, category: ClientCategory) -> Profile {
        Profile {
            id: ProfileId(id.to_string()),
            name: name.to_string(),
            email: format!("{id}@example.com"),
            phone: String::new(),
            cpf: String::new(),
            birth_date: None,
            category,
            is_prospect: false,
            visa: VisaTracking::default(),
            passport: PassportTracking::default(),
            eta: EtaTracking::default(),
            created_at: Utc
                .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    fn rows(profiles: &[Profile]) -> Vec<ClientRow> {
        profiles
            .iter()
            .map(|profile| ClientRow::from_profile(profile, today(), WarningThresholds::default()))
            .collect()
    }

    fn names(rows: &[ClientRow]) -> Vec<&str> {
        rows.iter().map(|row| row.name.as_str()).collect()
    }

    #[test]
    fn column_sets_follow_the_category() {
        let visa = ColumnSet::for_category(Some(ClientCategory::AmericanVisa));
        assert!(visa.contains(Column::InterviewDate));
        assert!(!visa.contains(Column::ShippingStatus));

        let passport = ColumnSet::for_category(Some(ClientCategory::Passport));
        assert!(passport.contains(Column::ShippingStatus));
        assert!(passport.contains(Column::SentOn));

        let eta = ColumnSet::for_category(Some(ClientCategory::Eta));
        assert_eq!(
            eta.columns(),
            &[
                Column::Name,
                Column::Email,
                Column::Phone,
                Column::Category,
                Column::EtaStatus,
                Column::RequestedOn,
                Column::Warning,
            ]
        );
    }

    #[test]
    fn sort_is_stable_and_puts_empty_dates_last() {
        let mut first = profile("a", "Ana", ClientCategory::AmericanVisa);
        first.visa.scheduled_on = NaiveDate::from_ymd_opt(2026, 9, 1);
        let second = profile("b", "Bruno", ClientCategory::AmericanVisa);
        let mut third = profile("c", "Carla", ClientCategory::AmericanVisa);
        third.visa.scheduled_on = NaiveDate::from_ymd_opt(2026, 8, 1);
        let fourth = profile("d", "Diego", ClientCategory::AmericanVisa);

        let mut query = TableQuery {
            sort: Some(Column::ScheduledOn),
            ..TableQuery::default()
        };
        let all = rows(&[first, second, third, fourth]);
        assert_eq!(names(&query.apply(all.clone())), ["Carla", "Ana", "Bruno", "Diego"]);

        query.direction = SortDirection::Desc;
        assert_eq!(names(&query.apply(all)), ["Ana", "Carla", "Bruno", "Diego"]);
    }

    #[test]
    fn text_query_matches_name_email_and_cpf_digits() {
        let mut maria = profile("m", "Maria Souza", ClientCategory::Passport);
        maria.cpf = "462.835.518-58".to_string();
        let joao = profile("j", "João Lima", ClientCategory::Passport);
        let all = rows(&[maria, joao]);

        let by_name = TableQuery {
            query: Some("SOUZA".to_string()),
            ..TableQuery::default()
        };
        assert_eq!(names(&by_name.apply(all.clone())), ["Maria Souza"]);

        let by_cpf = TableQuery {
            query: Some("46283551858".to_string()),
            ..TableQuery::default()
        };
        assert_eq!(names(&by_cpf.apply(all.clone())), ["Maria Souza"]);

        let by_email = TableQuery {
            query: Some("j@example".to_string()),
            ..TableQuery::default()
        };
        assert_eq!(names(&by_email.apply(all)), ["João Lima"]);
    }

    #[test]
    fn rows_carry_status_labels_and_warnings() {
        let mut client = profile("p", "Paula", ClientCategory::Passport);
        client.passport.shipping = ShippingStatus::Sent;
        client.passport.sent_on = NaiveDate::from_ymd_opt(2026, 9, 10);
        let mut visa = profile("v", "Vitor", ClientCategory::AmericanVisa);
        visa.visa.status = VisaStatus::Scheduled;

        let rows = rows(&[client, visa]);
        assert_eq!(rows[0].warning, Some(DateWarning::Expired));
        assert_eq!(rows[0].cell(Column::ShippingStatus), "Enviado");
        assert_eq!(rows[0].cell(Column::SentOn), "10/09/2026");
        assert_eq!(rows[1].status, "Agendado");
        assert_eq!(rows[1].warning, None);
    }

    #[test]
    fn csv_export_contains_visible_columns_only() {
        let mut client = profile("p", "Paula", ClientCategory::Eta);
        client.eta.requested_on = NaiveDate::from_ymd_opt(2026, 10, 1);
        let view = TableView::build(
            &TableQuery::for_category(ClientCategory::Eta),
            rows(&[client, profile("x", "Xavier", ClientCategory::Passport)]),
        );

        let csv = export_csv(&view).expect("exports");
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Nome,E-mail,Telefone,Categoria,Status do E-TA,Solicitado em,Alerta")
        );
        assert_eq!(
            lines.next(),
            Some("Paula,p@example.com,,E-TA,Não solicitado,01/10/2026,")
        );
        assert_eq!(lines.next(), None);
    }
}
