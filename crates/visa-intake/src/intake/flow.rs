use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::domain::{ApplicationRecord, ProfileId, StepId};

/// Facts about the applicant that decide which steps are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlowContext {
    pub is_minor: bool,
    pub has_partner: bool,
}

impl FlowContext {
    /// Birth date comes from the record's personal data when filled, otherwise
    /// from `fallback_birth_date` (the profile). Unknown ages count as adults.
    pub fn from_record(
        record: Option<&ApplicationRecord>,
        fallback_birth_date: Option<NaiveDate>,
        today: NaiveDate,
        adult_age: u32,
    ) -> Self {
        let birth_date = record
            .and_then(|record| record.personal_data.birth_date)
            .or(fallback_birth_date);

        Self {
            is_minor: birth_date
                .map(|birth| age_on(birth, today) < adult_age)
                .unwrap_or(false),
            has_partner: record.map(ApplicationRecord::has_partner).unwrap_or(false),
        }
    }
}

/// Whole years between `birth` and `today`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> u32 {
    if today < birth {
        return 0;
    }
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

/// Fixed linear step sequence with the partner branch.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepFlow;

impl StepFlow {
    pub fn is_applicable(step: StepId, ctx: FlowContext) -> bool {
        match step {
            StepId::Partner => !ctx.is_minor && ctx.has_partner,
            _ => true,
        }
    }

    pub fn applicable_steps(ctx: FlowContext) -> Vec<StepId> {
        StepId::ALL
            .into_iter()
            .filter(|step| Self::is_applicable(*step, ctx))
            .collect()
    }

    /// Next shown step, or `None` once `step` is the last one.
    pub fn next_step(step: StepId, ctx: FlowContext) -> Option<StepId> {
        StepId::ALL
            .into_iter()
            .filter(|candidate| *candidate > step)
            .find(|candidate| Self::is_applicable(*candidate, ctx))
    }

    pub fn previous_step(step: StepId, ctx: FlowContext) -> Option<StepId> {
        StepId::ALL
            .into_iter()
            .rev()
            .filter(|candidate| *candidate < step)
            .find(|candidate| Self::is_applicable(*candidate, ctx))
    }

    pub fn first_step() -> StepId {
        StepId::PersonalData
    }
}

/// Where the client goes after a mutation resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Step(StepId),
    Summary,
}

impl Navigation {
    pub fn url(self, profile_id: &ProfileId) -> String {
        match self {
            Navigation::Step(step) => {
                format!("/formulario/{}?formStep={}", profile_id, step.index())
            }
            Navigation::Summary => format!("/formulario/{}/resumo", profile_id),
        }
    }

    pub fn view(self, profile_id: &ProfileId) -> NavigationView {
        NavigationView {
            kind: match self {
                Navigation::Step(_) => "step",
                Navigation::Summary => "summary",
            },
            step: match self {
                Navigation::Step(step) => Some(step.index()),
                Navigation::Summary => None,
            },
            url: self.url(profile_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationView {
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<u8>,
    pub url: String,
}

/// Progress through the applicable steps, used by the summary page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowView {
    pub profile_id: ProfileId,
    pub is_complete: bool,
    pub steps: Vec<FlowStepView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_at: Option<NavigationView>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowStepView {
    pub step: StepId,
    pub index: u8,
    pub label: &'static str,
    pub completed: bool,
}

impl FlowView {
    pub fn build(profile_id: ProfileId, record: Option<&ApplicationRecord>, ctx: FlowContext) -> Self {
        let completed = |step: StepId| {
            record
                .map(|record| record.completed_steps.contains(&step))
                .unwrap_or(false)
        };

        let steps: Vec<FlowStepView> = StepFlow::applicable_steps(ctx)
            .into_iter()
            .map(|step| FlowStepView {
                step,
                index: step.index(),
                label: step.label(),
                completed: completed(step),
            })
            .collect();

        let is_complete = record.map(|record| record.is_complete).unwrap_or(false);
        let resume_at = if is_complete {
            None
        } else {
            steps
                .iter()
                .find(|entry| !entry.completed)
                .map(|entry| Navigation::Step(entry.step).view(&profile_id))
        };

        Self {
            profile_id,
            is_complete,
            steps,
            resume_at,
        }
    }
}
