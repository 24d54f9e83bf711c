use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Day offsets (tracked date minus today) at which warnings start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningThresholds {
    pub expired_after_days: i64,
    pub approaching_after_days: i64,
}

impl Default for WarningThresholds {
    fn default() -> Self {
        Self {
            expired_after_days: -30,
            approaching_after_days: -20,
        }
    }
}

/// Presentational flag derived at render time; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateWarning {
    Expired,
    Approaching,
}

impl DateWarning {
    pub fn evaluate(
        date: Option<NaiveDate>,
        today: NaiveDate,
        thresholds: WarningThresholds,
    ) -> Option<Self> {
        let diff = (date? - today).num_days();
        if diff <= thresholds.expired_after_days {
            Some(DateWarning::Expired)
        } else if diff <= thresholds.approaching_after_days {
            Some(DateWarning::Approaching)
        } else {
            None
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            DateWarning::Expired => "Prazo vencido",
            DateWarning::Approaching => "Prazo próximo do vencimento",
        }
    }
}
