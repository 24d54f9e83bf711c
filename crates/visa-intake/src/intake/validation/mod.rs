//! Declarative step validation.
//!
//! Every schema is data: base constraints per field path plus a table of
//! conditional rules. A single engine evaluates any schema over the JSON form
//! of the values, so rules name fields exactly as they travel on the wire.

mod constraints;
mod rules;

pub use constraints::Constraint;
pub use rules::schema_for;

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::steps::{is_blank, StepValues};

pub const REQUIRED_MESSAGE: &str = "Campo obrigatório";
pub const REQUIRED_LIST_MESSAGE: &str = "Adicione pelo menos um item";

/// Base constraints attached to one field path.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub path: &'static str,
    pub constraints: &'static [Constraint],
}

/// When a conditional rule fires.
#[derive(Debug, Clone, Copy)]
pub enum Condition {
    /// The trigger is a confirmation answered `"Sim"`.
    Affirmative,
    /// The trigger's text equals one of the listed values.
    OneOf(&'static [&'static str]),
}

impl Condition {
    fn holds(&self, trigger: Option<&Value>) -> bool {
        let text = trigger.and_then(Value::as_str).map(str::trim);
        match self {
            Condition::Affirmative => text == Some("Sim"),
            Condition::OneOf(values) => text
                .map(|text| values.iter().any(|value| *value == text))
                .unwrap_or(false),
        }
    }
}

/// `dependents` become required while `condition` holds for `trigger`.
#[derive(Debug, Clone, Copy)]
pub struct ConditionalRule {
    pub trigger: &'static str,
    pub condition: Condition,
    pub dependents: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub fields: &'static [FieldRule],
    pub rules: &'static [ConditionalRule],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

/// Field-scoped failures in form order. Any entry blocks submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error unless the path already carries one.
    pub fn add(&mut self, path: impl Into<String>, message: impl Into<String>) {
        let path = path.into();
        if self.for_path(&path).is_none() {
            self.errors.push(FieldError {
                path,
                message: message.into(),
            });
        }
    }

    pub fn for_path(&self, path: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| error.path == path)
            .map(|error| error.message.as_str())
    }

    pub fn first(&self) -> Option<&FieldError> {
        self.errors.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => write!(f, "no validation errors"),
            [only] => write!(f, "{}: {}", only.path, only.message),
            [first, rest @ ..] => write!(
                f,
                "{}: {} (+{} more)",
                first.path,
                first.message,
                rest.len()
            ),
        }
    }
}

impl std::error::Error for ValidationErrors {}

/// Evaluate `schema` over a JSON object.
pub fn validate(schema: &Schema, values: &Value) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    for field in schema.fields {
        let value = lookup(values, field.path);
        for constraint in field.constraints {
            if let Err(message) = constraint.check(value) {
                errors.add(field.path, message);
                break;
            }
        }
    }

    for rule in schema.rules {
        if !rule.condition.holds(lookup(values, rule.trigger)) {
            continue;
        }
        for dependent in rule.dependents {
            match lookup(values, dependent) {
                Some(Value::Array(items)) if items.is_empty() => {
                    errors.add(*dependent, REQUIRED_LIST_MESSAGE)
                }
                value if value.map(is_blank).unwrap_or(true) => {
                    errors.add(*dependent, REQUIRED_MESSAGE)
                }
                _ => {}
            }
        }
    }

    errors.into_result()
}

/// Validate one step with its registered schema.
pub fn validate_step(values: &StepValues) -> Result<(), ValidationErrors> {
    let json = values.to_json().map_err(|err| {
        let mut errors = ValidationErrors::new();
        errors.add(values.step().slug(), err.to_string());
        errors
    })?;
    validate(schema_for(values.step()), &json)
}

/// Dotted paths (`image.key`) address nested objects.
fn lookup<'a>(values: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(values, |current, segment| current.get(segment))
}
