use serde_json::Value;

use super::super::masks::{digits, is_valid_cpf};
use super::super::steps::is_blank;
use super::{REQUIRED_LIST_MESSAGE, REQUIRED_MESSAGE};

/// Base constraint on a single field. Only `Required` and `NonEmptyList`
/// reject blank values; the format checks skip them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    Required,
    MinLength(usize),
    Cpf,
    Cep,
    Email,
    Phone,
    NonEmptyList,
}

impl Constraint {
    pub(crate) fn check(&self, value: Option<&Value>) -> Result<(), &'static str> {
        let blank = value.map(is_blank).unwrap_or(true);
        match self {
            Constraint::Required => {
                if blank {
                    Err(REQUIRED_MESSAGE)
                } else {
                    Ok(())
                }
            }
            Constraint::NonEmptyList => match value {
                Some(Value::Array(items)) if !items.is_empty() => Ok(()),
                _ => Err(REQUIRED_LIST_MESSAGE),
            },
            _ if blank => Ok(()),
            Constraint::MinLength(min) => {
                let length = text(value).trim().chars().count();
                if length >= *min {
                    Ok(())
                } else {
                    Err("Valor muito curto")
                }
            }
            Constraint::Cpf => {
                if is_valid_cpf(text(value)) {
                    Ok(())
                } else {
                    Err("CPF inválido")
                }
            }
            Constraint::Cep => {
                if digits(text(value)).len() == 8 {
                    Ok(())
                } else {
                    Err("CEP inválido")
                }
            }
            Constraint::Email => {
                if looks_like_email(text(value)) {
                    Ok(())
                } else {
                    Err("E-mail inválido")
                }
            }
            Constraint::Phone => {
                if matches!(digits(text(value)).len(), 10 | 11) {
                    Ok(())
                } else {
                    Err("Telefone inválido")
                }
            }
        }
    }
}

fn text(value: Option<&Value>) -> &str {
    value.and_then(Value::as_str).unwrap_or_default()
}

fn looks_like_email(raw: &str) -> bool {
    let raw = raw.trim();
    if raw.chars().any(char::is_whitespace) {
        return false;
    }
    match raw.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .map(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
                    .unwrap_or(false)
        }
        None => false,
    }
}
