//! Display masks for Brazilian document and contact fields.
//!
//! Masks only apply once the input carries exactly the digits the full mask
//! needs; shorter or longer input is returned untouched.

pub fn digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// `46283551858` → `462.835.518-58`.
pub fn format_cpf(input: &str) -> String {
    let digits = digits(input);
    if digits.len() != 11 {
        return input.to_string();
    }
    format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    )
}

/// `03918000` → `03918-000`.
pub fn format_cep(input: &str) -> String {
    let digits = digits(input);
    if digits.len() != 8 {
        return input.to_string();
    }
    format!("{}-{}", &digits[0..5], &digits[5..8])
}

/// Landlines (10 digits) and mobiles (11 digits) with area code.
pub fn format_phone(input: &str) -> String {
    let digits = digits(input);
    match digits.len() {
        10 => format!("({}) {}-{}", &digits[0..2], &digits[2..6], &digits[6..10]),
        11 => format!("({}) {}-{}", &digits[0..2], &digits[2..7], &digits[7..11]),
        _ => input.to_string(),
    }
}

pub fn is_valid_cpf(input: &str) -> bool {
    let digits: Vec<u32> = input.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 11 || digits.iter().all(|digit| *digit == digits[0]) {
        return false;
    }

    let check = |len: usize| -> u32 {
        let sum: u32 = digits[..len]
            .iter()
            .enumerate()
            .map(|(position, digit)| digit * (len as u32 + 1 - position as u32))
            .sum();
        let remainder = sum % 11;
        if remainder < 2 {
            0
        } else {
            11 - remainder
        }
    };

    check(9) == digits[9] && check(10) == digits[10]
}

/// Mask applied to a form field, chosen by field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mask {
    Cpf,
    Cep,
    Phone,
}

/// Fields holding foreign numbers, never reformatted.
const UNMASKED_FIELDS: &[&str] = &["contactPhoneNumber"];

impl Mask {
    /// Mask for a wire field name. Brazilian phone formatting applies to
    /// `*phone` fields only; US contact numbers are kept as typed.
    pub fn for_field(field: &str) -> Option<Self> {
        if UNMASKED_FIELDS.contains(&field) {
            return None;
        }
        let lower = field.to_ascii_lowercase();
        if lower == "cpf" || lower.ends_with("cpf") {
            Some(Mask::Cpf)
        } else if lower == "cep" || lower.ends_with("cep") {
            Some(Mask::Cep)
        } else if lower.ends_with("phone") {
            Some(Mask::Phone)
        } else {
            None
        }
    }

    pub fn apply(self, input: &str) -> String {
        match self {
            Mask::Cpf => format_cpf(input),
            Mask::Cep => format_cep(input),
            Mask::Phone => format_phone(input),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpf_mask_applies_to_eleven_digits() {
        assert_eq!(format_cpf("46283551858"), "462.835.518-58");
        assert_eq!(format_cpf("462.835.518-58"), "462.835.518-58");
    }

    #[test]
    fn cpf_mask_leaves_short_input_unchanged() {
        assert_eq!(format_cpf("123"), "123");
        assert_eq!(format_cpf(""), "");
    }

    #[test]
    fn cep_mask_applies_to_eight_digits() {
        assert_eq!(format_cep("03918000"), "03918-000");
        assert_eq!(format_cep("0391"), "0391");
    }

    #[test]
    fn phone_mask_handles_landline_and_mobile() {
        assert_eq!(format_phone("1134567890"), "(11) 3456-7890");
        assert_eq!(format_phone("11987654321"), "(11) 98765-4321");
        assert_eq!(format_phone("+1 555"), "+1 555");
    }

    #[test]
    fn cpf_check_digits() {
        assert!(is_valid_cpf("462.835.518-58"));
        assert!(!is_valid_cpf("462.835.518-59"));
        assert!(!is_valid_cpf("111.111.111-11"));
        assert!(!is_valid_cpf("123"));
    }

    #[test]
    fn masks_are_chosen_by_field_name() {
        assert_eq!(Mask::for_field("cpf"), Some(Mask::Cpf));
        assert_eq!(Mask::for_field("postalCep"), Some(Mask::Cep));
        assert_eq!(Mask::for_field("cellPhone"), Some(Mask::Phone));
        assert_eq!(Mask::for_field("firstName"), None);
    }

    #[test]
    fn us_contact_phone_is_kept_as_typed() {
        assert_eq!(Mask::for_field("payerPhone"), Some(Mask::Phone));
        assert_eq!(Mask::for_field("contactPhoneNumber"), None);
    }
}
