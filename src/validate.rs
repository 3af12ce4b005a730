//! Checks applied to form and API input before it reaches the ledger.

use crate::errors::{LedgerError, Result};
use crate::models::AmountInput;

pub fn entry_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::Validation("please fill out all the fields".into()));
    }
    Ok(trimmed.to_string())
}

pub fn calorie_amount(input: &AmountInput) -> Result<i64> {
    match input {
        AmountInput::Number(value) => Ok(*value),
        AmountInput::Float(value) => Err(LedgerError::Validation(format!(
            "calorie amount {value} is not a whole number"
        ))),
        AmountInput::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Err(LedgerError::Validation("please fill out all the fields".into()));
            }
            text.parse::<i64>().map_err(|_| {
                LedgerError::Validation(format!("calorie amount '{text}' is not a whole number"))
            })
        }
    }
}

pub fn calorie_limit(input: &AmountInput) -> Result<i64> {
    calorie_amount(input).map_err(|err| match err {
        LedgerError::Validation(_) => {
            LedgerError::Validation("please fill the limit field with a whole number".into())
        }
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed() {
        assert_eq!(entry_name("  Oatmeal ").unwrap(), "Oatmeal");
        assert!(matches!(entry_name("\t"), Err(LedgerError::Validation(_))));
    }

    #[test]
    fn amounts_accept_numbers_and_numeric_text() {
        assert_eq!(calorie_amount(&AmountInput::Number(250)).unwrap(), 250);
        assert_eq!(calorie_amount(&AmountInput::Text(" 410 ".into())).unwrap(), 410);
    }

    #[test]
    fn amounts_reject_blank_and_non_numeric_text() {
        assert!(calorie_amount(&AmountInput::Text(String::new())).is_err());
        assert!(calorie_amount(&AmountInput::Text("lots".into())).is_err());
        let err = calorie_amount(&AmountInput::Float(300.5)).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(ref m) if m.contains("300.5")));
        assert!(matches!(
            calorie_limit(&AmountInput::Float(1e30)),
            Err(LedgerError::Validation(_))
        ));
        let err = calorie_limit(&AmountInput::Text("abc".into())).unwrap_err();
        assert!(err.to_string().contains("limit"));
    }
}
