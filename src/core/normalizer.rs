//! Turns raw cells into typed values under the default-on-missing policy.
//!
//! The source sheets are edited by hand, so a stray word or an empty cell
//! in an optional field degrades to the kind's default and records a
//! `DefaultedField` notice. Only mandatory fields abort the run.

use crate::error::{BudgetError, BudgetResult};
use crate::layout::FieldSpec;
use crate::types::{money, money_from_f64, Money, Notice, NormalizedValue, RawCellValue, ValueKind};
use rust_decimal::Decimal;
use std::str::FromStr;

/// A normalized value plus the notice recorded if it was defaulted
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub value: NormalizedValue,
    pub notice: Option<Notice>,
}

impl Normalized {
    fn exact(value: NormalizedValue) -> Self {
        Self {
            value,
            notice: None,
        }
    }
}

pub fn normalize(raw: &RawCellValue, spec: &FieldSpec) -> BudgetResult<Normalized> {
    match spec.kind {
        ValueKind::Monetary => normalize_money(raw, spec),
        ValueKind::Count => normalize_count(raw, spec),
        ValueKind::Text => normalize_text(raw, spec),
    }
}

fn normalize_money(raw: &RawCellValue, spec: &FieldSpec) -> BudgetResult<Normalized> {
    let parsed = match raw {
        RawCellValue::Number(n) => money_from_f64(*n),
        RawCellValue::CurrencyText(t) | RawCellValue::Text(t) => parse_money(t),
        RawCellValue::Blank => None,
    };

    match parsed {
        Some(amount) if amount.is_sign_negative() && !amount.is_zero() && !spec.signed => {
            defaulted(
                spec,
                NormalizedValue::Money(money(Decimal::ZERO)),
                format!("negative amount {amount} in an unsigned field"),
            )
        }
        Some(amount) => Ok(Normalized::exact(NormalizedValue::Money(amount))),
        None => defaulted(
            spec,
            NormalizedValue::Money(money(Decimal::ZERO)),
            describe_unreadable(raw),
        ),
    }
}

fn normalize_count(raw: &RawCellValue, spec: &FieldSpec) -> BudgetResult<Normalized> {
    let number = match raw {
        RawCellValue::Blank => {
            if spec.mandatory {
                return Err(missing(spec, "blank cell"));
            }
            return Ok(Normalized::exact(NormalizedValue::Count(0)));
        }
        RawCellValue::Number(n) => Some(*n),
        RawCellValue::CurrencyText(t) | RawCellValue::Text(t) => {
            parse_money(t).and_then(|d| d.to_string().parse::<f64>().ok())
        }
    };

    match number {
        Some(n) if n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => {
            Ok(Normalized::exact(NormalizedValue::Count(n as u32)))
        }
        Some(n) => defaulted(
            spec,
            NormalizedValue::Count(0),
            format!("{n} is not a non-negative whole number"),
        ),
        None => defaulted(spec, NormalizedValue::Count(0), describe_unreadable(raw)),
    }
}

fn normalize_text(raw: &RawCellValue, spec: &FieldSpec) -> BudgetResult<Normalized> {
    let text = match raw {
        RawCellValue::Blank => String::new(),
        RawCellValue::Number(n) => n.to_string(),
        RawCellValue::CurrencyText(t) | RawCellValue::Text(t) => t.trim().to_string(),
    };
    if text.is_empty() && spec.mandatory {
        return Err(missing(spec, "blank cell"));
    }
    Ok(Normalized::exact(NormalizedValue::Text(text)))
}

fn defaulted(spec: &FieldSpec, value: NormalizedValue, reason: String) -> BudgetResult<Normalized> {
    if spec.mandatory {
        return Err(missing(spec, &reason));
    }
    Ok(Normalized {
        value,
        notice: Some(Notice::defaulted(&spec.key, &spec.address.sheet, reason)),
    })
}

fn missing(spec: &FieldSpec, reason: &str) -> BudgetError {
    BudgetError::MissingRequiredField {
        field: spec.key.clone(),
        reason: format!("{reason} at {}", spec.address),
    }
}

fn describe_unreadable(raw: &RawCellValue) -> String {
    match raw {
        RawCellValue::Blank => "blank cell".to_string(),
        RawCellValue::Number(n) => format!("unusable number {n}"),
        RawCellValue::CurrencyText(t) | RawCellValue::Text(t) => format!("unparseable text '{t}'"),
    }
}

/// Parse a formatted amount: `$1,234.50`, `1234.5`, `-12`, `(250.00)`.
/// Returns `None` for anything that is not a plain amount.
pub fn parse_money(text: &str) -> Option<Money> {
    let trimmed = text.trim();
    let (negative, body) = match trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        Some(inner) => (true, inner),
        None => (false, trimmed),
    };

    let cleaned: String = body
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let value = Decimal::from_str(&cleaned).ok()?;
    Some(money(if negative { -value } else { value }))
}

/// Lenient read for report columns that are always optional: numbers and
/// amounts parse, anything else is zero.
pub fn money_or_zero(raw: &RawCellValue) -> Money {
    let parsed = match raw {
        RawCellValue::Number(n) => money_from_f64(*n),
        RawCellValue::CurrencyText(t) | RawCellValue::Text(t) => parse_money(t),
        RawCellValue::Blank => None,
    };
    parsed.unwrap_or_else(|| money(Decimal::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FieldAddress;
    use rust_decimal_macros::dec;

    fn money_spec() -> FieldSpec {
        FieldSpec::money("course_studio", FieldAddress::fiscal_year("FA_Summary", 5, 67))
    }

    fn text(s: &str) -> RawCellValue {
        RawCellValue::from_text(s)
    }

    #[test]
    fn test_currency_string() {
        let n = normalize(&text("$1,234.50"), &money_spec()).unwrap();
        assert_eq!(n.value, NormalizedValue::Money(dec!(1234.50)));
        assert!(n.notice.is_none());
    }

    #[test]
    fn test_number_rounds_to_cents() {
        let n = normalize(&RawCellValue::Number(104500.004), &money_spec()).unwrap();
        assert_eq!(n.value.as_money().unwrap().to_string(), "104500.00");
    }

    #[test]
    fn test_blank_money_defaults_with_notice() {
        let n = normalize(&RawCellValue::Blank, &money_spec()).unwrap();
        assert_eq!(n.value, NormalizedValue::Money(Decimal::ZERO));
        match n.notice {
            Some(Notice::DefaultedField { field, sheet, reason }) => {
                assert_eq!(field, "course_studio");
                assert_eq!(sheet, "FA_Summary");
                assert_eq!(reason, "blank cell");
            }
            other => panic!("expected DefaultedField, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_text_degrades_instead_of_failing() {
        let n = normalize(&text("see memo"), &money_spec()).unwrap();
        assert_eq!(n.value.as_money(), Some(Decimal::ZERO));
        assert!(n.notice.is_some());
    }

    #[test]
    fn test_mandatory_blank_is_fatal() {
        let spec = money_spec().mandatory();
        match normalize(&RawCellValue::Blank, &spec) {
            Err(BudgetError::MissingRequiredField { field, reason }) => {
                assert_eq!(field, "course_studio");
                assert!(reason.contains("FA_Summary"));
            }
            other => panic!("expected MissingRequiredField, got {other:?}"),
        }
        assert!(normalize(&text("n/a"), &spec).is_err());
    }

    #[test]
    fn test_negative_amounts() {
        let unsigned = normalize(&text("(250.00)"), &money_spec()).unwrap();
        assert_eq!(unsigned.value.as_money(), Some(Decimal::ZERO));
        assert!(unsigned.notice.is_some());

        let signed = normalize(&text("(250.00)"), &money_spec().signed()).unwrap();
        assert_eq!(signed.value.as_money(), Some(dec!(-250.00)));
        assert!(signed.notice.is_none());

        let minus = normalize(&RawCellValue::Number(-12.0), &money_spec().signed()).unwrap();
        assert_eq!(minus.value.as_money(), Some(dec!(-12.00)));
    }

    #[test]
    fn test_counts() {
        let spec = FieldSpec::count("standing_faculty_count", FieldAddress::cell("FA_Summary", "C", 11));
        let n = normalize(&RawCellValue::Number(7.0), &spec).unwrap();
        assert_eq!(n.value, NormalizedValue::Count(7));

        let blank = normalize(&RawCellValue::Blank, &spec).unwrap();
        assert_eq!(blank.value, NormalizedValue::Count(0));
        assert!(blank.notice.is_none());

        let fractional = normalize(&RawCellValue::Number(7.5), &spec).unwrap();
        assert_eq!(fractional.value, NormalizedValue::Count(0));
        assert!(fractional.notice.is_some());

        let texty = normalize(&text("45"), &spec).unwrap();
        assert_eq!(texty.value, NormalizedValue::Count(45));
    }

    #[test]
    fn test_text_trims() {
        let spec = FieldSpec::text("period", FieldAddress::cell("S", "A", 1));
        let n = normalize(&RawCellValue::Text("  July 2025 ".into()), &spec).unwrap();
        assert_eq!(n.value, NormalizedValue::Text("July 2025".to_string()));
        let blank = normalize(&RawCellValue::Blank, &spec).unwrap();
        assert_eq!(blank.value, NormalizedValue::Text(String::new()));
    }

    #[test]
    fn test_parse_money_variants() {
        assert_eq!(parse_money("$1,234.50"), Some(dec!(1234.50)));
        assert_eq!(parse_money(" 12 "), Some(dec!(12.00)));
        assert_eq!(parse_money("-3.456"), Some(dec!(-3.46)));
        assert_eq!(parse_money("($1,000)"), Some(dec!(-1000.00)));
        assert_eq!(parse_money("$"), None);
        assert_eq!(parse_money("12 FTE"), None);
        assert_eq!(parse_money(""), None);
    }

    #[test]
    fn test_money_or_zero() {
        assert_eq!(money_or_zero(&RawCellValue::Number(5.5)), dec!(5.50));
        assert_eq!(money_or_zero(&text("TBD")), Decimal::ZERO);
        assert_eq!(money_or_zero(&RawCellValue::Blank), Decimal::ZERO);
    }
}
