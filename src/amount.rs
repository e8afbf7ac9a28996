//! Exact monetary amounts parsed from ambiguous numeric notations
//!
//! Source documents write money the Brazilian way (`50.000,00`), but values
//! that went through a spreadsheet or a JSON encoder arrive dot-separated
//! (`1234.56`) or as plain JSON numbers. [`MonetaryAmount::parse`] accepts all
//! of them and never fails: anything it cannot read becomes zero.

use bigdecimal::{BigDecimal, RoundingMode};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Number of fractional digits carried by every amount
pub const MONETARY_SCALE: i64 = 2;

/// Raw spellings that upstream extraction uses for "no value"
const EMPTY_SENTINELS: &[&str] = &["", "0", "0,00", "0.00", "undefined", "null"];

const CURRENCY_MARKER: &str = "R$";

/// An exact decimal value with two fractional digits
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonetaryAmount(BigDecimal);

impl MonetaryAmount {
    /// Wrap a decimal, rounding half-up to two fractional digits
    pub fn new(value: BigDecimal) -> Self {
        let rounded = value.with_scale_round(MONETARY_SCALE, RoundingMode::HalfUp);
        if rounded == BigDecimal::from(0) {
            return Self::zero();
        }
        Self(rounded)
    }

    /// The zero amount (`0.00`)
    pub fn zero() -> Self {
        Self(BigDecimal::from(0).with_scale(MONETARY_SCALE))
    }

    /// Parse a numeric string in either comma-decimal or dot-decimal notation.
    ///
    /// When the string contains a comma, dots are thousands separators and the
    /// comma is the decimal point. Otherwise the string is read as dot-decimal.
    /// Empty sentinels and unparseable residue yield `0.00`. Exponent
    /// notation is residue.
    pub fn parse(raw: &str) -> Self {
        let cleaned = clean_numeric(raw);
        if is_empty_sentinel(&cleaned) {
            return Self::zero();
        }

        let normalized = if cleaned.contains(',') {
            cleaned.replace('.', "").replace(',', ".")
        } else {
            cleaned
        };

        if !is_plain_decimal(&normalized) {
            log::debug!("Unparseable amount {:?}, defaulting to zero", raw);
            return Self::zero();
        }

        match BigDecimal::from_str(&normalized) {
            Ok(value) => Self::new(value),
            Err(_) => {
                log::debug!("Unparseable amount {:?}, defaulting to zero", raw);
                Self::zero()
            }
        }
    }

    /// Normalize a raw JSON field value (string, number or null)
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::parse(s),
            Value::Number(n) => Self::parse(&n.to_string()),
            _ => Self::zero(),
        }
    }

    /// Borrow the underlying decimal
    pub fn as_decimal(&self) -> &BigDecimal {
        &self.0
    }

    /// Consume the amount, returning the underlying decimal
    pub fn into_decimal(self) -> BigDecimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == BigDecimal::from(0)
    }

    pub fn is_negative(&self) -> bool {
        self.0 < BigDecimal::from(0)
    }

    /// Render in source-document notation (`1.234,56`).
    ///
    /// The output parses back to the same amount.
    pub fn to_br_string(&self) -> String {
        let plain = self.to_string();
        let (sign, digits) = match plain.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", plain.as_str()),
        };
        let (integer, fraction) = digits.split_once('.').unwrap_or((digits, "00"));

        let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
        for (i, ch) in integer.chars().enumerate() {
            if i > 0 && (integer.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        format!("{}{},{}", sign, grouped, fraction)
    }
}

/// Normalize any raw JSON value into an amount. Never fails.
pub fn parse_amount(value: &Value) -> MonetaryAmount {
    MonetaryAmount::from_value(value)
}

fn clean_numeric(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_marker = trimmed.strip_prefix(CURRENCY_MARKER).unwrap_or(trimmed);

    let compact: String = without_marker
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .collect();

    compact.trim_end_matches('.').to_string()
}

/// Optional minus sign, digits and at most one `.`, with at least one digit
fn is_plain_decimal(candidate: &str) -> bool {
    let unsigned = candidate.strip_prefix('-').unwrap_or(candidate);
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    !(integer.is_empty() && fraction.is_empty())
        && integer.chars().all(|c| c.is_ascii_digit())
        && fraction.chars().all(|c| c.is_ascii_digit())
}

fn is_empty_sentinel(cleaned: &str) -> bool {
    EMPTY_SENTINELS
        .iter()
        .any(|sentinel| cleaned.eq_ignore_ascii_case(sentinel))
}

impl Default for MonetaryAmount {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for MonetaryAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<BigDecimal> for MonetaryAmount {
    fn from(value: BigDecimal) -> Self {
        Self::new(value)
    }
}

impl Add for MonetaryAmount {
    type Output = MonetaryAmount;

    fn add(self, rhs: MonetaryAmount) -> MonetaryAmount {
        Self::new(self.0 + rhs.0)
    }
}

impl<'a> Add<&'a MonetaryAmount> for &'a MonetaryAmount {
    type Output = MonetaryAmount;

    fn add(self, rhs: &'a MonetaryAmount) -> MonetaryAmount {
        MonetaryAmount::new(&self.0 + &rhs.0)
    }
}

impl Sub for MonetaryAmount {
    type Output = MonetaryAmount;

    fn sub(self, rhs: MonetaryAmount) -> MonetaryAmount {
        Self::new(self.0 - rhs.0)
    }
}

impl<'a> Sub<&'a MonetaryAmount> for &'a MonetaryAmount {
    type Output = MonetaryAmount;

    fn sub(self, rhs: &'a MonetaryAmount) -> MonetaryAmount {
        MonetaryAmount::new(&self.0 - &rhs.0)
    }
}

impl Sum for MonetaryAmount {
    fn sum<I: Iterator<Item = MonetaryAmount>>(iter: I) -> Self {
        iter.fold(MonetaryAmount::zero(), |acc, amount| acc + amount)
    }
}

impl<'a> Sum<&'a MonetaryAmount> for MonetaryAmount {
    fn sum<I: Iterator<Item = &'a MonetaryAmount>>(iter: I) -> Self {
        MonetaryAmount::new(iter.map(|amount| &amount.0).sum())
    }
}

// Amounts travel as dot-decimal strings so no precision is lost in JSON, and
// anything read back goes through the same lenient parser.
impl Serialize for MonetaryAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonetaryAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(MonetaryAmount::from_value(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn amount(s: &str) -> MonetaryAmount {
        MonetaryAmount::parse(s)
    }

    fn decimal(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_empty_sentinels_are_zero() {
        for raw in ["", "0", "0,00", "undefined", "  ", "UNDEFINED"] {
            assert_eq!(amount(raw), MonetaryAmount::zero(), "input {:?}", raw);
        }
        assert_eq!(parse_amount(&Value::Null), MonetaryAmount::zero());
        assert_eq!(MonetaryAmount::zero().to_string(), "0.00");
    }

    #[test]
    fn test_comma_decimal_notation() {
        assert_eq!(amount("50.000,00").as_decimal(), &decimal("50000.00"));
        assert_eq!(amount("10,5").as_decimal(), &decimal("10.50"));
        assert_eq!(amount("1.234.567,89").as_decimal(), &decimal("1234567.89"));
        assert_eq!(amount("10,5").to_string(), "10.50");
    }

    #[test]
    fn test_dot_decimal_notation() {
        assert_eq!(amount("1234.56").as_decimal(), &decimal("1234.56"));
        assert_eq!(amount("42").to_string(), "42.00");
    }

    #[test]
    fn test_source_document_noise_is_stripped() {
        assert_eq!(amount("R$ 1.500,00").as_decimal(), &decimal("1500"));
        assert_eq!(amount(" 2.000,10 ").as_decimal(), &decimal("2000.10"));
        assert_eq!(amount("3.000,00.").as_decimal(), &decimal("3000"));
        assert_eq!(amount("1 234,00").as_decimal(), &decimal("1234"));
    }

    #[test]
    fn test_malformed_numeric_is_zero() {
        for raw in ["abc", "12,34,56", "NaN", "1.2.3", "--5", "R$"] {
            assert_eq!(amount(raw), MonetaryAmount::zero(), "input {:?}", raw);
        }
    }

    #[test]
    fn test_exponent_notation_is_residue() {
        for raw in ["1e5", "1e99999999", "1E-3", "1e-99999999", "2,5e3", "-1e7"] {
            let parsed = amount(raw);
            assert_eq!(parsed, MonetaryAmount::zero(), "input {:?}", raw);
            assert_eq!(parsed.to_string(), "0.00", "input {:?}", raw);
        }
    }

    #[test]
    fn test_plain_decimal_shapes() {
        assert_eq!(amount("5.").to_string(), "5.00");
        assert_eq!(amount("-7.25").to_string(), "-7.25");
        assert_eq!(amount("1.2.3").to_string(), "0.00");
        assert_eq!(amount("-.").to_string(), "0.00");
        assert_eq!(amount("١٢").to_string(), "0.00");
    }

    #[test]
    fn test_tiny_values_round_to_two_place_zero() {
        let tiny = MonetaryAmount::new(decimal("0.0000001"));
        assert_eq!(tiny.to_string(), "0.00");
        assert_eq!(MonetaryAmount::new(decimal("-0.001")).to_string(), "0.00");
    }

    #[test]
    fn test_signed_values() {
        let balance = amount("-1.234,56");
        assert!(balance.is_negative());
        assert_eq!(balance.as_decimal(), &decimal("-1234.56"));
        assert_eq!(balance.to_br_string(), "-1.234,56");
    }

    #[test]
    fn test_rounds_half_up_to_cents() {
        assert_eq!(amount("0,125").to_string(), "0.13");
        assert_eq!(amount("7.004").to_string(), "7.00");
    }

    #[test]
    fn test_json_values() {
        assert_eq!(parse_amount(&json!(1234.56)).to_string(), "1234.56");
        assert_eq!(parse_amount(&json!(50000)).to_string(), "50000.00");
        assert_eq!(parse_amount(&json!("50.000,00")).to_string(), "50000.00");
        assert_eq!(parse_amount(&json!(true)), MonetaryAmount::zero());
        assert_eq!(parse_amount(&json!({"valor": 10})), MonetaryAmount::zero());
        assert_eq!(parse_amount(&json!([1, 2])), MonetaryAmount::zero());
    }

    #[test]
    fn test_parse_is_idempotent_on_output() {
        for raw in ["50.000,00", "1234.56", "10,5", "", "R$ 999.999,99", "-12,3", "junk"] {
            let first = amount(raw);
            assert_eq!(amount(&first.to_string()), first, "plain form of {:?}", raw);
            assert_eq!(amount(&first.to_br_string()), first, "br form of {:?}", raw);
        }
    }

    #[test]
    fn test_br_formatting() {
        assert_eq!(amount("1234567.8").to_br_string(), "1.234.567,80");
        assert_eq!(amount("999").to_br_string(), "999,00");
        assert_eq!(MonetaryAmount::zero().to_br_string(), "0,00");
    }

    #[test]
    fn test_arithmetic_stays_exact() {
        let total: MonetaryAmount = ["0,10", "0,20", "0,30"].iter().map(|s| amount(s)).sum();
        assert_eq!(total, amount("0.60"));
        assert_eq!(&amount("100") - &amount("250,50"), amount("-150.50"));
    }

    #[test]
    fn test_serde_as_string() {
        let value = serde_json::to_value(amount("1.234,50")).unwrap();
        assert_eq!(value, json!("1234.50"));

        let back: MonetaryAmount = serde_json::from_value(value).unwrap();
        assert_eq!(back, amount("1234.5"));

        let lenient: MonetaryAmount = serde_json::from_value(json!(null)).unwrap();
        assert!(lenient.is_zero());
    }
}
