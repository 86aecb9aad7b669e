use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("empty amount")]
    Empty,
    #[error("invalid amount")]
    Invalid,
    #[error("too many decimals")]
    TooManyDecimals,
    #[error("amount too large")]
    Overflow,
}

/// Signed money amount represented as **integer cents**.
///
/// The backend speaks decimal numbers (`12.5`) and, on newer endpoints,
/// decimal strings (`"12.50"`); both are accepted when deserializing and a
/// JSON number is always written back.
///
/// ```rust
/// use api_types::Amount;
///
/// assert_eq!("10,5".parse::<Amount>().unwrap().cents(), 1050);
/// assert_eq!(Amount::new(-1234).to_string(), "-12.34");
/// assert!("12.345".parse::<Amount>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Amount(i64);

impl Amount {
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Nearest cent of a decimal value, `None` when it does not fit.
    #[must_use]
    pub fn from_decimal(value: f64) -> Option<Self> {
        let cents = (value * 100.0).round();
        if !cents.is_finite() || cents.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(Self(cents as i64))
    }

    #[must_use]
    pub fn to_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Accepts `.` or `,` as decimal separator, an optional sign and at most
    /// two fractional digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let rest = rest.trim().replace(',', ".");
        if rest.is_empty() {
            return Err(AmountError::Empty);
        }

        let (units, fraction) = match rest.split_once('.') {
            Some((units, fraction)) => (units, fraction),
            None => (rest.as_str(), ""),
        };
        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if units.is_empty() || !all_digits(units) || !all_digits(fraction) {
            return Err(AmountError::Invalid);
        }

        let units: i64 = units.parse().map_err(|_| AmountError::Overflow)?;
        let cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| AmountError::Invalid)? * 10,
            2 => fraction.parse().map_err(|_| AmountError::Invalid)?,
            _ => return Err(AmountError::TooManyDecimals),
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or(AmountError::Overflow)?;
        Ok(Amount(if negative { -total } else { total }))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireAmount {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match WireAmount::deserialize(deserializer)? {
            WireAmount::Number(value) => Amount::from_decimal(value)
                .ok_or_else(|| serde::de::Error::custom(AmountError::Overflow)),
            WireAmount::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_pads_cents() {
        assert_eq!(Amount::new(0).to_string(), "0.00");
        assert_eq!(Amount::new(7).to_string(), "0.07");
        assert_eq!(Amount::new(1050).to_string(), "10.50");
        assert_eq!(Amount::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Amount>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<Amount>().unwrap().cents(), 1050);
        assert_eq!("10,50".parse::<Amount>().unwrap().cents(), 1050);
        assert_eq!("-0.01".parse::<Amount>().unwrap().cents(), -1);
        assert_eq!(" +2.30 ".parse::<Amount>().unwrap().cents(), 230);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!("".parse::<Amount>(), Err(AmountError::Empty));
        assert_eq!("-".parse::<Amount>(), Err(AmountError::Empty));
        assert_eq!("1.2.3".parse::<Amount>(), Err(AmountError::Invalid));
        assert_eq!("abc".parse::<Amount>(), Err(AmountError::Invalid));
        assert_eq!("12.345".parse::<Amount>(), Err(AmountError::TooManyDecimals));
    }

    #[test]
    fn wire_format_accepts_numbers_and_strings() {
        let number: Amount = serde_json::from_str("12.5").unwrap();
        let text: Amount = serde_json::from_str("\"12.50\"").unwrap();
        assert_eq!(number, Amount::new(1250));
        assert_eq!(text, Amount::new(1250));
        assert_eq!(serde_json::to_string(&Amount::new(1250)).unwrap(), "12.5");
    }
}
