use std::{fmt, ops::Sub, str::FromStr};

use crate::LedgerError;

/// Signed money amount in **integer minor units** (cents).
///
/// The ledger stores and computes balances as raw `i64` minor units; this
/// wrapper exists for the boundaries where amounts are parsed from or shown
/// to humans (CLI, audit reports).
///
/// ```rust
/// use ledger::Money;
///
/// let m: Money = "12.30".parse().unwrap();
/// assert_eq!(m.minor(), 1230);
/// assert_eq!(m.to_string(), "12.30");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    #[must_use]
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for Money {
    fn from(minor: i64) -> Self {
        Self(minor)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl FromStr for Money {
    type Err = LedgerError;

    /// Parses a decimal string (`"10"`, `"10.5"`, `"-3.07"`) into minor
    /// units. At most two fractional digits are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::InvalidAmount(format!("invalid amount: {s:?}"));

        let trimmed = s.trim();
        let (sign, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (-1i64, rest),
            None => (1i64, trimmed),
        };
        if digits.is_empty() {
            return Err(invalid());
        }

        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };
        if whole.is_empty()
            || frac.len() > 2
            || !whole.chars().all(|c| c.is_ascii_digit())
            || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole: i64 = whole.parse().map_err(|_| invalid())?;
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };

        whole
            .checked_mul(100)
            .and_then(|v| v.checked_add(frac))
            .map(|v| Money(sign * v))
            .ok_or_else(|| LedgerError::InvalidAmount("amount too large".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_pads_minor_units() {
        assert_eq!(Money::from_minor(0).to_string(), "0.00");
        assert_eq!(Money::from_minor(7).to_string(), "0.07");
        assert_eq!(Money::from_minor(120_050).to_string(), "1200.50");
        assert_eq!(Money::from_minor(-305).to_string(), "-3.05");
    }

    #[test]
    fn parse_decimal_strings() {
        assert_eq!("10".parse::<Money>().unwrap().minor(), 1000);
        assert_eq!("10.5".parse::<Money>().unwrap().minor(), 1050);
        assert_eq!("-3.07".parse::<Money>().unwrap().minor(), -307);
        assert_eq!(" 2.30 ".parse::<Money>().unwrap().minor(), 230);
    }

    #[test]
    fn subtraction_keeps_minor_units() {
        let stored = Money::from_minor(99_999);
        let computed = Money::from_minor(15_000);
        assert_eq!((stored - computed).minor(), 84_999);
        assert_eq!((computed - stored).to_string(), "-849.99");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<Money>().is_err());
        assert!(".5".parse::<Money>().is_err());
        assert!("1.234".parse::<Money>().is_err());
        assert!("ten".parse::<Money>().is_err());
    }
}
