//! Exact ruble amounts backed by rust_decimal.
//!
//! Money is always derived from points, never accumulated per event, so the
//! representation must survive unlimited replays without drift.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A ruble amount with exact decimal arithmetic.
///
/// Serializes to a JSON number. Formatting is canonical (no exponent
/// notation, no trailing zeros).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Rubles(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Rubles {
    pub fn new(value: Decimal) -> Self {
        Rubles(value)
    }

    /// Parse from a string losslessly.
    ///
    /// # Errors
    /// Returns an error if the string is not a valid decimal number.
    pub fn from_str_canonical(s: &str) -> Result<Self, rust_decimal::Error> {
        Decimal::from_str(s).map(Rubles)
    }

    /// A whole-ruble amount.
    pub fn from_whole(rubles: i64) -> Self {
        Rubles(Decimal::from(rubles))
    }

    pub fn zero() -> Self {
        Rubles(Decimal::ZERO)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    pub fn inner(&self) -> Decimal {
        self.0
    }

    /// Canonical string form, no exponent notation.
    pub fn to_canonical_string(&self) -> String {
        format!("{}", self.0.normalize())
    }
}

impl fmt::Display for Rubles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl FromStr for Rubles {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_canonical(s)
    }
}

impl From<Decimal> for Rubles {
    fn from(value: Decimal) -> Self {
        Rubles(value)
    }
}

impl From<Rubles> for Decimal {
    fn from(value: Rubles) -> Self {
        value.0
    }
}

impl std::ops::Add for Rubles {
    type Output = Rubles;

    fn add(self, rhs: Rubles) -> Rubles {
        Rubles(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Rubles {
    type Output = Rubles;

    fn sub(self, rhs: Rubles) -> Rubles {
        Rubles(self.0 - rhs.0)
    }
}

impl std::ops::Neg for Rubles {
    type Output = Rubles;

    fn neg(self) -> Rubles {
        Rubles(-self.0)
    }
}

/// Points-times-price, the only multiplication the ledger needs.
impl std::ops::Mul<i64> for Rubles {
    type Output = Rubles;

    fn mul(self, points: i64) -> Rubles {
        Rubles(self.0 * Decimal::from(points))
    }
}
