//! Fixed-point money type with 2 decimal places, plus the checked decimal
//! arithmetic the calculators build on.
//!
//! All computation happens on raw `rust_decimal::Decimal` values; only the
//! figures handed back to callers are rounded into [`Money`].

use crate::error::{EngineError, Result};
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// A currency amount that always carries exactly 2 decimal places.
///
/// Rounding is half away from zero, which matches how calculator
/// illustrations are usually printed.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use projection_engine::Money;
///
/// let amount = Money::from_str("1161695.3818").unwrap();
/// assert_eq!(amount.to_string(), "1161695.38");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 2;

    /// Zero value, at the same scale as every other amount.
    pub const ZERO: Self = Money(Decimal::from_parts(0, 0, 0, false, Self::SCALE));

    /// Creates a new `Money` from a `Decimal`, rounding to 2 decimal places.
    pub fn new(value: Decimal) -> Self {
        let mut rounded =
            value.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(Self::SCALE);
        Money(rounded)
    }

    /// Returns the underlying decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Subtracts `rhs`, flooring the result at zero.
    pub fn saturating_sub(self, rhs: Self) -> Self {
        if rhs >= self {
            Money::ZERO
        } else {
            self - rhs
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::ZERO
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money::new(value)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())?;
        Ok(Money::new(decimal))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Money::new(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Money::new(self.0 - rhs.0)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:.2}", self.0))
    }
}

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
const TWELVE_HUNDRED: Decimal = Decimal::from_parts(1200, 0, 0, false, 0);

/// Converts an annual percentage (e.g. `12` for 12%) to a monthly rate.
pub(crate) fn monthly_rate(annual_percent: Decimal) -> Decimal {
    annual_percent / TWELVE_HUNDRED
}

/// Converts a percentage to a fraction (`10` becomes `0.1`).
pub(crate) fn fraction(percent: Decimal) -> Decimal {
    percent / HUNDRED
}

pub(crate) fn checked_add(a: Decimal, b: Decimal, operation: &'static str) -> Result<Decimal> {
    a.checked_add(b).ok_or(EngineError::Overflow { operation })
}

pub(crate) fn checked_mul(a: Decimal, b: Decimal, operation: &'static str) -> Result<Decimal> {
    a.checked_mul(b).ok_or(EngineError::Overflow { operation })
}

pub(crate) fn checked_div(a: Decimal, b: Decimal, operation: &'static str) -> Result<Decimal> {
    a.checked_div(b).ok_or(EngineError::Overflow { operation })
}

/// `(1 + rate)^periods`, failing instead of saturating.
pub(crate) fn growth(rate: Decimal, periods: u32, operation: &'static str) -> Result<Decimal> {
    (Decimal::ONE + rate)
        .checked_powi(i64::from(periods))
        .ok_or(EngineError::Overflow { operation })
}

/// Future value factor of an annuity-due: one unit paid at the start of each
/// of `periods` periods, valued at the end of the last one.
///
/// Degenerates to `periods` when the rate is zero.
pub(crate) fn annuity_due_factor(rate: Decimal, periods: u32) -> Result<Decimal> {
    if rate.is_zero() {
        return Ok(Decimal::from(periods));
    }
    let compounded = growth(rate, periods, "annuity factor")?;
    let ordinary = checked_div(compounded - Decimal::ONE, rate, "annuity factor")?;
    checked_mul(ordinary, Decimal::ONE + rate, "annuity factor")
}
