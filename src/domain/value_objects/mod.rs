//! Value Objects for product pricing

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Round a money figure to two decimal places, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Order-line quantity. Always at least one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    /// Zero and negative quantities collapse to one.
    pub fn clamped(raw: i64) -> Self { Self(raw.clamp(1, i64::from(u32::MAX)) as u32) }
    pub fn value(&self) -> u32 { self.0 }
    pub fn as_decimal(&self) -> Decimal { Decimal::from(self.0) }
}

impl Default for Quantity { fn default() -> Self { Self(1) } }

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Accepts integers, floats (truncated) and numeric strings. Anything else reads as 0,
/// which [`Quantity::clamped`] later lifts to 1.
pub fn lenient_quantity<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)).unwrap_or(0),
        serde_json::Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64)).unwrap_or(0)
        }
        _ => 0,
    })
}

/// Length unit used for product and selection dimensions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LengthUnit { #[default] Mm, Cm, M, In, Ft }

impl LengthUnit {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mm" => Some(Self::Mm),
            "cm" => Some(Self::Cm),
            "m" => Some(Self::M),
            "in" | "inch" | "inches" => Some(Self::In),
            "ft" | "feet" => Some(Self::Ft),
            _ => None,
        }
    }

    pub fn meters_per_unit(&self) -> Decimal {
        match self {
            Self::Mm => Decimal::new(1, 3),
            Self::Cm => Decimal::new(1, 2),
            Self::M => Decimal::ONE,
            Self::In => Decimal::new(254, 4),
            Self::Ft => Decimal::new(3048, 4),
        }
    }
}

/// Surface area of `width x height` in square metres.
///
/// `None` when either side is missing. Unrecognised units are read as millimetres.
/// Saturates at the `Decimal` range.
pub fn area_in_square_meters(width: Option<Decimal>, height: Option<Decimal>, unit: &str) -> Option<Decimal> {
    let (width, height) = (width?, height?);
    let factor = LengthUnit::parse(unit).unwrap_or_default().meters_per_unit();
    Some(width.saturating_mul(factor).saturating_mul(height.saturating_mul(factor)).normalize())
}
