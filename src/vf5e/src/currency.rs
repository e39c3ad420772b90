//! Currency normalization to gold pieces

use serde_json::Value;

use crate::reference::{coin_multiplier, DEFAULT_COIN};

/// A raw `value` field, classified
#[derive(Debug, Clone, PartialEq)]
pub enum Coinage {
    /// Bare number, expressed in copper pieces
    Copper(f64),
    /// `{amount, unit}` object
    Priced { amount: f64, unit: String },
    /// Missing or unusable
    Unpriced,
}

impl Coinage {
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(n)) => n.as_f64().map_or(Coinage::Unpriced, Coinage::Copper),
            Some(Value::Object(map)) => Coinage::Priced {
                amount: map.get("amount").and_then(Value::as_f64).unwrap_or(0.0),
                unit: map
                    .get("unit")
                    .and_then(Value::as_str)
                    .unwrap_or(DEFAULT_COIN)
                    .to_string(),
            },
            _ => Coinage::Unpriced,
        }
    }

    /// Value in gold pieces, rounded to two decimals
    pub fn in_gold(&self) -> f64 {
        match self {
            Coinage::Copper(cp) => round_cents(cp / 100.0),
            Coinage::Priced { amount, unit } => round_cents(amount * coin_multiplier(unit)),
            Coinage::Unpriced => 0.0,
        }
    }
}

/// Normalize a raw `value` field to gold pieces
pub fn convert_value(value: Option<&Value>) -> f64 {
    Coinage::from_value(value).in_gold()
}

/// Round to two decimal places
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
