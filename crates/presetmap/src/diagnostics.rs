use std::fmt;

use serde::{Deserialize, Serialize};

/// Non-fatal notice about a preset setting that did not make it into the
/// mapping, or did so with a caveat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The parameter-info table has no bounds for this setting.
    NoRange { name: String },
    /// The setting has bounds but its preset value is not a number.
    NotNumeric { name: String },
    /// `min == max`, so the setting cannot be normalized.
    DegenerateRange { name: String, min: f64, max: f64 },
    /// Normalizing overflowed to an infinite or NaN value.
    NonFinite { name: String, value: f64 },
    /// The raw value lies outside its bounds; the normalized value is kept.
    OutOfRange { name: String, value: f64 },
    /// The hosted plugin exposes no parameter with this name.
    Unmapped { name: String },
}

impl Diagnostic {
    pub fn name(&self) -> &str {
        match self {
            Diagnostic::NoRange { name }
            | Diagnostic::NotNumeric { name }
            | Diagnostic::DegenerateRange { name, .. }
            | Diagnostic::NonFinite { name, .. }
            | Diagnostic::OutOfRange { name, .. }
            | Diagnostic::Unmapped { name } => name,
        }
    }

    /// Whether the setting was left out of the output.
    pub fn is_dropped(&self) -> bool {
        !matches!(self, Diagnostic::OutOfRange { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NoRange { name } => write!(f, "{name}: no parameter range, dropped"),
            Diagnostic::NotNumeric { name } => write!(f, "{name}: value is not numeric, dropped"),
            Diagnostic::DegenerateRange { name, min, max } => {
                write!(f, "{name}: empty range [{min}, {max}], dropped")
            }
            Diagnostic::NonFinite { name, value } => {
                write!(
                    f,
                    "{name}: value {value} does not rescale to a finite number, dropped"
                )
            }
            Diagnostic::OutOfRange { name, value } => {
                write!(f, "{name}: value {value} lies outside its range")
            }
            Diagnostic::Unmapped { name } => {
                write!(f, "{name}: not found in plugin parameters, dropped")
            }
        }
    }
}
