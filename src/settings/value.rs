//! Typed setting values.

use std::fmt;

use super::SettingError;

/// Declared kind of a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    /// `true` / `false` (also `1`, `0`, `t`, `f`, case-insensitive)
    Bool,
    /// Signed 64-bit integer
    Int,
    /// 64-bit float
    Float,
    /// Arbitrary string
    Text,
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Text => "string",
        };
        f.write_str(name)
    }
}

/// A typed setting value.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Float value
    Float(f64),
    /// String value
    Text(String),
}

impl SettingValue {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> SettingKind {
        match self {
            Self::Bool(_) => SettingKind::Bool,
            Self::Int(_) => SettingKind::Int,
            Self::Float(_) => SettingKind::Float,
            Self::Text(_) => SettingKind::Text,
        }
    }

    /// Parses `raw` into a value of the given kind.
    ///
    /// Numeric and boolean input is trimmed; text is kept verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`SettingError::Invalid`] if `raw` does not parse.
    pub fn parse(kind: SettingKind, name: &str, raw: &str) -> Result<Self, SettingError> {
        let invalid = |reason: String| SettingError::Invalid {
            name: name.to_string(),
            value: raw.to_string(),
            kind,
            reason,
        };

        match kind {
            SettingKind::Bool => parse_bool(raw.trim())
                .map(Self::Bool)
                .ok_or_else(|| invalid("expected true or false".to_string())),
            SettingKind::Int => raw
                .trim()
                .parse()
                .map(Self::Int)
                .map_err(|e: std::num::ParseIntError| invalid(e.to_string())),
            SettingKind::Float => raw
                .trim()
                .parse()
                .map(Self::Float)
                .map_err(|e: std::num::ParseFloatError| invalid(e.to_string())),
            SettingKind::Text => Ok(Self::Text(raw.to_string())),
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" => Some(true),
        "false" | "f" | "0" => Some(false),
        _ => None,
    }
}
