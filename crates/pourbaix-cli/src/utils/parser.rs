use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidKeyValue(String),

    #[error("Invalid number '{value}' for '{key}'.")]
    InvalidNumber { key: String, value: String },

    #[error("Invalid boolean '{value}' for '{key}'. Expected 'true' or 'false'.")]
    InvalidBool { key: String, value: String },

    #[error("Invalid range '{value}' for '{key}'. Expected 'MIN:MAX' (e.g., '0:14').")]
    InvalidRange { key: String, value: String },
}

/// Splits `KEY=VALUE`; the value may itself contain `=`.
pub fn split_key_value(pair: &str) -> Result<(&str, &str), ParseError> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value.trim())),
        _ => Err(ParseError::InvalidKeyValue(pair.to_string())),
    }
}

pub fn parse_float(key: &str, value: &str) -> Result<f64, ParseError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidNumber {
            key: key.to_string(),
            value: value.to_string(),
        })
}

pub fn parse_bool(key: &str, value: &str) -> Result<bool, ParseError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(ParseError::InvalidBool {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Parses `MIN:MAX` into an ordered pair.
pub fn parse_range(key: &str, value: &str) -> Result<(f64, f64), ParseError> {
    let invalid = || ParseError::InvalidRange {
        key: key.to_string(),
        value: value.to_string(),
    };
    let (min, max) = value.split_once(':').ok_or_else(invalid)?;
    let min: f64 = min.trim().parse().map_err(|_| invalid())?;
    let max: f64 = max.trim().parse().map_err(|_| invalid())?;
    if min < max {
        Ok((min, max))
    } else {
        Err(invalid())
    }
}
