//! # Recorded positions
//!
//! Decoding of the fixed-point coordinates kept by the position recorder and
//! the key used to match vehicle identifiers across sources.

use realtime::{Result, invalid_format};

/// Number of trailing characters holding the fractional part of a stored
/// coordinate.
const FRACTION_DIGITS: usize = 4;

/// Decode a stored fixed-point coordinate.
///
/// A single leading `+` is dropped and a decimal point inserted before the
/// last four digits: `+411234567` becomes `41123.4567`. A leading `-` is
/// kept as the sign.
///
/// # Errors
///
/// Returns [`realtime::Error::InvalidFormat`] when the value has fewer than
/// four trailing digits or is otherwise not numeric.
pub fn clean_number(value: &str) -> Result<f64> {
    let digits = value.strip_prefix('+').unwrap_or(value);

    let Some(split) = digits.len().checked_sub(FRACTION_DIGITS) else {
        return Err(invalid_format!("`{value}` is shorter than {FRACTION_DIGITS} digits"));
    };
    if !digits.as_bytes()[split..].iter().all(u8::is_ascii_digit) {
        return Err(invalid_format!("`{value}` does not end in {FRACTION_DIGITS} digits"));
    }

    let (whole, fraction) = digits.split_at(split);
    let whole = match whole {
        "" => "0",
        "-" => "-0",
        whole => whole,
    };

    format!("{whole}.{fraction}")
        .parse::<f64>()
        .map_err(|e| invalid_format!("`{value}` is not a fixed-point number: {e}"))
}

/// Identity of a vehicle for matching live reports against the roster.
///
/// Identifiers made only of digits compare by value so `0135` and `135` are
/// the same vehicle. Anything else compares by its trimmed text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VehicleKey {
    Number(u64),
    Text(String),
}

impl From<&str> for VehicleKey {
    fn from(id: &str) -> Self {
        let id = id.trim();
        if !id.is_empty()
            && id.bytes().all(|b| b.is_ascii_digit())
            && let Ok(number) = id.parse()
        {
            return Self::Number(number);
        }
        Self::Text(id.to_string())
    }
}
