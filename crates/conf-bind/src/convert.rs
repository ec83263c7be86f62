//! Conversion of decoded values into typed settings.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// A value that could not be converted to the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ConvertError {
    message: String,
}

impl ConvertError {
    /// Create a conversion error with a human-readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Types a setting can be read into from its logical text.
pub trait FromConf: Sized {
    /// Convert the decoded text of a value.
    fn from_conf(text: &str) -> Result<Self, ConvertError>;
}

impl FromConf for String {
    fn from_conf(text: &str) -> Result<Self, ConvertError> {
        Ok(text.to_owned())
    }
}

impl FromConf for PathBuf {
    fn from_conf(text: &str) -> Result<Self, ConvertError> {
        Ok(PathBuf::from(text))
    }
}

impl FromConf for bool {
    fn from_conf(text: &str) -> Result<Self, ConvertError> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if text.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(ConvertError::new(format!(
                "expected `true` or `false`, found `{text}`"
            )))
        }
    }
}

impl FromConf for char {
    fn from_conf(text: &str) -> Result<Self, ConvertError> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ConvertError::new(format!(
                "expected a single character, found `{text}`"
            ))),
        }
    }
}

macro_rules! from_str_impl {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromConf for $ty {
                fn from_conf(text: &str) -> Result<Self, ConvertError> {
                    text.trim().parse::<$ty>().map_err(|e| {
                        ConvertError::new(format!(
                            "expected {}, found `{}`: {}",
                            stringify!($ty),
                            text,
                            e
                        ))
                    })
                }
            }
        )*
    };
}

from_str_impl!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);

impl FromConf for Duration {
    fn from_conf(text: &str) -> Result<Self, ConvertError> {
        parse_duration(text)
    }
}

/// An empty value leaves the setting unset.
impl<T: FromConf> FromConf for Option<T> {
    fn from_conf(text: &str) -> Result<Self, ConvertError> {
        if text.trim().is_empty() {
            Ok(None)
        } else {
            T::from_conf(text).map(Some)
        }
    }
}

/// Parse a time span written as `d`, `hh:mm`, `hh:mm:ss`, or
/// `d.hh:mm:ss.fffffff` (each part after `hh:mm` optional).
///
/// Hours must be below 24, minutes and seconds below 60, and the fraction
/// has at most seven digits (100ns ticks). A bare number is a day count.
pub fn parse_duration(text: &str) -> Result<Duration, ConvertError> {
    const SECS_PER_DAY: u64 = 24 * 60 * 60;

    let text = text.trim();
    let invalid = || {
        ConvertError::new(format!(
            "invalid duration `{text}`: expected d, hh:mm, hh:mm:ss or d.hh:mm:ss.fffffff"
        ))
    };
    if text.starts_with('-') {
        return Err(ConvertError::new(format!(
            "invalid duration `{text}`: negative durations are not supported"
        )));
    }

    let Some(colon) = text.find(':') else {
        let days = digits(text).ok_or_else(invalid)?;
        let secs = days.checked_mul(SECS_PER_DAY).ok_or_else(invalid)?;
        return Ok(Duration::from_secs(secs));
    };

    let (days, clock) = match text[..colon].find('.') {
        Some(dot) => (digits(&text[..dot]).ok_or_else(invalid)?, &text[dot + 1..]),
        None => (0, text),
    };

    let mut parts = clock.split(':');
    let hours = parts.next().and_then(digits).ok_or_else(invalid)?;
    let minutes = parts.next().and_then(digits).ok_or_else(invalid)?;
    let (seconds, nanos) = match parts.next() {
        None => (0, 0),
        Some(part) => match part.split_once('.') {
            None => (digits(part).ok_or_else(invalid)?, 0),
            Some((secs, fraction)) => (
                digits(secs).ok_or_else(invalid)?,
                fraction_nanos(fraction).ok_or_else(invalid)?,
            ),
        },
    };
    if parts.next().is_some() || hours >= 24 || minutes >= 60 || seconds >= 60 {
        return Err(invalid());
    }

    let secs = days
        .checked_mul(SECS_PER_DAY)
        .and_then(|s| s.checked_add(hours * 3600 + minutes * 60 + seconds))
        .ok_or_else(invalid)?;
    Ok(Duration::new(secs, nanos))
}

/// A non-empty run of ASCII digits.
fn digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// One to seven fractional digits, as nanoseconds.
fn fraction_nanos(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 7 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let padded = format!("{s:0<9}");
    padded.parse().ok()
}
