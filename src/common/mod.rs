use std::fmt;

/// Errors raised while resolving, detecting or decoding a period filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Preset tag outside the known set
    InvalidPreset(String),
    /// Timezone string chrono-tz doesn't know
    InvalidTimezone(String),
    /// Calendar date not in `YYYY-MM-DD` form
    InvalidDate(String),
    /// Range arithmetic left the span chrono can represent
    DateOutOfRange(String),
    InvalidQuery(String),
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidPreset(s) => write!(f, "invalid preset: '{s}'"),
            Error::InvalidTimezone(s) => write!(f, "invalid timezone: '{s}'"),
            Error::InvalidDate(s) => write!(f, "invalid date: '{s}', expected YYYY-MM-DD"),
            Error::DateOutOfRange(s) => write!(f, "date out of range: {s}"),
            Error::InvalidQuery(s) => write!(f, "invalid query string: {s}"),
            Error::Config(s) => write!(f, "config error: {s}"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
