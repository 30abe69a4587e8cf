use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    /// Settings file could not be read.
    Read(String),
    /// TOML parse / deserialization error.
    Parse(String),
    /// Semantically invalid settings (empty column name, bad colour, ...).
    Validation(String),
    /// Settings could not be serialized or written.
    Write(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(msg) => write!(f, "cannot read settings: {msg}"),
            Self::Parse(msg) => write!(f, "settings parse error: {msg}"),
            Self::Validation(msg) => write!(f, "invalid settings: {msg}"),
            Self::Write(msg) => write!(f, "cannot write settings: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
