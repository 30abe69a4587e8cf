use platelunch_config::ConfigError;
use platelunch_io::SheetError;

use crate::exit_codes::{config_exit_code, load_exit_code, EXIT_ERROR, EXIT_OUTPUT, EXIT_USAGE};

/// Error returned by every command; `main` prints it and exits with `code`.
#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Failure reading the source sheet.
    pub fn load(err: SheetError) -> Self {
        let hint = match &err {
            SheetError::MissingColumn { column, .. } => Some(format!(
                "set [columns] in the settings file if the sheet calls \"{column}\" something else"
            )),
            SheetError::UnsupportedFormat(_) => {
                Some("supported inputs: xlsx, xlsm, xls, xlsb, ods, csv, tsv".to_string())
            }
            SheetError::SheetNotFound(_) => Some("check [files] sheet in the settings file".to_string()),
            _ => None,
        };
        Self { code: load_exit_code(&err), message: err.to_string(), hint }
    }

    /// Failure writing the cleaned sheet.
    pub fn save(err: SheetError) -> Self {
        let hint = match &err {
            SheetError::UnsupportedFormat(_) => Some("write .xlsx, .csv or .tsv".to_string()),
            _ => None,
        };
        Self { code: EXIT_OUTPUT, message: err.to_string(), hint }
    }

    pub fn config(err: ConfigError) -> Self {
        Self::new(config_exit_code(&err), err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}
