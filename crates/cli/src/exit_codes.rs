//! CLI Exit Code Registry
//!
//! Single source of truth for `platelunch` exit codes. Scripts that wrap the
//! cleaner rely on them, so treat the values as part of the shell contract.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error (unspecified)                          |
//! | 2    | Usage error (bad arguments, unknown step)            |
//! | 3    | Input unusable (missing file, sheet, or column)      |
//! | 4    | Output not written (unwritable path, bad format)     |
//! | 5    | Configuration file unreadable or invalid             |

use platelunch_config::ConfigError;
use platelunch_io::SheetError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// The input sheet could not be opened or lacks a required column.
pub const EXIT_INPUT: u8 = 3;

/// The cleaned sheet could not be written.
pub const EXIT_OUTPUT: u8 = 4;

/// The settings file is unreadable, malformed, or fails validation.
pub const EXIT_CONFIG: u8 = 5;

/// Exit code for a failure while reading the source sheet.
pub fn load_exit_code(err: &SheetError) -> u8 {
    match err {
        SheetError::UnsupportedFormat(_) => EXIT_USAGE,
        SheetError::Write { .. } => EXIT_OUTPUT,
        _ => EXIT_INPUT,
    }
}

pub fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::Write(_) => EXIT_OUTPUT,
        _ => EXIT_CONFIG,
    }
}
