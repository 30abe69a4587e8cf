//! Comparison-key normalization for business names and phone numbers.

use phonenumber::{country, Mode};
use unicode_general_category::{get_general_category, GeneralCategory};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Artifact left behind when a phone column was coerced to a float.
const FLOAT_ARTIFACT: &str = ".0";

/// North American country calling code.
const NANP_PREFIX: char = '1';

/// Typographic apostrophe variants folded to `'`.
const APOSTROPHES: &[char] = &[
    '\u{2018}', // left single quotation mark
    '\u{2019}', // right single quotation mark
    '\u{201B}', // single high-reversed-9 quotation mark
    '\u{2032}', // prime
    '\u{0060}', // grave accent / backtick
    '\u{00B4}', // acute accent
    '\u{02BB}', // modifier letter turned comma (ʻokina)
    '\u{02BC}', // modifier letter apostrophe
    '\u{02BD}', // modifier letter reversed comma
    '\u{FF07}', // fullwidth apostrophe
];

// ---------------------------------------------------------------------------
// Phone
// ---------------------------------------------------------------------------

/// Which path `classify_phone` took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhoneOutcome {
    /// Parsed and validated; international presentation form.
    Formatted(String),
    /// Unparseable or invalid; the trimmed input, untouched.
    PassThrough(String),
}

impl PhoneOutcome {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Formatted(s) | Self::PassThrough(s) => s,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            Self::Formatted(s) | Self::PassThrough(s) => s,
        }
    }

    pub fn is_formatted(&self) -> bool {
        matches!(self, Self::Formatted(_))
    }
}

/// Canonicalize a phone number, e.g. `(808) 555-1234` -> `+1 808-555-1234`.
pub fn normalize_phone(raw: &str) -> String {
    classify_phone(raw).into_string()
}

/// Parse a phone number under North American conventions.
///
/// Digits are extracted from the trimmed input (after dropping a trailing
/// `.0` left by numeric coercion) and forced to carry the `1` country code.
/// Only numbers that validate as assignable are reformatted; everything
/// else passes through as the trimmed input.
pub fn classify_phone(raw: &str) -> PhoneOutcome {
    let trimmed = raw.trim();
    // Fullwidth digits and punctuation fold to ASCII
    let folded: String = trimmed.nfkc().collect();
    let cleaned = folded.strip_suffix(FLOAT_ARTIFACT).unwrap_or(&folded);

    let mut digits: String = cleaned.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 10 {
        digits.insert(0, NANP_PREFIX);
    }
    if !digits.starts_with(NANP_PREFIX) {
        digits.insert(0, NANP_PREFIX);
    }

    match phonenumber::parse(Some(country::Id::US), format!("+{digits}")) {
        Ok(number) if phonenumber::is_valid(&number) => {
            PhoneOutcome::Formatted(number.format().mode(Mode::International).to_string())
        }
        Ok(_) => {
            tracing::trace!("phone {trimmed:?} parsed but is not a valid number");
            PhoneOutcome::PassThrough(trimmed.to_string())
        }
        Err(e) => {
            tracing::trace!("phone {trimmed:?} did not parse: {e:?}");
            PhoneOutcome::PassThrough(trimmed.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Name
// ---------------------------------------------------------------------------

/// Fold a business name for comparison.
///
/// Accents, case, apostrophe style and invisible characters do not survive,
/// so `"Café Joe’s"` and `"cafe joe's"` compare equal.
pub fn normalize_name(raw: &str) -> String {
    let folded: String = raw
        .chars()
        .map(|c| if APOSTROPHES.contains(&c) { '\'' } else { c })
        .nfkd()
        .flat_map(char::to_lowercase)
        .filter(|&c| !is_combining_mark(c) && !is_invisible(c))
        .collect();

    folded.trim().to_string()
}

/// Missing cells normalize to the empty string.
pub fn normalize_name_opt(raw: Option<&str>) -> String {
    raw.map(normalize_name).unwrap_or_default()
}

/// Any "Other" general category: control, format, surrogate, private use, unassigned.
fn is_invisible(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
    )
}
