use std::fmt;

#[derive(Debug)]
pub enum SheetError {
    /// File could not be opened or decoded.
    Open { path: String, message: String },
    /// Workbook has no worksheets.
    NoSheets,
    /// Requested worksheet does not exist.
    SheetNotFound(String),
    /// Header row lacks a required column.
    MissingColumn { column: String, found: Vec<String> },
    /// Extension is neither a spreadsheet nor CSV/TSV.
    UnsupportedFormat(String),
    /// Cell data could not be read.
    Read(String),
    /// Output could not be written.
    Write { path: String, message: String },
}

impl fmt::Display for SheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, message } => write!(f, "cannot open {path}: {message}"),
            Self::NoSheets => write!(f, "workbook contains no sheets"),
            Self::SheetNotFound(name) => write!(f, "sheet '{name}' not found"),
            Self::MissingColumn { column, found } => {
                write!(f, "missing column '{column}' (found: {})", found.join(", "))
            }
            Self::UnsupportedFormat(ext) => {
                write!(f, "unsupported file type '{ext}' (expected xlsx, xls, xlsb, ods, csv or tsv)")
            }
            Self::Read(msg) => write!(f, "read error: {msg}"),
            Self::Write { path, message } => write!(f, "cannot write {path}: {message}"),
        }
    }
}

impl std::error::Error for SheetError {}
