// File I/O operations

pub mod csv;
pub mod error;
pub mod table;
pub mod xlsx;

use std::path::Path;

use platelunch_dedup::{DuplicateAnnotation, PartialMarks, Record};

pub use error::SheetError;
pub use table::{clean_header, Column, ColumnLayout, ColumnNames, LoadStats, Table};
pub use xlsx::{ExportResult, ExportStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// xlsx, xlsm, xls, xlsb, ods
    Workbook,
    /// csv, tsv
    Delimited,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Result<Self, SheetError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(Self::Workbook),
            "csv" | "tsv" => Ok(Self::Delimited),
            _ => Err(SheetError::UnsupportedFormat(ext)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub columns: ColumnNames,
    /// Worksheet to read; the first one when unset.
    pub sheet: Option<String>,
}

/// Load records from a workbook or delimited file.
pub fn load(path: &Path, options: &LoadOptions) -> Result<(Table, LoadStats), SheetError> {
    let grid = match FileKind::from_path(path)? {
        FileKind::Workbook => xlsx::import(path, options.sheet.as_deref())?,
        FileKind::Delimited => crate::csv::import(path)?,
    };
    let (table, stats) = Table::from_grid(grid, &options.columns)?;
    tracing::info!(
        "read {} records from {} ({} empty rows skipped)",
        table.records.len(),
        path.display(),
        stats.empty_rows_dropped
    );
    Ok((table, stats))
}

#[derive(Debug, Clone, Default)]
pub struct SaveOptions {
    /// Header used when links were generated for a source without a link column.
    pub link_header: String,
    pub style: ExportStyle,
}

/// Sort by name, ignoring case; equal names keep their relative order.
pub fn sort_by_name(records: &mut [Record]) {
    records.sort_by_cached_key(|r| r.name.to_lowercase());
}

/// Write the cleaned records. xlsx output carries styling; csv/tsv is plain.
pub fn save(
    layout: &ColumnLayout,
    mut records: Vec<Record>,
    partial: &[DuplicateAnnotation],
    options: &SaveOptions,
    path: &Path,
) -> Result<ExportResult, SheetError> {
    sort_by_name(&mut records);

    let mut layout = layout.clone();
    if records.iter().any(|r| r.link.is_some()) {
        let header = if options.link_header.is_empty() {
            ColumnNames::default().link
        } else {
            options.link_header.clone()
        };
        layout.ensure_link(&header);
    }

    let is_xlsx = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"));

    let result = match FileKind::from_path(path)? {
        FileKind::Workbook if is_xlsx => {
            let marks = PartialMarks::from_annotations(partial);
            xlsx::export(&layout, &records, &marks, &options.style, path)?
        }
        FileKind::Workbook => {
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
            return Err(SheetError::UnsupportedFormat(ext.to_string()));
        }
        FileKind::Delimited => {
            crate::csv::export(&layout, &records, path)?;
            ExportResult {
                rows_written: records.len(),
                ..Default::default()
            }
        }
    };

    tracing::info!("wrote {} rows to {}", result.rows_written, path.display());
    Ok(result)
}
