// Excel file import (xlsx, xls, xlsb, ods) and export (xlsx only)
//
// Import: every cell is read as text; the engine never sees numbers.
// Export: presentation snapshot. Phones stay literal text, links become
//         hyperlinks and partial duplicates are highlighted.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use platelunch_dedup::{PartialMarks, Record};
use rust_xlsxwriter::{Color, Format, FormatPattern, Url, Workbook, Worksheet};

use crate::error::SheetError;
use crate::table::{Column, ColumnLayout};

/// Read one worksheet (named, or the first) into a text grid.
pub fn import(path: &Path, sheet: Option<&str>) -> Result<Vec<Vec<String>>, SheetError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| SheetError::Open {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let sheet_names = workbook.sheet_names().to_vec();
    let sheet_name = match sheet {
        Some(wanted) => sheet_names
            .iter()
            .find(|n| n.as_str() == wanted)
            .cloned()
            .ok_or_else(|| SheetError::SheetNotFound(wanted.to_string()))?,
        None => sheet_names.first().cloned().ok_or(SheetError::NoSheets)?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| SheetError::Read(format!("sheet '{sheet_name}': {e}")))?;

    tracing::debug!("reading sheet '{}' ({:?})", sheet_name, range.get_size());

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

/// Render a cell as the text a user would have typed.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            // Whole numbers (phones!) without a trailing ".0"
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{n}")
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(true) => "TRUE".into(),
        Data::Bool(false) => "FALSE".into(),
        Data::Error(e) => format!("#{e:?}"),
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

/// Presentation options for the exported sheet.
#[derive(Debug, Clone)]
pub struct ExportStyle {
    /// RGB fill for highlighted phone cells.
    pub highlight_fill: u32,
    pub highlight_bold: bool,
    /// Display text of link cells.
    pub link_text: String,
}

impl Default for ExportStyle {
    fn default() -> Self {
        Self {
            highlight_fill: 0xFF0000,
            highlight_bold: true,
            link_text: "Instagram".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportResult {
    pub rows_written: usize,
    pub links_written: usize,
    pub rows_highlighted: usize,
}

/// Export records to an xlsx workbook with a single sheet.
pub fn export(
    layout: &ColumnLayout,
    records: &[Record],
    marks: &PartialMarks,
    style: &ExportStyle,
    path: &Path,
) -> Result<ExportResult, SheetError> {
    let write_err = |message: String| SheetError::Write {
        path: path.display().to_string(),
        message,
    };

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let header_format = Format::new().set_bold();
    for (col, header) in layout.headers().iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, header, &header_format)
            .map_err(|e| write_err(e.to_string()))?;
    }

    let result = export_rows(worksheet, layout, records, marks, style).map_err(write_err)?;

    worksheet.set_freeze_panes(1, 0).map_err(|e| write_err(e.to_string()))?;
    worksheet.autofit();

    workbook.save(path).map_err(|e| write_err(e.to_string()))?;
    Ok(result)
}

fn export_rows(
    worksheet: &mut Worksheet,
    layout: &ColumnLayout,
    records: &[Record],
    marks: &PartialMarks,
    style: &ExportStyle,
) -> Result<ExportResult, String> {
    let mut result = ExportResult::default();

    let text_format = Format::new().set_num_format("@");
    let mut highlight_format = text_format
        .clone()
        .set_background_color(Color::RGB(style.highlight_fill))
        .set_pattern(FormatPattern::Solid);
    if style.highlight_bold {
        highlight_format = highlight_format.set_bold();
    }

    if let Some(phone_col) = layout.position(Column::Phone) {
        worksheet
            .set_column_format(phone_col as u16, &text_format)
            .map_err(|e| e.to_string())?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        let marked = marks.is_marked(record);
        if marked {
            result.rows_highlighted += 1;
        }

        for (col, (column, value)) in layout.columns().iter().zip(layout.cells(record)).enumerate() {
            let col = col as u16;
            match column {
                Column::Phone => {
                    let format = if marked { &highlight_format } else { &text_format };
                    worksheet
                        .write_string_with_format(row, col, value, format)
                        .map_err(|e| format!("row {row}, phone: {e}"))?;
                }
                Column::Link if !value.is_empty() => {
                    let url = Url::new(value).set_text(&style.link_text);
                    let written = worksheet.write_url(row, col, url).map(|_| ());
                    if let Err(e) = written {
                        // Over-long or malformed URLs stay as plain text
                        tracing::warn!("row {row}: link not written as hyperlink: {e}");
                        worksheet
                            .write_string(row, col, value)
                            .map_err(|e| format!("row {row}, link: {e}"))?;
                    }
                    result.links_written += 1;
                }
                _ if value.is_empty() => {}
                _ => {
                    worksheet
                        .write_string(row, col, value)
                        .map_err(|e| format!("row {row}, column {col}: {e}"))?;
                }
            }
        }
        result.rows_written += 1;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_floats_lose_decimal_artifact() {
        assert_eq!(cell_text(&Data::Float(8085551234.0)), "8085551234");
        assert_eq!(cell_text(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_text(&Data::Int(42)), "42");
        assert_eq!(cell_text(&Data::Bool(true)), "TRUE");
        assert_eq!(cell_text(&Data::Empty), "");
    }
}
