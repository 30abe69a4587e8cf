// CSV/TSV import/export

use std::io::Read;
use std::path::Path;

use platelunch_dedup::Record;

use crate::error::SheetError;
use crate::table::ColumnLayout;

/// Read a delimited file into a text grid (row 0 = headers).
pub fn import(path: &Path) -> Result<Vec<Vec<String>>, SheetError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    import_from_string(&content, delimiter)
}

const DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Pick the delimiter from the header line and the first rows.
///
/// A candidate that occurs the same number of times (outside quotes) in
/// the header and every sampled row beats one that does not; then the most
/// frequent wins and ties go to the earlier candidate. Defaults to comma.
fn sniff_delimiter(content: &str) -> u8 {
    let mut lines = content.lines().filter(|l| !l.trim().is_empty()).take(8);
    let Some(header) = lines.next() else {
        return b',';
    };
    let rows: Vec<&str> = lines.collect();

    let mut best = (b',', false, 0);
    for delim in DELIMITERS {
        let in_header = count_unquoted(header, delim);
        if in_header == 0 {
            continue;
        }
        let consistent = rows.iter().all(|r| count_unquoted(r, delim) == in_header);
        if (consistent, in_header) > (best.1, best.2) {
            best = (delim, consistent, in_header);
        }
    }
    best.0
}

/// Occurrences of `delim` outside double-quoted fields.
fn count_unquoted(line: &str, delim: u8) -> usize {
    let mut quoted = false;
    line.bytes()
        .filter(|&b| {
            if b == b'"' {
                quoted = !quoted;
            }
            b == delim && !quoted
        })
        .count()
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, SheetError> {
    let open_err = |e: std::io::Error| SheetError::Open {
        path: path.display().to_string(),
        message: e.to_string(),
    };
    let mut file = std::fs::File::open(path).map_err(open_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(open_err)?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            // Excel-exported CSVs are usually Windows-1252
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            tracing::debug!("{} is not UTF-8, decoded as Windows-1252", path.display());
            Ok(decoded.into_owned())
        }
    }
}

fn import_from_string(content: &str, delimiter: u8) -> Result<Vec<Vec<String>>, SheetError> {
    // Excel likes to prepend a BOM
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut grid = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| SheetError::Read(e.to_string()))?;
        grid.push(record.iter().map(str::to_string).collect());
    }
    Ok(grid)
}

/// Write records as CSV (comma) or TSV (when the extension is `.tsv`).
pub fn export(layout: &ColumnLayout, records: &[Record], path: &Path) -> Result<(), SheetError> {
    let write_err = |message: String| SheetError::Write {
        path: path.display().to_string(),
        message,
    };

    let delimiter = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    };

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .map_err(|e| write_err(e.to_string()))?;

    writer
        .write_record(layout.headers())
        .map_err(|e| write_err(e.to_string()))?;
    for record in records {
        writer
            .write_record(layout.cells(record))
            .map_err(|e| write_err(e.to_string()))?;
    }
    writer.flush().map_err(|e| write_err(e.to_string()))
}
