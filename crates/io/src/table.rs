// Column layout shared by the importers and exporters

use platelunch_dedup::Record;

use crate::error::SheetError;

/// Header names of the columns the engine interprets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    pub name: String,
    pub phone: String,
    pub link: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            name: "COMPANY_name".into(),
            phone: "Company_Phone".into(),
            link: "Instagram_link".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Phone,
    Link,
    /// Index into `Record::extra`.
    Extra(usize),
}

/// Source column order, so untouched columns come back where they were.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    headers: Vec<String>,
    columns: Vec<Column>,
}

impl ColumnLayout {
    /// Map cleaned headers to columns. Name and phone are required.
    pub fn resolve(headers: Vec<String>, names: &ColumnNames) -> Result<Self, SheetError> {
        let name_idx = find_header(&headers, &names.name, &[]).ok_or_else(|| SheetError::MissingColumn {
            column: names.name.clone(),
            found: headers.clone(),
        })?;
        let phone_idx =
            find_header(&headers, &names.phone, &[name_idx]).ok_or_else(|| SheetError::MissingColumn {
                column: names.phone.clone(),
                found: headers.clone(),
            })?;
        let link_idx = find_header(&headers, &names.link, &[name_idx, phone_idx]);

        let mut next_extra = 0;
        let columns = (0..headers.len())
            .map(|i| {
                if i == name_idx {
                    Column::Name
                } else if i == phone_idx {
                    Column::Phone
                } else if Some(i) == link_idx {
                    Column::Link
                } else {
                    next_extra += 1;
                    Column::Extra(next_extra - 1)
                }
            })
            .collect();

        Ok(Self { headers, columns })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn has_link(&self) -> bool {
        self.columns.contains(&Column::Link)
    }

    pub fn position(&self, column: Column) -> Option<usize> {
        self.columns.iter().position(|c| *c == column)
    }

    /// Add a link column at the end if the source had none.
    pub fn ensure_link(&mut self, header: &str) {
        if !self.has_link() {
            self.headers.push(header.to_string());
            self.columns.push(Column::Link);
        }
    }

    /// Cell values of one record in layout order.
    pub fn cells<'a>(&self, record: &'a Record) -> Vec<&'a str> {
        self.columns
            .iter()
            .map(|c| match c {
                Column::Name => record.name.as_str(),
                Column::Phone => record.phone.as_str(),
                Column::Link => record.link.as_deref().unwrap_or(""),
                Column::Extra(i) => record.extra.get(*i).map(String::as_str).unwrap_or(""),
            })
            .collect()
    }
}

/// Exact header match first, then ASCII case-insensitive. Columns already
/// claimed by another role are skipped.
fn find_header(headers: &[String], wanted: &str, taken: &[usize]) -> Option<usize> {
    let free = |i: &usize| !taken.contains(i);
    let mut candidates = (0..headers.len()).filter(free);
    candidates
        .clone()
        .find(|&i| headers[i] == wanted)
        .or_else(|| candidates.find(|&i| headers[i].eq_ignore_ascii_case(wanted)))
}

/// Strip surrounding whitespace and decorative angle brackets: `<Name> ` -> `Name`.
pub fn clean_header(raw: &str) -> String {
    raw.trim().replace(['<', '>'], "").trim().to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub rows_read: usize,
    pub empty_rows_dropped: usize,
}

#[derive(Debug, Clone)]
pub struct Table {
    pub layout: ColumnLayout,
    pub records: Vec<Record>,
}

impl Table {
    /// Build a table from raw text cells; row 0 is the header row.
    pub fn from_grid(grid: Vec<Vec<String>>, names: &ColumnNames) -> Result<(Self, LoadStats), SheetError> {
        let mut rows = grid.into_iter();
        let headers: Vec<String> = rows
            .next()
            .ok_or_else(|| SheetError::Read("no header row".into()))?
            .iter()
            .map(|h| clean_header(h))
            .collect();
        let layout = ColumnLayout::resolve(headers, names)?;

        let mut stats = LoadStats::default();
        let mut records = Vec::new();
        for row in rows {
            stats.rows_read += 1;
            if row.iter().all(|c| c.trim().is_empty()) {
                stats.empty_rows_dropped += 1;
                continue;
            }
            records.push(layout.record_from_row(row));
        }

        tracing::debug!(
            "loaded {} records ({} empty rows dropped)",
            records.len(),
            stats.empty_rows_dropped
        );
        Ok((Self { layout, records }, stats))
    }
}

impl ColumnLayout {
    fn record_from_row(&self, row: Vec<String>) -> Record {
        let mut record = Record::new(String::new(), String::new());
        let mut cells = row.into_iter();
        for column in &self.columns {
            let value = cells.next().unwrap_or_default();
            match column {
                Column::Name => record.name = value,
                Column::Phone => record.phone = value,
                Column::Link => record.link = (!value.is_empty()).then_some(value),
                Column::Extra(_) => record.extra.push(value),
            }
        }
        record
    }
}
