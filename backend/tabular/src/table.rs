//! In-memory table parsed from an uploaded CSV.
//!
//! The schema is unconstrained and inferred at runtime: everything is kept
//! as strings, and numeric columns are detected on demand.

use restock_core::RestockError;

/// Parsed CSV contents: a header row plus string cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// The row picked as the slowest seller, with the column it was ranked by.
#[derive(Debug, Clone, PartialEq)]
pub struct SlowestSeller {
    pub item: String,
    pub value: f64,
    pub column: String,
}

impl Table {
    /// Parse comma-separated bytes. Short rows are padded rather than
    /// rejected; a missing header row or zero data rows is a parse error.
    pub fn from_csv(bytes: &[u8]) -> Result<Table, RestockError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| RestockError::CsvParse(e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(RestockError::CsvParse("missing header row".to_string()));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| RestockError::CsvParse(e.to_string()))?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }
        if rows.is_empty() {
            return Err(RestockError::CsvParse("no data rows".to_string()));
        }

        Ok(Table { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// One line per column: name plus inferred kind (number or text).
    pub fn schema_summary(&self) -> String {
        self.headers
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let kind = if self.is_numeric_column(index) {
                    "number"
                } else {
                    "text"
                };
                format!("{name} ({kind})")
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Up to `limit` data rows re-serialized as comma-joined lines, headers
    /// first. Used to give the delegate grounding context.
    pub fn sample(&self, limit: usize) -> String {
        let mut lines = vec![self.headers.join(",")];
        for row in self.rows.iter().take(limit) {
            lines.push(row.join(","));
        }
        lines.join("\n")
    }

    fn is_numeric_column(&self, index: usize) -> bool {
        let mut saw_value = false;
        for row in &self.rows {
            let cell = row[index].trim();
            if cell.is_empty() {
                continue;
            }
            if cell.parse::<f64>().is_err() {
                return false;
            }
            saw_value = true;
        }
        saw_value
    }

    fn first_numeric_column(&self) -> Option<usize> {
        (0..self.headers.len()).find(|&index| self.is_numeric_column(index))
    }

    /// The row with the smallest value in the first numeric column; ties go
    /// to the earlier row. The item label comes from the first text column
    /// (or column 0 if every column is numeric).
    pub fn slowest_seller(&self) -> Option<SlowestSeller> {
        let value_col = self.first_numeric_column()?;
        let label_col = (0..self.headers.len())
            .find(|&index| !self.is_numeric_column(index))
            .unwrap_or(0);

        let mut best: Option<(usize, f64)> = None;
        for (index, row) in self.rows.iter().enumerate() {
            let Ok(value) = row[value_col].trim().parse::<f64>() else {
                continue;
            };
            if best.map(|(_, min)| value < min).unwrap_or(true) {
                best = Some((index, value));
            }
        }

        best.map(|(index, value)| SlowestSeller {
            item: self.rows[index][label_col].clone(),
            value,
            column: self.headers[value_col].clone(),
        })
    }
}
