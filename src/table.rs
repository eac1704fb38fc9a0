//! In-memory tabular blob and its CSV wire form.
//!
//! The remote dataset is one CSV file read and rewritten wholesale. Columns
//! are the union of keys seen across all rows; free-text cells must survive
//! commas, quotes, and embedded newlines, so encoding quotes per RFC 4180
//! and decoding runs a small state machine over the raw bytes.

use crate::error::SurveyError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// The fallback shape used when the remote dataset does not exist yet:
    /// a fresh table with only a `participant_id` column.
    pub fn empty() -> Self {
        Table {
            columns: vec!["participant_id".to_string()],
            rows: Vec::new(),
        }
    }

    pub fn with_columns(columns: Vec<String>) -> Self {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cell by row index and column name.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Append one flat record as the last row. Keys not yet present become
    /// new trailing columns; prior rows are backfilled with empty cells and
    /// stay unchanged and in order.
    pub fn append_record(&mut self, record: &[(String, String)]) {
        for (key, _) in record {
            if !self.columns.iter().any(|c| c == key) {
                self.columns.push(key.clone());
                for row in &mut self.rows {
                    row.push(String::new());
                }
            }
        }
        let row = self
            .columns
            .iter()
            .map(|col| {
                record
                    .iter()
                    .find(|(key, _)| key == col)
                    .map(|(_, value)| value.clone())
                    .unwrap_or_default()
            })
            .collect();
        self.rows.push(row);
    }

    // -- CSV wire form ------------------------------------------------------

    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        push_row(&mut out, &self.columns);
        for row in &self.rows {
            push_row(&mut out, row);
        }
        out
    }

    pub fn from_csv(input: &str) -> Result<Table, SurveyError> {
        let mut records = parse_csv(input)?;
        if records.is_empty() {
            return Err(SurveyError::MalformedTable("no header row".to_string()));
        }
        let columns = records.remove(0);
        let width = columns.len();
        let rows = records
            .into_iter()
            .map(|mut row| {
                // Tolerate short rows (trailing empty cells elided by other writers)
                row.resize(width, String::new());
                row.truncate(width);
                row
            })
            .collect();
        Ok(Table { columns, rows })
    }
}

fn push_row(out: &mut String, cells: &[String]) {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&encode_cell(cell));
    }
    out.push('\n');
}

fn encode_cell(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

fn parse_csv(input: &str) -> Result<Vec<Vec<String>>, SurveyError> {
    let mut records = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = input.chars().peekable();
    // True once the current row has any content; a bare trailing newline
    // does not produce a phantom empty record.
    let mut row_started = false;

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        cell.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => cell.push(ch),
            }
            continue;
        }
        match ch {
            '"' => {
                if !cell.is_empty() {
                    return Err(SurveyError::MalformedTable(
                        "quote inside unquoted cell".to_string(),
                    ));
                }
                in_quotes = true;
                row_started = true;
            }
            ',' => {
                row.push(std::mem::take(&mut cell));
                row_started = true;
            }
            '\r' => {
                // Consumed as part of CRLF; a lone CR is treated the same.
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(std::mem::take(&mut cell));
                records.push(std::mem::take(&mut row));
                row_started = false;
            }
            '\n' => {
                row.push(std::mem::take(&mut cell));
                records.push(std::mem::take(&mut row));
                row_started = false;
            }
            _ => {
                cell.push(ch);
                row_started = true;
            }
        }
    }

    if in_quotes {
        return Err(SurveyError::MalformedTable("unterminated quote".to_string()));
    }
    if row_started || !row.is_empty() {
        row.push(cell);
        records.push(row);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // -- Append / union semantics -------------------------------------------

    #[test]
    fn test_empty_table_shape() {
        let table = Table::empty();
        assert_eq!(table.columns(), ["participant_id"]);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_append_to_empty_table() {
        let mut table = Table::empty();
        table.append_record(&record(&[("participant_id", "p1"), ("age", "25")]));
        assert_eq!(table.columns(), ["participant_id", "age"]);
        assert_eq!(table.cell(0, "age"), Some("25"));
    }

    #[test]
    fn test_append_preserves_prior_rows_and_order() {
        let mut table = Table::empty();
        table.append_record(&record(&[("participant_id", "p1")]));
        table.append_record(&record(&[("participant_id", "p2")]));
        table.append_record(&record(&[("participant_id", "p3")]));
        assert_eq!(table.cell(0, "participant_id"), Some("p1"));
        assert_eq!(table.cell(1, "participant_id"), Some("p2"));
        assert_eq!(table.cell(2, "participant_id"), Some("p3"));
    }

    #[test]
    fn test_append_new_column_backfills_old_rows() {
        let mut table = Table::empty();
        table.append_record(&record(&[("participant_id", "p1")]));
        table.append_record(&record(&[("participant_id", "p2"), ("mood", "4")]));
        assert_eq!(table.cell(0, "mood"), Some(""));
        assert_eq!(table.cell(1, "mood"), Some("4"));
    }

    #[test]
    fn test_append_missing_key_yields_empty_cell() {
        let mut table = Table::with_columns(vec!["a".to_string(), "b".to_string()]);
        table.append_record(&record(&[("b", "2")]));
        assert_eq!(table.cell(0, "a"), Some(""));
        assert_eq!(table.cell(0, "b"), Some("2"));
    }

    #[test]
    fn test_cell_unknown_column() {
        let table = Table::empty();
        assert_eq!(table.cell(0, "nope"), None);
    }

    // -- CSV encoding -------------------------------------------------------

    #[test]
    fn test_to_csv_plain() {
        let mut table = Table::with_columns(vec!["a".to_string(), "b".to_string()]);
        table.append_record(&record(&[("a", "1"), ("b", "x")]));
        assert_eq!(table.to_csv(), "a,b\n1,x\n");
    }

    #[test]
    fn test_to_csv_quotes_commas() {
        let mut table = Table::with_columns(vec!["t".to_string()]);
        table.append_record(&record(&[("t", "one, two")]));
        assert_eq!(table.to_csv(), "t\n\"one, two\"\n");
    }

    #[test]
    fn test_to_csv_doubles_quotes() {
        let mut table = Table::with_columns(vec!["t".to_string()]);
        table.append_record(&record(&[("t", "say \"hi\"")]));
        assert_eq!(table.to_csv(), "t\n\"say \"\"hi\"\"\"\n");
    }

    #[test]
    fn test_to_csv_quotes_newlines() {
        let mut table = Table::with_columns(vec!["t".to_string()]);
        table.append_record(&record(&[("t", "line one\nline two")]));
        assert_eq!(table.to_csv(), "t\n\"line one\nline two\"\n");
    }

    // -- CSV decoding -------------------------------------------------------

    #[test]
    fn test_from_csv_plain() {
        let table = Table::from_csv("a,b\n1,2\n3,4\n").expect("parse");
        assert_eq!(table.columns(), ["a", "b"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(1, "b"), Some("4"));
    }

    #[test]
    fn test_from_csv_header_only() {
        let table = Table::from_csv("participant_id\n").expect("parse");
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.columns(), ["participant_id"]);
    }

    #[test]
    fn test_from_csv_no_trailing_newline() {
        let table = Table::from_csv("a,b\n1,2").expect("parse");
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.cell(0, "b"), Some("2"));
    }

    #[test]
    fn test_from_csv_crlf() {
        let table = Table::from_csv("a,b\r\n1,2\r\n").expect("parse");
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.cell(0, "a"), Some("1"));
    }

    #[test]
    fn test_from_csv_quoted_field_with_embedded_newline() {
        let table = Table::from_csv("t\n\"line one\nline two\"\n").expect("parse");
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.cell(0, "t"), Some("line one\nline two"));
    }

    #[test]
    fn test_from_csv_escaped_quotes() {
        let table = Table::from_csv("t\n\"say \"\"hi\"\"\"\n").expect("parse");
        assert_eq!(table.cell(0, "t"), Some("say \"hi\""));
    }

    #[test]
    fn test_from_csv_short_rows_padded() {
        let table = Table::from_csv("a,b,c\n1,2\n").expect("parse");
        assert_eq!(table.cell(0, "c"), Some(""));
    }

    #[test]
    fn test_from_csv_empty_input_is_error() {
        assert!(Table::from_csv("").is_err());
    }

    #[test]
    fn test_from_csv_unterminated_quote_is_error() {
        assert!(Table::from_csv("t\n\"oops\n").is_err());
    }

    #[test]
    fn test_from_csv_stray_quote_is_error() {
        assert!(Table::from_csv("t\nab\"c\n").is_err());
    }

    // -- Round trips --------------------------------------------------------

    #[test]
    fn test_round_trip_hostile_text() {
        let mut table = Table::with_columns(vec!["participant_id".to_string(), "open_emp".to_string()]);
        table.append_record(&record(&[
            ("participant_id", "p1"),
            ("open_emp", "calm, then \"uneasy\"\nfinally fine\r\ndone"),
        ]));
        let parsed = Table::from_csv(&table.to_csv()).expect("parse");
        assert_eq!(parsed, table);
    }

    #[test]
    fn test_round_trip_preserves_row_count() {
        let mut table = Table::empty();
        for i in 0..5 {
            table.append_record(&record(&[("participant_id", &format!("p{}", i))]));
        }
        let parsed = Table::from_csv(&table.to_csv()).expect("parse");
        assert_eq!(parsed.row_count(), 5);
    }

    proptest! {
        #[test]
        fn prop_round_trip_arbitrary_cells(cells in proptest::collection::vec(".{0,40}", 1..6)) {
            let columns: Vec<String> = (0..cells.len()).map(|i| format!("c{}", i)).collect();
            let mut table = Table::with_columns(columns.clone());
            let rec: Vec<(String, String)> = columns.iter().cloned().zip(cells.iter().cloned()).collect();
            table.append_record(&rec);
            let parsed = Table::from_csv(&table.to_csv()).expect("parse");
            prop_assert_eq!(parsed, table);
        }
    }
}
