use serde::Serialize;

use crate::error::DashboardError;

const UTF8_BOM: &str = "\u{feff}";

/// A CSV document held as strings: one header row plus equally wide records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Decode `bytes` as UTF-8 and parse them as a headed CSV document.
    ///
    /// Every record must have as many fields as the header row.
    pub fn parse(bytes: &[u8]) -> Result<Self, DashboardError> {
        let text = std::str::from_utf8(bytes)?;
        let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(DashboardError::Parse(
                "No columns to parse from file".to_string(),
            ));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// First `n` rows, or all of them when the table is shorter.
    pub fn head(&self, n: usize) -> &[Vec<String>] {
        &self.rows[..n.min(self.rows.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_headed_csv() {
        let table = CsvTable::parse(b"num_date_time,answer\n1_20240101 00,10\n2_20240101 00,20\n")
            .unwrap();
        assert_eq!(table.headers, vec!["num_date_time", "answer"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[1], vec!["2_20240101 00", "20"]);
        assert_eq!(table.column_index("answer"), Some(1));
        assert_eq!(table.column_index("missing"), None);
    }

    #[test]
    fn test_quoted_fields_keep_commas() {
        let table = CsvTable::parse(b"name,note\n\"a, b\",x\n").unwrap();
        assert_eq!(table.rows[0][0], "a, b");
    }

    #[test]
    fn test_leading_bom_is_ignored() {
        let table = CsvTable::parse("\u{feff}num_date_time,answer\n1_x,1\n".as_bytes()).unwrap();
        assert_eq!(table.headers[0], "num_date_time");
    }

    #[test]
    fn test_non_utf8_is_decode_error() {
        let err = CsvTable::parse(&[b'a', b',', 0xff, 0xfe, b'\n']).unwrap_err();
        assert!(matches!(err, DashboardError::Decode(_)));
    }

    #[test]
    fn test_ragged_rows_are_parse_error() {
        let err = CsvTable::parse(b"a,b\n1,2\n3,4,5\n").unwrap_err();
        assert!(matches!(err, DashboardError::Parse(_)));
    }

    #[test]
    fn test_empty_input_is_parse_error() {
        let err = CsvTable::parse(b"").unwrap_err();
        assert!(matches!(err, DashboardError::Parse(_)));
    }

    #[test]
    fn test_head_clamps_to_length() {
        let table = CsvTable::parse(b"a\n1\n2\n3\n").unwrap();
        assert_eq!(table.head(10).len(), 3);
        assert_eq!(table.head(2).len(), 2);
        assert!(table.head(0).is_empty());
    }
}
