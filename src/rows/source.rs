// ABOUTME: Delimited data parsing into header and field dictionaries
// ABOUTME: Builds one read-only RowDictionary per data row for template resolution

use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

use super::error::{Result, RowSourceError};

/// Field delimiter for the data file. Unrecognized configuration values
/// fall back to comma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldDelimiter {
    #[default]
    Comma,
    Semicolon,
    Pipe,
    Tab,
}

impl FieldDelimiter {
    pub fn from_config(value: &str) -> Self {
        match value {
            "," | "comma" => Self::Comma,
            ";" | "semicolon" => Self::Semicolon,
            "|" | "pipe" => Self::Pipe,
            "\t" | "tab" => Self::Tab,
            other => {
                warn!("Unrecognized field delimiter '{}', using comma", other);
                Self::Comma
            }
        }
    }

    pub fn as_byte(&self) -> u8 {
        match self {
            Self::Comma => b',',
            Self::Semicolon => b';',
            Self::Pipe => b'|',
            Self::Tab => b'\t',
        }
    }
}

/// Field enclosure character. Unrecognized configuration values fall back
/// to double quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldQuote {
    #[default]
    Double,
    Single,
}

impl FieldQuote {
    pub fn from_config(value: &str) -> Self {
        match value {
            "\"" | "double" => Self::Double,
            "'" | "single" => Self::Single,
            other => {
                warn!("Unrecognized field enclosure '{}', using double quotes", other);
                Self::Double
            }
        }
    }

    pub fn as_byte(&self) -> u8 {
        match self {
            Self::Double => b'"',
            Self::Single => b'\'',
        }
    }
}

/// Mapping from header field name to the row's value. Built fresh per row
/// and read-only during template resolution.
#[derive(Debug, Clone, Default)]
pub struct RowDictionary {
    fields: HashMap<String, String>,
}

impl RowDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: String, value: String) {
        self.fields.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|v| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for RowDictionary {
    fn from(pairs: [(&str, &str); N]) -> Self {
        let mut dict = Self::new();
        for (name, value) in pairs {
            dict.insert(name.to_string(), value.to_string());
        }
        dict
    }
}

/// A single data row: its 1-based position in the file body and its
/// field dictionary.
#[derive(Debug, Clone)]
pub struct Row {
    pub index: usize,
    pub dictionary: RowDictionary,
}

/// Non-fatal condition noticed while combining a record with the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowWarning {
    pub row_index: usize,
    pub expected_fields: usize,
    pub actual_fields: usize,
}

impl std::fmt::Display for RowWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "row {} has {} fields, header has {}",
            self.row_index, self.actual_fields, self.expected_fields
        )
    }
}

/// Parsed data file: header, rows, and any arity warnings collected while
/// zipping records with the header.
#[derive(Debug, Clone)]
pub struct RowSet {
    pub header: Vec<String>,
    pub rows: Vec<Row>,
    pub warnings: Vec<RowWarning>,
}

impl RowSet {
    /// Parse raw bytes into a header and one dictionary per data row.
    ///
    /// The first record is the header. Later records combine positionally
    /// with it; short records leave their trailing fields absent and long
    /// records drop the extras — both are recorded as warnings, not errors.
    pub fn parse(data: &[u8], delimiter: FieldDelimiter, quote: FieldQuote) -> Result<RowSet> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter.as_byte())
            .quote(quote.as_byte())
            .has_headers(false)
            .flexible(true)
            .from_reader(data);

        let mut records = reader.records();

        let header: Vec<String> = match records.next() {
            Some(record) => record?.iter().map(|f| f.to_string()).collect(),
            None => return Err(RowSourceError::MissingHeader),
        };

        let mut rows = Vec::new();
        let mut warnings = Vec::new();

        for (offset, record) in records.enumerate() {
            let record = record?;
            let index = offset + 1;

            if record.len() != header.len() {
                warnings.push(RowWarning {
                    row_index: index,
                    expected_fields: header.len(),
                    actual_fields: record.len(),
                });
            }

            let mut dictionary = RowDictionary::new();
            for (name, value) in header.iter().zip(record.iter()) {
                dictionary.insert(name.clone(), value.to_string());
            }

            rows.push(Row { index, dictionary });
        }

        debug!(
            "Parsed {} data rows ({} fields, {} warnings)",
            rows.len(),
            header.len(),
            warnings.len()
        );

        Ok(RowSet {
            header,
            rows,
            warnings,
        })
    }

    /// Read and parse a data file. An unreadable file is fatal; nothing is
    /// produced for any row.
    pub fn from_path(
        path: impl AsRef<Path>,
        delimiter: FieldDelimiter,
        quote: FieldQuote,
    ) -> Result<RowSet> {
        let data = std::fs::read(path)?;
        Self::parse(&data, delimiter, quote)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_semicolon_delimited() {
        let data = b"name;email\nAlice;alice@x.com\nBob;bob@x.com\n";
        let rows =
            RowSet::parse(data, FieldDelimiter::Semicolon, FieldQuote::Double).unwrap();

        assert_eq!(rows.header, vec!["name", "email"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.rows[0].index, 1);
        assert_eq!(rows.rows[0].dictionary.get("name"), Some("Alice"));
        assert_eq!(rows.rows[1].dictionary.get("email"), Some("bob@x.com"));
        assert!(rows.warnings.is_empty());
    }

    #[test]
    fn test_parse_quoted_fields() {
        let data = b"name,city\n\"Smith, Jane\",Berlin\n";
        let rows = RowSet::parse(data, FieldDelimiter::Comma, FieldQuote::Double).unwrap();

        assert_eq!(rows.rows[0].dictionary.get("name"), Some("Smith, Jane"));
        assert_eq!(rows.rows[0].dictionary.get("city"), Some("Berlin"));
    }

    #[test]
    fn test_short_row_leaves_fields_absent() {
        let data = b"name;email;city\nAlice;alice@x.com\n";
        let rows =
            RowSet::parse(data, FieldDelimiter::Semicolon, FieldQuote::Double).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows.rows[0].dictionary.get("name"), Some("Alice"));
        assert_eq!(rows.rows[0].dictionary.get("city"), None);
        assert_eq!(rows.warnings.len(), 1);
        assert_eq!(rows.warnings[0].row_index, 1);
        assert_eq!(rows.warnings[0].expected_fields, 3);
        assert_eq!(rows.warnings[0].actual_fields, 2);
    }

    #[test]
    fn test_long_row_drops_extras() {
        let data = b"name\nAlice;extra\n";
        let rows =
            RowSet::parse(data, FieldDelimiter::Semicolon, FieldQuote::Double).unwrap();

        assert_eq!(rows.rows[0].dictionary.len(), 1);
        assert_eq!(rows.warnings.len(), 1);
    }

    #[test]
    fn test_empty_input_is_fatal() {
        let result = RowSet::parse(b"", FieldDelimiter::Comma, FieldQuote::Double);
        assert!(matches!(result, Err(RowSourceError::MissingHeader)));
    }

    #[test]
    fn test_delimiter_fallback() {
        assert_eq!(FieldDelimiter::from_config("tab"), FieldDelimiter::Tab);
        assert_eq!(FieldDelimiter::from_config(";"), FieldDelimiter::Semicolon);
        assert_eq!(FieldDelimiter::from_config("bogus"), FieldDelimiter::Comma);
        assert_eq!(FieldQuote::from_config("'"), FieldQuote::Single);
        assert_eq!(FieldQuote::from_config("???"), FieldQuote::Double);
    }
}
