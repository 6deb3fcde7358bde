use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::info;

use crate::error::{AppError, AppResult, DataError};

/// Synthetic field holding the 1-based non-blank line number of a row.
pub const INDEX_FIELD: &str = "_INDEX";

const BYTE_ORDER_MARK: char = '\u{feff}';

/// One parsed record: header field name to raw value, plus [`INDEX_FIELD`].
///
/// Fields missing from a short line are absent, not empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: BTreeMap<String, String>,
}

impl Row {
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn index(&self) -> Option<&str> {
        self.get(INDEX_FIELD)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Immutable, ordered rows parsed once before a run starts.
#[derive(Debug, Clone, Default)]
pub struct DataTable {
    headers: Vec<String>,
    rows: Vec<Row>,
    lines: usize,
}

impl DataTable {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads a data file. A missing or empty path yields an empty table.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be opened or read, or when the
    /// separator is empty.
    pub fn load(path: Option<&Path>, separator: &str) -> AppResult<Self> {
        let Some(path) = path.filter(|path| !path.as_os_str().is_empty()) else {
            return Ok(Self::empty());
        };
        let file = File::open(path).map_err(|err| {
            AppError::data(DataError::Open {
                path: path.to_path_buf(),
                source: err,
            })
        })?;
        let table = Self::from_reader(BufReader::new(file), separator).map_err(|err| {
            AppError::data(DataError::Read {
                path: path.to_path_buf(),
                source: err,
            })
        })?;
        info!("{} data parsed, head is: {:?}", table.lines, table.headers);
        Ok(table)
    }

    /// Parses delimited lines. The first non-blank line is the header.
    ///
    /// # Errors
    ///
    /// Returns an error when reading fails or a line is not valid UTF-8. An
    /// empty separator is reported as `InvalidInput`.
    pub fn from_reader<R: BufRead>(reader: R, separator: &str) -> std::io::Result<Self> {
        if separator.is_empty() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                DataError::EmptySeparator,
            ));
        }

        let mut headers = vec![INDEX_FIELD.to_owned()];
        let mut rows = Vec::new();
        let mut lines: usize = 0;

        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            lines = lines.saturating_add(1);

            if lines == 1 {
                headers.extend(trimmed.split(separator).map(clean_header));
                continue;
            }

            rows.push(build_row(&headers, trimmed, separator, lines));
        }

        Ok(Self {
            headers,
            rows,
            lines,
        })
    }

    /// Header names, starting with [`INDEX_FIELD`].
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of non-blank lines read, header included.
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.lines
    }

    /// Position used for sequence number `seq`: `seq mod len`.
    #[must_use]
    pub fn case_for(&self, seq: u64) -> Option<u64> {
        let len = u64::try_from(self.rows.len()).ok()?;
        seq.checked_rem(len)
    }

    /// Round-robin row selection for sequence number `seq`.
    #[must_use]
    pub fn row_for(&self, seq: u64) -> Option<&Row> {
        let case = self.case_for(seq)?;
        let idx = usize::try_from(case).ok()?;
        self.rows.get(idx)
    }
}

fn clean_header(token: &str) -> String {
    token
        .trim()
        .trim_start_matches(BYTE_ORDER_MARK)
        .trim()
        .to_owned()
}

fn build_row(headers: &[String], line: &str, separator: &str, line_number: usize) -> Row {
    let mut fields = BTreeMap::new();
    fields.insert(INDEX_FIELD.to_owned(), line_number.to_string());
    let names = headers.iter().skip(1);
    for (name, value) in names.zip(line.split(separator)) {
        fields.insert(name.clone(), value.to_owned());
    }
    Row { fields }
}
