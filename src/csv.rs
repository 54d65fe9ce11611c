//! Utilities for working with CSV files.

use std::fs::File;
use std::io;
use std::path::Path;

use anyhow::Context;

/// A headered CSV table held as raw string fields. Rows may have differing lengths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}
impl CsvTable {
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        Self::read(file).with_context(|| format!("failed to read {}", path.display()))
    }

    /// Reads a table from any source. Blank lines are skipped.
    pub fn read(source: impl io::Read) -> anyhow::Result<Self> {
        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(::csv::Trim::All)
            .from_reader(source);
        let headers = reader.headers()?.iter().map(ToString::to_string).collect();
        let mut rows = vec![];
        for record in reader.records() {
            let record = record?;
            if record.iter().all(str::is_empty) {
                continue;
            }
            rows.push(record.iter().map(ToString::to_string).collect());
        }
        Ok(Self { headers, rows })
    }

}

/// Position of the first header matching any of `names`, ignoring case and surrounding spaces.
pub fn header_position<H: AsRef<str>>(headers: &[H], names: &[&str]) -> Option<usize> {
    headers.iter().position(|header| {
        let header = header.as_ref().trim();
        names.iter().any(|name| header.eq_ignore_ascii_case(name))
    })
}
