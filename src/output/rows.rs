//! Tabular export of analysis records
//!
//! Each record becomes a fixed 7-column row. Long text columns are cut for
//! display; the stored records are untouched.

use crate::crawler::PageAnalysis;
use crate::CrawlerError;
use serde::Serialize;
use std::io::Write;

/// Fixed CSV header row
pub const CSV_HEADER: [&str; 7] = [
    "URL",
    "Title",
    "Description",
    "WordCount",
    "ImageCount",
    "LinkCount",
    "H1Tags",
];

pub const TITLE_MAX_CHARS: usize = 50;
pub const DESCRIPTION_MAX_CHARS: usize = 100;
pub const H1_MAX_CHARS: usize = 100;

/// One export row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub url: String,
    pub title: String,
    pub description: String,
    pub word_count: usize,
    pub image_count: usize,
    pub link_count: usize,
    pub h1_tags: String,
}

impl TableRow {
    /// Cells in [`CSV_HEADER`] order
    pub fn cells(&self) -> [String; 7] {
        [
            self.url.clone(),
            self.title.clone(),
            self.description.clone(),
            self.word_count.to_string(),
            self.image_count.to_string(),
            self.link_count.to_string(),
            self.h1_tags.clone(),
        ]
    }
}

impl From<&PageAnalysis> for TableRow {
    fn from(record: &PageAnalysis) -> Self {
        Self {
            url: record.url.clone(),
            title: truncate_chars(&record.title, TITLE_MAX_CHARS),
            description: truncate_chars(&record.meta_description, DESCRIPTION_MAX_CHARS),
            word_count: record.word_count,
            image_count: record.image_count,
            link_count: record.link_count,
            h1_tags: truncate_chars(&record.h1_tags.join("; "), H1_MAX_CHARS),
        }
    }
}

/// Projects analysis records to export rows, preserving order
pub fn to_rows<'a, I>(records: I) -> Vec<TableRow>
where
    I: IntoIterator<Item = &'a PageAnalysis>,
{
    records.into_iter().map(TableRow::from).collect()
}

/// Writes the header and all rows as CSV
pub fn write_csv<W: Write>(rows: &[TableRow], writer: W) -> Result<(), CrawlerError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.write_record(row.cells())?;
    }
    writer.flush()?;
    Ok(())
}

/// Renders rows as a CSV string
pub fn to_csv_string(rows: &[TableRow]) -> Result<String, CrawlerError> {
    let mut buffer = Vec::new();
    write_csv(rows, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| CrawlerError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Keeps at most `max` characters (not bytes)
fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
