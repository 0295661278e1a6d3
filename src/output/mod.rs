//! Output module for aggregating and exporting crawl results
//!
//! This module handles:
//! - Summary statistics over analysis records
//! - Fixed-column tabular rows and CSV rendering
//! - The JSON report envelope around a crawl result

mod report;
mod rows;
pub mod stats;

pub use report::{crawl_report, CrawlReport};
pub use rows::{
    to_csv_string, to_rows, write_csv, TableRow, CSV_HEADER, DESCRIPTION_MAX_CHARS,
    H1_MAX_CHARS, TITLE_MAX_CHARS,
};
pub use stats::{most_common_terms, print_statistics, summarize, CrawlStats, TermCount, TOP_TERMS};
