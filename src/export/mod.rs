// src/export/mod.rs

//! Flat-file exports.
//!
//! Pure serialization over whatever collection it is given, in insertion
//! order; deduplication is the store's concern. Zero rows still produce a
//! well-formed file.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use rust_xlsxwriter::Workbook;
use serde::Serialize;

use crate::error::Result;
use crate::models::{JobPosting, StoredJob};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Csv,
    Json,
    Excel,
}

impl Format {
    /// File extension for the format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Excel => "xlsx",
        }
    }
}

// clap renders default_value_t through Display.
impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Excel => "excel",
        })
    }
}

/// A record type the exporters know how to lay out.
pub trait Exportable: Serialize {
    /// Column headers, matching the serialized field order.
    fn headers() -> &'static [&'static str];

    /// One spreadsheet row; absent fields render as empty cells.
    fn row(&self) -> Vec<String>;
}

impl Exportable for JobPosting {
    fn headers() -> &'static [&'static str] {
        &[
            "job_id",
            "title",
            "company",
            "location",
            "salary",
            "job_type",
            "date_posted",
            "url",
            "source",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.job_id.clone().unwrap_or_default(),
            self.title.clone(),
            self.company.clone(),
            self.location.clone(),
            self.salary.clone().unwrap_or_default(),
            self.job_type.clone().unwrap_or_default(),
            self.date_posted.clone().unwrap_or_default(),
            self.url.clone(),
            self.source.label().to_string(),
        ]
    }
}

impl Exportable for StoredJob {
    fn headers() -> &'static [&'static str] {
        &[
            "job_id",
            "title",
            "company",
            "location",
            "salary",
            "job_type",
            "date_posted",
            "url",
            "source",
            "scraped_at",
            "last_seen",
            "is_active",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.job_id.clone(),
            self.title.clone(),
            self.company.clone(),
            self.location.clone(),
            self.salary.clone().unwrap_or_default(),
            self.job_type.clone().unwrap_or_default(),
            self.date_posted.clone().unwrap_or_default(),
            self.url.clone(),
            self.source.label().to_string(),
            self.scraped_at.to_rfc3339(),
            self.last_seen.to_rfc3339(),
            self.is_active.to_string(),
        ]
    }
}

/// Write rows to a file in the requested format.
pub fn write<T: Exportable>(path: &Path, rows: &[T], format: Format) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    match format {
        Format::Csv => write_csv(path, rows),
        Format::Json => write_json(path, rows),
        Format::Excel => write_xlsx(path, rows),
    }
}

fn write_csv<T: Exportable>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    if rows.is_empty() {
        // serialize() emits the header row itself; an empty export still
        // needs one.
        writer.write_record(T::headers())?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json<T: Exportable>(path: &Path, rows: &[T]) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), rows)?;
    Ok(())
}

fn write_xlsx<T: Exportable>(path: &Path, rows: &[T]) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in T::headers().iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }
    for (idx, row) in rows.iter().enumerate() {
        for (col, value) in row.row().into_iter().enumerate() {
            worksheet.write_string(idx as u32 + 1, col as u16, value.as_str())?;
        }
    }

    workbook.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::models::Source;

    fn postings() -> Vec<JobPosting> {
        vec![
            JobPosting {
                job_id: Some("39078480".to_string()),
                title: "software developer".to_string(),
                company: "Acme Widgets Ltd.".to_string(),
                location: "Toronto (ON)".to_string(),
                salary: Some("$45.00 hourly".to_string()),
                job_type: Some("Remote".to_string()),
                date_posted: Some("January 15, 2026".to_string()),
                url: "https://www.jobbank.gc.ca/jobsearch/jobposting/39078480".to_string(),
                source: Source::JobBank,
            },
            JobPosting {
                job_id: None,
                title: "data analyst".to_string(),
                company: String::new(),
                location: "Vancouver (BC)".to_string(),
                salary: None,
                job_type: None,
                date_posted: None,
                url: "https://www.jobbank.gc.ca/jobsearch/jobposting/40000001".to_string(),
                source: Source::Partner("Indeed".to_string()),
            },
        ]
    }

    #[test]
    fn csv_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("jobs.csv");
        let original = postings();

        write(&path, &original, Format::Csv).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let read_back: Vec<JobPosting> = reader
            .deserialize()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(read_back, original);
    }

    #[test]
    fn json_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("jobs.json");
        let original = postings();

        write(&path, &original, Format::Json).unwrap();

        let file = File::open(&path).unwrap();
        let read_back: Vec<JobPosting> = serde_json::from_reader(file).unwrap();
        assert_eq!(read_back, original);
    }

    #[test]
    fn empty_csv_still_has_headers() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.csv");

        write::<JobPosting>(&path, &[], Format::Csv).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.starts_with("job_id,title,company"));
    }

    #[test]
    fn empty_json_is_an_empty_array() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.json");

        write::<JobPosting>(&path, &[], Format::Json).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), "[]");
    }

    #[test]
    fn xlsx_writes_a_workbook() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("jobs.xlsx");

        write(&path, &postings(), Format::Excel).unwrap();

        let metadata = fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }

    #[test]
    fn write_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("exports/2026/jobs.json");

        write(&path, &postings(), Format::Json).unwrap();
        assert!(path.exists());
    }
}
