use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::data_models::LeadRecord;
use crate::errors::LeadError;

/// Separator for multi-valued cells (several emails, phone numbers...).
pub const LIST_SEPARATOR: &str = "; ";

/// Column layout of the exported CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportSchema {
    /// Contact fields plus one column per social network.
    Social,
    /// Source url plus contact fields, no social columns.
    Url,
}

const SOCIAL_COLUMNS: [&str; 8] = [
    "page_title",
    "email_addresses",
    "phone_numbers",
    "facebook",
    "instagram",
    "linkedin",
    "twitter",
    "github",
];

const URL_COLUMNS: [&str; 4] = ["url", "page_title", "email_addresses", "phone_numbers"];

impl ExportSchema {
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            ExportSchema::Social => &SOCIAL_COLUMNS,
            ExportSchema::Url => &URL_COLUMNS,
        }
    }

    /// Projects a record onto this schema. Missing fields become empty
    /// cells.
    pub fn row(&self, record: &LeadRecord) -> Vec<String> {
        let title = record.page_title.clone().unwrap_or_default();
        let join = |values: &[String]| values.join(LIST_SEPARATOR);
        match self {
            ExportSchema::Social => vec![
                title,
                join(&record.email_addresses),
                join(&record.phone_numbers),
                join(&record.facebook),
                join(&record.instagram),
                join(&record.linkedin),
                join(&record.twitter),
                join(&record.github),
            ],
            ExportSchema::Url => vec![
                record.url.clone().unwrap_or_default(),
                title,
                join(&record.email_addresses),
                join(&record.phone_numbers),
            ],
        }
    }
}

/// Writes every record without an error marker to `destination` and returns
/// the number of data rows.
///
/// Rows go to a temporary file next to `destination` which replaces it only
/// once everything is flushed. On failure the destination is left untouched.
pub fn export(
    records: Vec<LeadRecord>,
    destination: &Path,
    schema: ExportSchema,
) -> Result<usize, LeadError> {
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir).map_err(|e| LeadError::export(destination, e))?;

    let mut writer = csv::Writer::from_writer(tmp);
    writer
        .write_record(schema.header())
        .map_err(|e| LeadError::export(destination, e))?;

    let mut rows = 0;
    for record in records.iter().filter(|r| !r.is_error()) {
        writer
            .write_record(schema.row(record))
            .map_err(|e| LeadError::export(destination, e))?;
        rows += 1;
    }

    let mut tmp = writer
        .into_inner()
        .map_err(|e| LeadError::export(destination, e.into_error()))?;
    tmp.flush().map_err(|e| LeadError::export(destination, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| LeadError::export(destination, e))?;
    tmp.persist(destination)
        .map_err(|e| LeadError::export(destination, e.error))?;

    log::info!(
        "wrote {} leads to {} ({} records dropped)",
        rows,
        destination.display(),
        records.len() - rows
    );
    Ok(rows)
}
