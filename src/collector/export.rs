use crate::collector::{CollectResult, EmailRecord, RunMetadata};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// One CSV row; `timestamp` is the export time
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    email: String,
    source_url: String,
    found_at: DateTime<Utc>,
    confidence: f64,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    emails: &'a [&'a EmailRecord],
    metadata: RunMetadata,
}

#[derive(Deserialize)]
struct JsonEmails {
    emails: Vec<EmailRecord>,
}

pub(super) fn write_csv(
    path: &Path,
    records: &[&EmailRecord],
    exported_at: DateTime<Utc>,
) -> CollectResult<()> {
    let mut writer = csv::Writer::from_path(path)?;

    if records.is_empty() {
        writer.write_record(["email", "source_url", "found_at", "confidence", "timestamp"])?;
    }

    for record in records {
        writer.serialize(CsvRow {
            email: record.email.clone(),
            source_url: record.source_url.clone(),
            found_at: record.found_at,
            confidence: record.confidence,
            timestamp: Some(exported_at),
        })?;
    }

    writer.flush()?;
    Ok(())
}

pub(super) fn write_json(
    path: &Path,
    records: &[&EmailRecord],
    metadata: RunMetadata,
) -> CollectResult<()> {
    let document = JsonDocument {
        emails: records,
        metadata,
    };

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &document)?;
    writer.flush()?;
    Ok(())
}

pub(super) fn read_csv(path: &Path) -> CollectResult<Vec<EmailRecord>> {
    let mut reader = csv::Reader::from_path(path)?;

    let mut records = Vec::new();
    for row in reader.deserialize::<CsvRow>() {
        let row = row?;
        records.push(EmailRecord {
            email: row.email,
            source_url: row.source_url,
            found_at: row.found_at,
            confidence: row.confidence,
            context: None,
        });
    }

    Ok(records)
}

pub(super) fn read_json(path: &Path) -> CollectResult<Vec<EmailRecord>> {
    let reader = BufReader::new(File::open(path)?);
    let document: JsonEmails = serde_json::from_reader(reader)?;
    Ok(document.emails)
}
