use crate::ledger::traits::{Ledger, LedgerResult};
use std::path::Path;

/// Writes every ledger record to a CSV file
///
/// Columns: `url,first_visited,visited_at,visit_count,success,email_count,error`.
/// Returns the number of rows written.
pub fn export_ledger_csv(ledger: &dyn Ledger, path: &Path) -> LedgerResult<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "url",
        "first_visited",
        "visited_at",
        "visit_count",
        "success",
        "email_count",
        "error",
    ])?;

    let records = ledger.records();
    for record in &records {
        writer.write_record(&[
            record.url.clone(),
            record.first_visited.to_rfc3339(),
            record.visited_at.to_rfc3339(),
            record.visit_count.to_string(),
            record.success.to_string(),
            record.email_count.to_string(),
            record.error.clone().unwrap_or_default(),
        ])?;
    }
    writer.flush()?;

    tracing::info!("Exported {} ledger records to {}", records.len(), path.display());
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::JsonLedger;
    use tempfile::TempDir;

    #[test]
    fn test_export_writes_header_and_rows() {
        let mut ledger = JsonLedger::in_memory();
        ledger.mark_visited("https://a.com", true, 2, None).unwrap();
        ledger.mark_visited("https://b.com", false, 0, Some("HTTP 404")).unwrap();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.csv");
        assert_eq!(export_ledger_csv(&ledger, &path).unwrap(), 2);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec![
                "url",
                "first_visited",
                "visited_at",
                "visit_count",
                "success",
                "email_count",
                "error"
            ]
        );

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "https://a.com/");
        assert_eq!(&rows[0][4], "true");
        assert_eq!(&rows[1][4], "false");
        assert_eq!(&rows[1][6], "HTTP 404");
    }

    #[test]
    fn test_export_empty_ledger() {
        let ledger = JsonLedger::in_memory();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");

        assert_eq!(export_ledger_csv(&ledger, &path).unwrap(), 0);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
    }
}
