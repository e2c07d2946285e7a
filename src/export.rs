//! CSV export of the raw dataset.
//!
//! Backs the dashboard's download button and keeps the on-disk shape
//! documented in one place: a header row followed by one line per record,
//! dates as ISO-8601, numbers in locale-independent decimal form.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::DashboardError;
use crate::types::Record;

/// Column order of the exported file.
pub const CSV_HEADER: [&str; 5] = ["date", "sales", "visitors", "conversion_rate", "category"];

/// Serialize records as CSV with a header row.
pub fn write_csv<W: Write>(writer: W, records: &[Record]) -> Result<(), DashboardError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Parse records back from CSV produced by [`write_csv`].
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Record>, DashboardError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for row in csv_reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

/// Write the dataset to `path` for the UI's download action.
pub fn export_csv_file(path: &Path, records: &[Record]) -> Result<(), DashboardError> {
    let file = File::create(path)?;
    write_csv(file, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::generate_dataset;
    use crate::types::{Category, GenParams};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_records() -> Vec<Record> {
        vec![
            Record {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                sales: 1023.5,
                visitors: 489.25,
                conversion_rate: 0.0512,
                category: Category::B,
            },
            Record {
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                sales: 1998.0,
                visitors: 530.0,
                conversion_rate: 0.0488,
                category: Category::A,
            },
        ]
    }

    #[test]
    fn header_and_field_order_are_documented() {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &sample_records()).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, CSV_HEADER.join(","));
    }

    #[test]
    fn dates_serialize_as_iso_8601() {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &sample_records()).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let first_row = text.lines().nth(1).unwrap();
        assert!(first_row.starts_with("2024-01-01,"));
        assert!(first_row.ends_with(",B"));
    }

    #[test]
    fn round_trip_preserves_rows_and_values() {
        let records = generate_dataset(&GenParams {
            seed: Some(11),
            ..GenParams::default()
        })
        .unwrap();

        let mut buffer = Vec::new();
        write_csv(&mut buffer, &records).unwrap();
        let parsed = read_csv(buffer.as_slice()).unwrap();

        assert_eq!(parsed.len(), records.len());
        for (parsed_row, original) in parsed.iter().zip(&records) {
            assert_eq!(parsed_row.date, original.date);
            assert_eq!(parsed_row.category, original.category);
            assert!((parsed_row.sales - original.sales).abs() < 1e-9);
            assert!((parsed_row.visitors - original.visitors).abs() < 1e-9);
            assert!((parsed_row.conversion_rate - original.conversion_rate).abs() < 1e-12);
        }
    }

    #[test]
    fn file_export_writes_the_same_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dashboard_data.csv");
        let records = sample_records();

        export_csv_file(&path, &records).unwrap();

        let mut buffer = Vec::new();
        write_csv(&mut buffer, &records).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), buffer);
    }
}
