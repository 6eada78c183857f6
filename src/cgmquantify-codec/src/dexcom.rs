use std::{fs::File, io::Read, path::Path};

use cgmquantify_types::{Sample, Series};
use chrono::NaiveDateTime;

use crate::ImportError;

/// Reads Dexcom Clarity CSV exports.
///
/// Columns are addressed by header name, so column order and any extra
/// columns in the export don't matter.
#[derive(Debug, Clone)]
pub struct DexcomImporter {
    skip_rows: usize,
}

impl Default for DexcomImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DexcomImporter {
    pub const TIMESTAMP_COLUMN: &'static str = "Timestamp (YYYY-MM-DDThh:mm:ss)";
    pub const GLUCOSE_COLUMN: &'static str = "Glucose Value (mg/dL)";
    pub const TIMESTAMP_FORMAT: &'static str = "%Y-%m-%dT%H:%M:%S";

    /// Patient, device and alert rows that precede the first EGV record.
    pub const WARMUP_ROWS: usize = 12;

    pub fn new() -> Self {
        Self {
            skip_rows: Self::WARMUP_ROWS,
        }
    }

    pub fn with_skip_rows(mut self, skip_rows: usize) -> Self {
        self.skip_rows = skip_rows;
        self
    }

    pub fn import_path<P: AsRef<Path>>(&self, path: P) -> Result<Series, ImportError> {
        let file = File::open(path.as_ref())?;
        debug!("importing Dexcom export from {}", path.as_ref().display());
        self.import(file)
    }

    pub fn import<R: Read>(&self, reader: R) -> Result<Series, ImportError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let column = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(ImportError::MissingColumn(name))
        };
        let time_col = column(Self::TIMESTAMP_COLUMN)?;
        let glucose_col = column(Self::GLUCOSE_COLUMN)?;

        let mut samples = Vec::new();
        for (i, record) in reader.records().enumerate().skip(self.skip_rows) {
            let record = record?;
            let row = i + 1;
            let time = record.get(time_col).unwrap_or_default();
            let glucose = record.get(glucose_col).unwrap_or_default();
            samples.push(Self::parse_row(row, time, glucose)?);
        }

        if samples.is_empty() {
            return Err(ImportError::Empty);
        }

        debug!(
            "imported {} readings, skipped {} warm-up rows",
            samples.len(),
            self.skip_rows
        );
        Ok(Series::new(samples))
    }

    fn parse_row(row: usize, time: &str, glucose: &str) -> Result<Sample, ImportError> {
        let timestamp = NaiveDateTime::parse_from_str(time, Self::TIMESTAMP_FORMAT).map_err(
            |_| ImportError::InvalidTimestamp {
                row,
                value: time.to_owned(),
            },
        )?;

        let glucose = glucose
            .parse::<f64>()
            .ok()
            .filter(|g| g.is_finite())
            .ok_or_else(|| ImportError::InvalidGlucose {
                row,
                value: glucose.to_owned(),
            })?;

        Ok(Sample::new(timestamp, glucose))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const HEADER: &str = "Index,Timestamp (YYYY-MM-DDThh:mm:ss),Event Type,Source Device ID,Glucose Value (mg/dL),Transmitter ID";

    fn export(rows: &[&str]) -> String {
        let mut csv = String::from(HEADER);
        csv.push('\n');
        for i in 1..=DexcomImporter::WARMUP_ROWS {
            csv.push_str(&format!("{i},,FirstName,,,\n"));
        }
        for row in rows {
            csv.push_str(row);
            csv.push('\n');
        }
        csv
    }

    #[test]
    fn skips_warmup_rows() {
        let data = export(&[
            "13,2025-02-01T08:00:12,EGV,G7,110,8G",
            "14,2025-02-01T08:05:12,EGV,G7,115,8G",
            "15,2025-02-01T08:10:11,EGV,G7,121,8G",
        ]);

        let series = DexcomImporter::new().import(data.as_bytes()).unwrap();
        assert_eq!(series.len(), 3);

        let first = series.samples()[0];
        assert_eq!(
            first.timestamp,
            NaiveDate::from_ymd_opt(2025, 2, 1)
                .unwrap()
                .and_hms_opt(8, 0, 12)
                .unwrap()
        );
        assert_eq!(first.glucose, 110.0);
        assert_eq!(first.day, NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
    }

    #[test]
    fn custom_skip_rows() {
        let data = format!("{HEADER}\n1,2025-02-01T08:00:00,EGV,G7,99,8G\n");
        let series = DexcomImporter::new()
            .with_skip_rows(0)
            .import(data.as_bytes())
            .unwrap();
        assert_eq!(series.glucose().collect::<Vec<_>>(), vec![99.0]);
    }

    #[test]
    fn missing_glucose_column() {
        let data = "Index,Timestamp (YYYY-MM-DDThh:mm:ss)\n1,2025-02-01T08:00:00\n";
        let err = DexcomImporter::new().import(data.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            ImportError::MissingColumn(DexcomImporter::GLUCOSE_COLUMN)
        ));
    }

    #[test]
    fn rejects_text_glucose() {
        let data = export(&[
            "13,2025-02-01T08:00:12,EGV,G7,110,8G",
            "14,2025-02-01T08:05:12,EGV,G7,Low,8G",
        ]);
        let err = DexcomImporter::new().import(data.as_bytes()).unwrap_err();
        match err {
            ImportError::InvalidGlucose { row, value } => {
                assert_eq!(row, 14);
                assert_eq!(value, "Low");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_malformed_timestamp() {
        let data = export(&["13,02/01/2025 08:00,EGV,G7,110,8G"]);
        let err = DexcomImporter::new().import(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ImportError::InvalidTimestamp { row: 13, .. }));
    }

    #[test]
    fn only_warmup_rows_is_empty() {
        let data = export(&[]);
        let err = DexcomImporter::new().import(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ImportError::Empty));
    }
}
