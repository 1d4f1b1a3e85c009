use csv::ReaderBuilder;

use super::data_loader::{DataLoader, Dataset};
use crate::error::{Result, SosensError};

/// CSV Data Loader - implementácia Strategy pattern pre CSV súbory
pub struct CsvDataLoader {
    delimiter: u8,
}

impl CsvDataLoader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Helper pre parsovanie CSV
    fn parse_csv(&self, csv_text: &str) -> Result<(Vec<String>, Vec<Vec<String>>)> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .flexible(false)
            .trim(csv::Trim::All)
            .from_reader(csv_text.as_bytes());

        let headers: Vec<String> = rdr
            .headers()?
            .iter()
            .map(|s| s.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        if headers.is_empty() {
            return Err(SosensError::Data("CSV has no columns".to_string()));
        }

        let mut records = Vec::new();
        for (idx, record) in rdr.records().enumerate() {
            let record = record.map_err(|e| {
                SosensError::Data(format!("cannot read CSV row {}: {}", idx + 1, e))
            })?;
            records.push(record.iter().map(|val| val.to_string()).collect::<Vec<_>>());
        }

        if records.is_empty() {
            return Err(SosensError::Data("CSV contains no data rows".to_string()));
        }

        Ok((headers, records))
    }
}

impl DataLoader for CsvDataLoader {
    fn get_name(&self) -> &str {
        "CSV Data Loader"
    }

    fn load_from_string(&self, data: &str) -> Result<Dataset> {
        self.validate_format(data)?;
        let (headers, records) = self.parse_csv(data)?;
        Dataset::new(headers, records)
    }

    fn validate_format(&self, data: &str) -> Result<()> {
        if data.trim().is_empty() {
            return Err(SosensError::Data("CSV data is empty".to_string()));
        }

        // Aspoň header a jeden riadok dát
        if data.lines().filter(|l| !l.trim().is_empty()).count() < 2 {
            return Err(SosensError::Data(
                "CSV must contain a header and at least one data row".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for CsvDataLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_headers_and_rows_in_order() {
        let csv = "Ph,N,Crop\n6.5,40,rice\n7.0, 22 ,maize\n";
        let ds = CsvDataLoader::new().load_from_string(csv).unwrap();
        assert_eq!(ds.headers, vec!["Ph", "N", "Crop"]);
        assert_eq!(ds.rows[1], vec!["7.0", "22", "maize"]);
    }

    #[test]
    fn rejects_header_only_input() {
        let err = CsvDataLoader::new().load_from_string("Ph,N\n").unwrap_err();
        assert!(matches!(err, SosensError::Data(_)));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = CsvDataLoader::new().load_from_string("a,b\n1,2\n3\n").unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn quoted_thousands_column_is_not_numeric() {
        let csv = "N,Ph,Crop\n\"1,234\",6.5,rice\n\"2,000\",7.0,maize\n";
        let ds = CsvDataLoader::new().load_from_string(csv).unwrap();
        assert_eq!(ds.rows[0][0], "1,234");
        assert!(!ds.is_numeric_column(0));
        assert!(ds.is_numeric_column(1));
    }

    #[test]
    fn supports_semicolon_delimiter() {
        let ds = CsvDataLoader::with_delimiter(b';').load_from_string("a;b\n1,5;2\n").unwrap();
        assert_eq!(ds.headers, vec!["a", "b"]);
        assert_eq!(Dataset::parse_numeric(&ds.rows[0][0]), Some(1.5));
    }
}
