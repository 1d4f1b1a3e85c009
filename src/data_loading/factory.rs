use std::path::Path;

use super::csv_data_loader::CsvDataLoader;
use super::data_loader::DataLoader;
use super::json_data_loader::JsonDataLoader;
use crate::error::{Result, SosensError};

/// Factory pre vytváranie data loaderov podľa typu
pub struct DataLoaderFactory;

impl DataLoaderFactory {
    pub fn create(loader_type: &str) -> Result<Box<dyn DataLoader>> {
        match loader_type.to_lowercase().as_str() {
            "csv" => Ok(Box::new(CsvDataLoader::new())),
            "json" => Ok(Box::new(JsonDataLoader::new())),
            _ => Err(SosensError::Config(format!("unknown loader type: {}", loader_type))),
        }
    }

    /// Vyberie loader podľa prípony súboru; bez prípony predpokladá CSV
    pub fn for_path(path: &Path) -> Result<Box<dyn DataLoader>> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => Self::create(ext),
            None => Ok(Box::new(CsvDataLoader::new())),
        }
    }
}
