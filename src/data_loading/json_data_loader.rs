use serde_json::Value;

use super::data_loader::{DataLoader, Dataset};
use crate::error::{Result, SosensError};

/// JSON Data Loader - implementácia Strategy pattern pre JSON súbory
pub struct JsonDataLoader;

impl JsonDataLoader {
    pub fn new() -> Self {
        Self
    }

    /// Parsuje JSON array of objects formát
    /// Príklad: [{"N": 40, "Ph": 6.5, "Crop": "rice"}, ...]
    fn parse_json_array(&self, json_text: &str) -> Result<(Vec<String>, Vec<Vec<String>>)> {
        let parsed: Value = serde_json::from_str(json_text)?;

        let array = parsed
            .as_array()
            .ok_or_else(|| SosensError::Data("JSON must be an array of objects".to_string()))?;

        if array.is_empty() {
            return Err(SosensError::Data("JSON array is empty".to_string()));
        }

        // Hlavičky z prvého objektu, v poradí kľúčov
        let first_obj = array[0]
            .as_object()
            .ok_or_else(|| SosensError::Data("first element must be an object".to_string()))?;
        let headers: Vec<String> = first_obj.keys().cloned().collect();

        let mut records = Vec::with_capacity(array.len());
        for (idx, item) in array.iter().enumerate() {
            let obj = item
                .as_object()
                .ok_or_else(|| SosensError::Data(format!("element {} is not an object", idx)))?;

            let mut record = Vec::with_capacity(headers.len());
            for header in &headers {
                let value_str = match obj.get(header) {
                    None | Some(Value::Null) => String::new(),
                    Some(Value::Number(n)) => n.to_string(),
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Bool(b)) => if *b { "1" } else { "0" }.to_string(),
                    Some(_) => {
                        return Err(SosensError::Data(format!(
                            "unsupported value type for key '{}' in element {}",
                            header, idx
                        )))
                    }
                };
                record.push(value_str);
            }
            records.push(record);
        }

        Ok((headers, records))
    }
}

impl DataLoader for JsonDataLoader {
    fn get_name(&self) -> &str {
        "JSON Data Loader"
    }

    fn load_from_string(&self, data: &str) -> Result<Dataset> {
        self.validate_format(data)?;
        let (headers, records) = self.parse_json_array(data)?;
        Dataset::new(headers, records)
    }

    fn validate_format(&self, data: &str) -> Result<()> {
        let trimmed = data.trim();
        if trimmed.is_empty() {
            return Err(SosensError::Data("JSON data is empty".to_string()));
        }
        if !trimmed.starts_with('[') || !trimmed.ends_with(']') {
            return Err(SosensError::Data(
                "JSON must be an array (start with '[' and end with ']')".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for JsonDataLoader {
    fn default() -> Self {
        Self::new()
    }
}
