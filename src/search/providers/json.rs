use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Result;
use log::warn;
use serde::Deserialize;
use serde_json::Value;

use crate::search::Provider;

/// Reads records from a JSON file holding either an array of objects
/// or an object with an `items` array.
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Provider for JsonFile {
    fn title(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<Value>> {
        let reader = BufReader::new(File::open(&self.path)?);
        let document: Document = serde_json::from_reader(reader)?;

        let items = match document {
            Document::Records(items) => items,
            Document::Wrapped { items } => items,
        };

        let total = items.len();
        let records: Vec<Value> = items.into_iter().filter(Value::is_object).collect();

        if records.len() < total {
            warn!(
                "{}: skipped {} entries that are not objects",
                self.title(),
                total - records.len()
            );
        }

        Ok(records)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Records(Vec<Value>),
    Wrapped { items: Vec<Value> },
}
