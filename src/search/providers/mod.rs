use std::sync::Arc;

use anyhow::{Context, Result};
use itertools::Itertools;
use serde_json::Value;

pub use json::JsonFile;

mod json;

/// A source of records to search.
pub trait Provider: Send + Sync {
    fn title(&self) -> String {
        "Unknown".into()
    }

    /// Loads all records that this provider can provide.
    fn load(&self) -> Result<Vec<Value>>;
}

/// Loads all providers in parallel. Records keep the order of their providers.
pub fn load_records(providers: &[Arc<dyn Provider>]) -> Result<Vec<Value>> {
    use rayon::prelude::*;

    let loaded: Vec<_> = providers
        .par_iter()
        .map(|provider| {
            provider
                .load()
                .with_context(|| format!("failed to load records from {}", provider.title()))
        })
        .collect();

    let records: Vec<Value> = loaded.into_iter().flatten_ok().try_collect()?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    struct Fixed(Vec<Value>);

    impl Provider for Fixed {
        fn load(&self) -> Result<Vec<Value>> {
            Ok(self.0.clone())
        }
    }

    struct Broken;

    impl Provider for Broken {
        fn title(&self) -> String {
            "broken".into()
        }

        fn load(&self) -> Result<Vec<Value>> {
            anyhow::bail!("unavailable")
        }
    }

    #[test]
    fn concatenates_in_provider_order() {
        let providers: Vec<Arc<dyn Provider>> = vec![
            Arc::new(Fixed(vec![json!({"id": 1}), json!({"id": 2})])),
            Arc::new(Fixed(vec![])),
            Arc::new(Fixed(vec![json!({"id": 3})])),
        ];

        let records = load_records(&providers).unwrap();
        assert_eq!(records, vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})]);
    }

    #[test]
    fn one_failing_provider_fails_the_load() {
        let providers: Vec<Arc<dyn Provider>> =
            vec![Arc::new(Fixed(vec![json!({"id": 1})])), Arc::new(Broken)];

        let err = load_records(&providers).unwrap_err();
        assert!(format!("{err:#}").contains("broken"));
        assert!(format!("{err:#}").contains("unavailable"));
    }
}
