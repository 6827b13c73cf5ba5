use std::borrow::Cow;
use std::fmt;

use serde::Deserialize;
use serde_json::Value;

type Borrowed<R> = Box<dyn for<'r> Fn(&'r R) -> Option<&'r str> + Send + Sync>;
type Computed<R> = Box<dyn Fn(&R) -> Option<String> + Send + Sync>;

enum Getter<R> {
    Borrowed(Borrowed<R>),
    Computed(Computed<R>),
}

/// A textual field of a record that takes part in matching.
pub struct FieldSpec<R> {
    name: String,
    weight: f64,
    getter: Getter<R>,
}

impl<R> FieldSpec<R> {
    /// Creates a field reading its text through `getter`.
    ///
    /// The name keys the field's highlight ranges in the results and must
    /// be unique within one search. A getter returning `None` is treated
    /// like an empty string.
    pub fn new<F>(name: impl Into<String>, weight: f64, getter: F) -> Self
    where
        F: for<'r> Fn(&'r R) -> Option<&'r str> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            weight,
            getter: Getter::Borrowed(Box::new(getter)),
        }
    }

    /// Creates a field whose text is derived from the record on every
    /// search, e.g. a hostname parsed out of a stored URL.
    pub fn computed<F>(name: impl Into<String>, weight: f64, getter: F) -> Self
    where
        F: Fn(&R) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            weight,
            getter: Getter::Computed(Box::new(getter)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// The text of this field for the given record.
    pub fn text<'r>(&self, record: &'r R) -> Cow<'r, str> {
        match &self.getter {
            Getter::Borrowed(getter) => Cow::Borrowed(getter(record).unwrap_or_default()),
            Getter::Computed(getter) => getter(record).map(Cow::Owned).unwrap_or_default(),
        }
    }
}

impl<R> fmt::Debug for FieldSpec<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .finish_non_exhaustive()
    }
}

impl FieldSpec<Value> {
    /// A field of a JSON record addressed by its dotted name,
    /// e.g. `"tab.title"` reads `record["tab"]["title"]`.
    pub fn path(name: impl Into<String>, weight: f64) -> Self {
        let name = name.into();
        let path = name.clone();
        Self::with_path(name, weight, &path)
    }

    /// Like [`FieldSpec::path`], but with a display name that differs from the path.
    pub fn with_path(name: impl Into<String>, weight: f64, path: &str) -> Self {
        let segments: Vec<String> = path.split('.').map(str::to_owned).collect();
        Self::new(name, weight, move |record: &Value| {
            resolve_path(record, &segments)
        })
    }
}

/// Walks `segments` into a JSON value. Array elements are addressed by index.
/// Anything that is not a string at the end of the path resolves to `None`.
pub fn resolve_path<'r>(record: &'r Value, segments: &[String]) -> Option<&'r str> {
    segments
        .iter()
        .try_fold(record, |value, segment| match value {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|idx| items.get(idx)),
            _ => None,
        })?
        .as_str()
}

/// Serializable description of a field of a JSON record.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FieldConfig {
    pub name: String,

    #[serde(default = "default_weight")]
    pub weight: f64,

    /// Dotted path to read, defaults to the name.
    #[serde(default)]
    pub path: Option<String>,
}

fn default_weight() -> f64 {
    1.0
}

impl FieldConfig {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
            path: None,
        }
    }
}

impl From<FieldConfig> for FieldSpec<Value> {
    fn from(config: FieldConfig) -> Self {
        match config.path {
            Some(path) => FieldSpec::with_path(config.name, config.weight, &path),
            None => FieldSpec::path(config.name, config.weight),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn dotted_path_reaches_nested_values() {
        let record = json!({"tab": {"title": "Inbox", "url": "https://mail.example.com"}});

        assert_eq!(FieldSpec::path("tab.title", 1.0).text(&record), "Inbox");
        assert_eq!(FieldSpec::path("tab.missing", 1.0).text(&record), "");
        assert_eq!(FieldSpec::path("tab", 1.0).text(&record), "");
    }

    #[test]
    fn computed_fields_own_their_text() {
        struct Tab {
            url: String,
        }

        let hostname = FieldSpec::computed("hostname", 1.0, |tab: &Tab| {
            let rest = tab.url.split_once("://")?.1;
            Some(rest.split('/').next()?.to_owned())
        });

        let tab = Tab {
            url: "https://docs.rs/regex/latest".into(),
        };
        assert_eq!(hostname.text(&tab), "docs.rs");
        assert_eq!(hostname.text(&Tab { url: "about:blank".into() }), "");
    }

    #[test]
    fn arrays_are_indexed_by_position() {
        let record = json!({"tags": ["rust", "search"]});
        let segments = vec!["tags".to_string(), "1".to_string()];

        assert_eq!(resolve_path(&record, &segments), Some("search"));
    }

    #[test]
    fn non_string_leaves_are_empty() {
        let record = json!({"count": 3, "flag": true, "nothing": null});

        for name in ["count", "flag", "nothing"] {
            assert_eq!(FieldSpec::path(name, 1.0).text(&record), "");
        }
    }

    #[test]
    fn config_defaults() {
        let config: FieldConfig = serde_json::from_str(r#"{"name": "title"}"#).unwrap();
        assert_eq!(config, FieldConfig::new("title", 1.0));

        let config: FieldConfig =
            serde_json::from_str(r#"{"name": "host", "weight": 0.5, "path": "tab.hostname"}"#)
                .unwrap();
        let field = FieldSpec::from(config);

        assert_eq!(field.name(), "host");
        assert_eq!(field.weight(), 0.5);
        assert_eq!(field.text(&json!({"tab": {"hostname": "example.com"}})), "example.com");
    }
}
