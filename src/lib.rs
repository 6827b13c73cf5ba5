//! Ranked text search over in-memory records.
//!
//! Records are matched against a query field by field, either as a literal
//! substring ([`exact_search`]) or as a subsequence ([`fuzzy_search`]), and
//! come back annotated with the matched spans of each field, best match first.
//!
//! ```
//! use ranked_search::{exact_search, FieldSpec, HighlightRange};
//!
//! struct Tab {
//!     title: String,
//!     hostname: String,
//! }
//!
//! let tabs = vec![
//!     Tab { title: "Google".into(), hostname: "www.google.com".into() },
//!     Tab { title: "Rust".into(), hostname: "www.rust-lang.org".into() },
//! ];
//!
//! let fields = vec![
//!     FieldSpec::new("title", 2.0, |tab: &Tab| Some(tab.title.as_str())),
//!     FieldSpec::new("hostname", 1.0, |tab: &Tab| Some(tab.hostname.as_str())),
//! ];
//!
//! let results = exact_search("rust", &tabs, &fields).unwrap();
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].ranges("title"), &[HighlightRange::new(0, 4)]);
//! ```

pub use error::{Result, SearchError};
pub use search::*;

pub mod error;
pub mod search;
