pub use exact::{ExactMatcher, ExactQuery};
pub use fuzzy::{FuzzyMatcher, FuzzyQuery};

mod exact;
mod fuzzy;
