//! Movement classification: typed predicate rules over `(old, new, changed)`.

pub mod classifier;
pub mod predicate;

pub use classifier::{Classification, Classifier};
pub use predicate::{title_has_keyword, PredicateContext};
