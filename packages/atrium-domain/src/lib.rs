pub mod mmr;
pub mod normalize;
pub mod query;
pub mod score;
pub mod tables;

pub use query::{Intent, ProjectAlias};
pub use score::{PaymentPageRange, Provenance};
pub use tables::{KeywordTableClassifier, TableClassifier, TableKind};
