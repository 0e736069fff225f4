/// Token catalog and mention detection
///
/// - `catalog`: top-N snapshot cache refreshed from a [`catalog::ListingsSource`]
/// - `aliases`: lowercase lookup keys per token
/// - `matcher`: whole-word `RegexSet` over alias keys
/// - `detector`: text -> ranked, deduplicated token mentions
pub mod aliases;
pub mod catalog;
pub mod detector;
pub mod matcher;
pub mod types;

pub use self::catalog::{CatalogSettings, CatalogSnapshot, ListingsSource, TokenCatalog};
pub use self::detector::MentionDetector;
pub use self::types::TokenSummary;
