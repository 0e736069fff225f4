/// Analysis persistence
pub mod store;

pub use self::store::{AnalysesPage, AnalysisStore, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
