/// Mention detector: finds catalog tokens named in free text
use crate::logger::{self, LogTag};
use crate::tokens::catalog::{CatalogSnapshot, TokenCatalog};
use crate::tokens::types::{rank_order, TokenSummary};
use std::collections::HashSet;
use std::sync::Arc;

pub struct MentionDetector {
    catalog: Arc<TokenCatalog>,
}

impl MentionDetector {
    pub fn new(catalog: Arc<TokenCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Arc<TokenCatalog> {
        &self.catalog
    }

    /// Tokens mentioned in `text`, best rank first. Never fails: catalog
    /// errors are logged and produce no mentions.
    pub async fn detect_mentions(&self, text: &str) -> Vec<TokenSummary> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let snapshot = match self.catalog.get_catalog().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                logger::warning(
                    LogTag::Detector,
                    &format!("Skipping detection, catalog unavailable: {}", e),
                );
                return Vec::new();
            }
        };

        let mentions = detect_in_snapshot(&snapshot, text);
        logger::debug(
            LogTag::Detector,
            &format!(
                "Detected {} token(s): [{}]",
                mentions.len(),
                mentions
                    .iter()
                    .map(|t| t.symbol.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        );
        mentions
    }
}

/// Whole-word alias matches in `text` against one snapshot, deduplicated by
/// token id and sorted by rank (unranked last, ties by id)
pub fn detect_in_snapshot(snapshot: &CatalogSnapshot, text: &str) -> Vec<TokenSummary> {
    let lowered = text.to_lowercase();
    let mut seen = HashSet::new();
    let mut found: Vec<TokenSummary> = snapshot
        .matcher()
        .matching_keys(&lowered)
        .filter_map(|key| snapshot.aliases().resolve(key))
        .filter(|token| seen.insert(token.id))
        .map(|token| token.as_ref().clone())
        .collect();

    found.sort_by(rank_order);
    found
}
