/// Alias index: lowercase lookup keys derived from token names and symbols
///
/// Every token contributes up to five keys: its name, its name with all
/// whitespace removed, its symbol, `$symbol`, and ` symbol ` (space padded).
/// A key shared by several tokens keeps every candidate, best rank first.
use crate::logger::{self, LogTag};
use crate::tokens::types::{rank_order, TokenSummary};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct AliasIndex {
    entries: BTreeMap<String, Vec<Arc<TokenSummary>>>,
}

impl AliasIndex {
    pub fn build(tokens: &[Arc<TokenSummary>]) -> Self {
        let mut entries: BTreeMap<String, Vec<Arc<TokenSummary>>> = BTreeMap::new();

        for token in tokens {
            for key in alias_keys(token) {
                let candidates = entries.entry(key).or_default();
                if !candidates.iter().any(|c| c.id == token.id) {
                    candidates.push(Arc::clone(token));
                }
            }
        }

        let mut collisions = 0;
        for (key, candidates) in entries.iter_mut() {
            candidates.sort_by(|a, b| rank_order(a, b));
            if candidates.len() > 1 {
                collisions += 1;
                logger::debug(
                    LogTag::Catalog,
                    &format!(
                        "Alias '{}' shared by {} tokens, resolving to {}",
                        key.trim(),
                        candidates.len(),
                        candidates[0].label()
                    ),
                );
            }
        }

        if collisions > 0 {
            logger::info(
                LogTag::Catalog,
                &format!("Alias index has {} colliding keys", collisions),
            );
        }

        Self { entries }
    }

    /// All candidates for a key, best-ranked first
    pub fn get(&self, key: &str) -> Option<&[Arc<TokenSummary>]> {
        self.entries.get(key).map(|v| v.as_slice())
    }

    /// Best-ranked token for a key
    pub fn resolve(&self, key: &str) -> Option<&Arc<TokenSummary>> {
        self.entries.get(key).and_then(|v| v.first())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of keys claimed by more than one token
    pub fn collisions(&self) -> usize {
        self.entries.values().filter(|v| v.len() > 1).count()
    }
}

/// Lowercase lookup keys for a single token, without duplicates
pub fn alias_keys(token: &TokenSummary) -> Vec<String> {
    let mut keys = Vec::with_capacity(5);
    let name = token.name.trim().to_lowercase();
    let symbol = token.symbol.trim().to_lowercase();

    if !name.is_empty() {
        let compact: String = name.chars().filter(|c| !c.is_whitespace()).collect();
        keys.push(name);
        keys.push(compact);
    }

    if !symbol.is_empty() {
        keys.push(format!("${}", symbol));
        keys.push(format!(" {} ", symbol));
        keys.push(symbol);
    }

    keys.sort();
    keys.dedup();
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(id: i64, name: &str, symbol: &str, rank: Option<u32>) -> Arc<TokenSummary> {
        Arc::new(TokenSummary::new(id, name, symbol, &name.to_lowercase(), rank))
    }

    #[test]
    fn test_alias_keys_variants() {
        let keys = alias_keys(&token(5426, "Shiba Inu", "SHIB", Some(12)));
        assert_eq!(
            keys,
            vec![" shib ", "$shib", "shib", "shiba inu", "shibainu"]
        );
    }

    #[test]
    fn test_alias_keys_skip_empty_fields() {
        assert_eq!(alias_keys(&token(1, "", "BTC", Some(1))).len(), 3);
        assert_eq!(alias_keys(&token(1, "Bitcoin", "  ", Some(1))), vec!["bitcoin"]);
        assert!(alias_keys(&token(1, " ", "", Some(1))).is_empty());
    }

    #[test]
    fn test_unranked_token_still_indexed() {
        let index = AliasIndex::build(&[token(99, "Fresh Coin", "FRSH", None)]);
        assert_eq!(index.resolve("frsh").unwrap().id, 99);
        assert_eq!(index.resolve("freshcoin").unwrap().id, 99);
        assert_eq!(index.len(), 5);
    }

    #[test]
    fn test_collision_keeps_all_candidates_best_rank_first() {
        let index = AliasIndex::build(&[
            token(30, "Unus Sed Leo", "LEO", None),
            token(20, "Leo Token", "LEO", Some(40)),
            token(10, "Leo Classic", "LEO", Some(12)),
        ]);

        let candidates = index.get("leo").unwrap();
        let ids: Vec<i64> = candidates.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
        assert_eq!(index.resolve("$leo").unwrap().id, 10);
        assert_eq!(index.collisions(), 3);
    }

    #[test]
    fn test_single_word_name_has_no_self_collision() {
        let index = AliasIndex::build(&[token(1, "Bitcoin", "BTC", Some(1))]);
        assert_eq!(index.get("bitcoin").unwrap().len(), 1);
        assert_eq!(index.collisions(), 0);
    }
}
