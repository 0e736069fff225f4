use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One entry of the top-N token list, immutable for a catalog refresh cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSummary {
    pub id: i64,
    pub name: String,
    pub symbol: String,
    pub slug: String,
    /// Market-cap rank; newly listed tokens may not have one yet
    pub rank: Option<u32>,
}

impl TokenSummary {
    pub fn new(id: i64, name: &str, symbol: &str, slug: &str, rank: Option<u32>) -> Self {
        Self {
            id,
            name: name.to_string(),
            symbol: symbol.to_string(),
            slug: slug.to_string(),
            rank,
        }
    }

    /// Display label used in responses, e.g. `Bitcoin (BTC)`
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.symbol)
    }
}

/// Rank ascending, unranked last, ties by ascending id
pub fn rank_order(a: &TokenSummary, b: &TokenSummary) -> Ordering {
    match (a.rank, b.rank) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_order_puts_unranked_last() {
        let mut tokens = vec![
            TokenSummary::new(7, "Seven", "SVN", "seven", None),
            TokenSummary::new(5, "Five", "FIV", "five", Some(5)),
            TokenSummary::new(3, "Three", "THR", "three", None),
            TokenSummary::new(9, "One", "ONE", "one", Some(1)),
            TokenSummary::new(2, "Also Five", "AFV", "also-five", Some(5)),
        ];
        tokens.sort_by(rank_order);

        let ids: Vec<i64> = tokens.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![9, 2, 5, 3, 7]);
    }
}
