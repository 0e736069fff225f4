/// Whole-word matcher over alias keys, compiled once per catalog snapshot
use regex::{RegexSet, RegexSetBuilder};

const SIZE_LIMIT: usize = 64 * (1 << 20);

#[derive(Debug)]
pub struct MentionMatcher {
    set: RegexSet,
    keys: Vec<String>,
}

impl MentionMatcher {
    /// Compile one pattern per key; pattern index `i` corresponds to `keys[i]`
    pub fn build<I, S>(keys: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        let set = RegexSetBuilder::new(keys.iter().map(|k| pattern_for(k)))
            .size_limit(SIZE_LIMIT)
            .build()?;

        Ok(Self { set, keys })
    }

    /// Keys present in `lowered` as whole words. Input must already be lowercase.
    pub fn matching_keys<'a>(&'a self, lowered: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.set
            .matches(lowered)
            .into_iter()
            .map(move |i| self.keys[i].as_str())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Escaped key guarded on both sides so it only matches as a standalone word.
///
/// Word-character edges get `\b`. Punctuation edges (`$eth`, `usd+`) require
/// a non-word character or the end of input next to them. Whitespace edges
/// (` btc `) delimit themselves.
pub fn pattern_for(key: &str) -> String {
    let mut pattern = String::with_capacity(key.len() + 24);
    match key.chars().next() {
        Some(c) if is_word_char(c) => pattern.push_str(r"\b"),
        Some(c) if !c.is_whitespace() => pattern.push_str(r"(?:^|[^\w])"),
        _ => {}
    }
    pattern.push_str(&regex::escape(key));
    match key.chars().next_back() {
        Some(c) if is_word_char(c) => pattern.push_str(r"\b"),
        Some(c) if !c.is_whitespace() => pattern.push_str(r"(?:[^\w]|$)"),
        _ => {}
    }
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(matcher: &MentionMatcher, text: &str) -> Vec<String> {
        let mut keys: Vec<String> = matcher
            .matching_keys(&text.to_lowercase())
            .map(String::from)
            .collect();
        keys.sort();
        keys
    }

    #[test]
    fn test_pattern_boundaries() {
        assert_eq!(pattern_for("btc"), r"\bbtc\b");
        assert_eq!(pattern_for("$eth"), r"(?:^|[^\w])\$eth\b");
        assert_eq!(pattern_for(" sol "), " sol ");
        assert_eq!(pattern_for("usd+"), r"\busd\+(?:[^\w]|$)");
    }

    #[test]
    fn test_whole_word_only() {
        let matcher = MentionMatcher::build(["btc", "bitcoin"]).unwrap();
        assert_eq!(matched(&matcher, "BTC is pumping"), vec!["btc"]);
        assert!(matched(&matcher, "I like butcher shops").is_empty());
        assert!(matched(&matcher, "wbtc wrapped").is_empty());
        assert_eq!(matched(&matcher, "bitcoin, btc!"), vec!["bitcoin", "btc"]);
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let matcher = MentionMatcher::build(["usd+", "$eth"]).unwrap();
        assert_eq!(matched(&matcher, "bought usd+ today"), vec!["usd+"]);
        assert!(matched(&matcher, "usdd").is_empty());
        assert_eq!(matched(&matcher, "long $ETH."), vec!["$eth"]);
        assert!(matched(&matcher, "$ethan").is_empty());
    }

    #[test]
    fn test_punctuation_edges_need_a_separator() {
        let matcher = MentionMatcher::build(["usd+", "$btc", "chain)"]).unwrap();
        assert!(matched(&matcher, "usd+x rally").is_empty());
        assert!(matched(&matcher, "abc$btc").is_empty());
        assert!(matched(&matcher, "smart chain)x").is_empty());

        assert_eq!(matched(&matcher, "usd+"), vec!["usd+"]);
        assert_eq!(matched(&matcher, "$btc"), vec!["$btc"]);
        assert_eq!(matched(&matcher, "(usd+, $btc)"), vec!["$btc", "usd+"]);
        assert_eq!(matched(&matcher, "smart chain) rally"), vec!["chain)"]);
    }

    #[test]
    fn test_spaced_key_matches_between_words() {
        let matcher = MentionMatcher::build([" sol "]).unwrap();
        assert_eq!(matched(&matcher, "buy sol now"), vec![" sol "]);
        assert!(matched(&matcher, "sol").is_empty());
    }

    #[test]
    fn test_empty_matcher() {
        let matcher = MentionMatcher::build(Vec::<String>::new()).unwrap();
        assert!(matcher.is_empty());
        assert!(matched(&matcher, "anything").is_empty());
    }
}
