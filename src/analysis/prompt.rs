/// Summary prompt for the AI summarizer
use crate::marketdata::MarketQuote;

/// Compact USD amount: `$1.23B`, `$4.56M`, `$7.89K` or `$0.12`
pub fn format_usd(value: Option<f64>) -> String {
    let Some(num) = value else {
        return "N/A".to_string();
    };

    if num >= 1e9 {
        format!("${:.2}B", num / 1e9)
    } else if num >= 1e6 {
        format!("${:.2}M", num / 1e6)
    } else if num >= 1e3 {
        format!("${:.2}K", num / 1e3)
    } else {
        format!("${:.2}", num)
    }
}

fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v),
        None => "N/A".to_string(),
    }
}

pub fn build_prompt(quote: &MarketQuote) -> String {
    let usd = quote.usd();
    let rank = quote
        .cmc_rank
        .map(|r| r.to_string())
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        "Analyze this cryptocurrency briefly:\n\n\
         Name: {} ({})\n\
         Current Price: {}\n\
         Market Cap Rank: #{}\n\
         24h Change: {}\n\
         7d Change: {}\n\
         Market Dominance: {}\n\n\
         Provide:\n\
         1. A 2-3 line market summary\n\
         2. A score out of 5 based on current market metrics (where 5 is very bullish)\n\n\
         Format response as:\n\
         Summary: [2-3 line summary]\n\
         Score: [X/5]",
        quote.name,
        quote.symbol.to_uppercase(),
        format_usd(usd.price),
        rank,
        format_percent(usd.percent_change_24h),
        format_percent(usd.percent_change_7d),
        format_percent(usd.market_cap_dominance),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marketdata::types::{QuoteCurrencies, UsdQuote};

    #[test]
    fn test_format_usd_suffixes() {
        assert_eq!(format_usd(Some(1_234_000_000_000.0)), "$1234.00B");
        assert_eq!(format_usd(Some(2_500_000_000.0)), "$2.50B");
        assert_eq!(format_usd(Some(4_560_000.0)), "$4.56M");
        assert_eq!(format_usd(Some(64_250.0)), "$64.25K");
        assert_eq!(format_usd(Some(0.123)), "$0.12");
        assert_eq!(format_usd(None), "N/A");
    }

    #[test]
    fn test_prompt_contents() {
        let quote = MarketQuote {
            id: 1,
            name: "Bitcoin".to_string(),
            symbol: "btc".to_string(),
            slug: "bitcoin".to_string(),
            cmc_rank: Some(1),
            num_market_pairs: None,
            circulating_supply: None,
            total_supply: None,
            max_supply: None,
            platform: None,
            quote: QuoteCurrencies {
                usd: UsdQuote {
                    price: Some(64_250.0),
                    percent_change_24h: Some(1.234),
                    percent_change_7d: Some(-3.0),
                    ..UsdQuote::default()
                },
            },
            last_updated: None,
        };

        let prompt = build_prompt(&quote);
        assert!(prompt.starts_with("Analyze this cryptocurrency briefly:\n\nName: Bitcoin (BTC)\n"));
        assert!(prompt.contains("Current Price: $64.25K\n"));
        assert!(prompt.contains("Market Cap Rank: #1\n"));
        assert!(prompt.contains("24h Change: 1.23%\n"));
        assert!(prompt.contains("7d Change: -3.00%\n"));
        assert!(prompt.contains("Market Dominance: N/A\n"));
        assert!(prompt.ends_with("Summary: [2-3 line summary]\nScore: [X/5]"));
    }
}
