//! Stateless text-pattern extractors over raw page content.
//!
//! Each extractor is independent and returns an `Option` — absence of a
//! match is expected, not exceptional. A markup change to the source page
//! breaks at most one of these, not the whole pipeline.

use std::sync::LazyLock;

use regex::Regex;

use crate::trend::TrendPercentages;

static RATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)₹\s*([\d,]+)\s*(?:/|per)\s*sq\.?\s*ft").unwrap()
});

static APPR_5Y_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([+-]?\d+(?:\.\d+)?)\s*%\s*in\s*5\s*y(?:ears?)?").unwrap()
});

static YIELD_CTX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)rental\s*yield.*?(\d+(?:\.\d+)?)\s*%").unwrap()
});

static BARE_PCT_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(\d+(?:\.\d+)?)\s*%\s*$").unwrap()
});

static FAQ_RATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)average flat rates in .*? is ₹\s*([\d,]+)\s*per\s*sq\s*ft").unwrap()
});

static FAQ_YIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)average rental yield in .*? is\s*([\d.]+)\s*%").unwrap()
});

static TREND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)moved:\s*([+-]?[\d.]+)\s*%\s*since\s*1\s*year\s*([+-]?[\d.]+)\s*%\s*since\s*3\s*years?\s*([+-]?[\d.]+)\s*%\s*since\s*5\s*years?",
    )
    .unwrap()
});

/// Extract a currency-per-area rate, e.g. `₹ 8,500 per sq ft` or
/// `₹8,500/sq.ft`.
pub fn extract_rate(text: &str) -> Option<u32> {
    let caps = RATE_RE.captures(text)?;
    caps[1].replace(',', "").parse().ok()
}

/// Extract a 5-year appreciation percentage, e.g. `+25.1% in 5Y`.
pub fn extract_appreciation(text: &str) -> Option<f64> {
    let caps = APPR_5Y_RE.captures(text)?;
    caps[1].parse().ok()
}

/// Extract a rental-yield percentage: a percent near a `Rental Yield`
/// marker, or, as a weaker fallback, a bare percent alone on its own line.
pub fn extract_rental_yield(text: &str) -> Option<f64> {
    if let Some(caps) = YIELD_CTX_RE.captures(text) {
        return caps[1].parse().ok();
    }
    let caps = BARE_PCT_LINE_RE.captures(text)?;
    caps[1].parse().ok()
}

/// Extract the current rate from the FAQ phrasing
/// `average flat rates in … is ₹ N per sq ft`.
pub fn extract_faq_rate(text: &str) -> Option<u32> {
    let caps = FAQ_RATE_RE.captures(text)?;
    caps[1].replace(',', "").parse().ok()
}

/// Extract the rental yield from the FAQ phrasing
/// `average rental yield in … is N %`.
pub fn extract_faq_yield(text: &str) -> Option<f64> {
    let caps = FAQ_YIELD_RE.captures(text)?;
    caps[1].parse().ok()
}

/// Extract the 1/3/5-year appreciation triple from the FAQ phrasing
/// `prices … moved: a % since 1 year b % since 3 year c % since 5 year`.
pub fn extract_trend_percentages(text: &str) -> Option<TrendPercentages> {
    let caps = TREND_RE.captures(text)?;
    Some(TrendPercentages {
        p1: caps[1].parse().ok()?,
        p3: caps[2].parse().ok()?,
        p5: caps[3].parse().ok()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_with_commas_and_per_marker() {
        assert_eq!(extract_rate("Avg. ₹ 8,500 per sq ft in this area"), Some(8500));
        assert_eq!(extract_rate("₹12,300 / sq. ft"), Some(12300));
        assert_eq!(extract_rate("no currency here"), None);
    }

    #[test]
    fn appreciation_window_marker() {
        assert_eq!(extract_appreciation("25.1% in 5Y"), Some(25.1));
        assert_eq!(extract_appreciation("-8.4 % in 5 years"), Some(-8.4));
        assert_eq!(extract_appreciation("25.1% in 3Y"), None);
    }

    #[test]
    fn yield_near_context_marker() {
        assert_eq!(
            extract_rental_yield("Rental Yield for flats: 3.5 % annually"),
            Some(3.5)
        );
    }

    #[test]
    fn yield_bare_line_fallback() {
        assert_eq!(extract_rental_yield("Some rates\n 4.2 % \nmore text"), Some(4.2));
        assert_eq!(extract_rental_yield("inline 4.2 % is not a bare line"), None);
    }

    #[test]
    fn faq_rate_and_yield_phrasings() {
        let text = "The average flat rates in Mira Road is ₹ 11,150 per sq ft. \
                    The average rental yield in Mira Road is 3.2 %.";
        assert_eq!(extract_faq_rate(text), Some(11150));
        assert_eq!(extract_faq_yield(text), Some(3.2));
    }

    #[test]
    fn trend_triple_from_faq() {
        let text = "Property prices in Mira Road have moved: 5.3 % since 1 year \
                    15.2 % since 3 year 25.1 % since 5 year";
        let pcts = extract_trend_percentages(text).unwrap();
        assert_eq!(pcts.p1, 5.3);
        assert_eq!(pcts.p3, 15.2);
        assert_eq!(pcts.p5, 25.1);
        assert_eq!(extract_trend_percentages("prices went up"), None);
    }

    #[test]
    fn trend_triple_supports_negatives() {
        let text = "moved: -2.0 % since 1 year 4.5 % since 3 years 10.0 % since 5 years";
        let pcts = extract_trend_percentages(text).unwrap();
        assert_eq!(pcts.p1, -2.0);
    }
}
