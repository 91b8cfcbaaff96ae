//! Static locality-substring → zone mapping.
//!
//! Lookup is first-match over the ordered list, so more specific substrings
//! must appear before broader ones. Constant for the process lifetime.

/// Ordered (substring, zone) pairs. Matched case-insensitively against the
/// locality name.
const ZONE_TABLE: &[(&str, &str)] = &[
    ("mira road", "Mira Road"),
    ("bhayandar", "Mira Bhayandar"),
    ("dahisar", "Mumbai North"),
    ("borivali", "Mumbai North"),
    ("kandivali", "Mumbai North"),
    ("malad", "Mumbai North"),
    ("goregaon", "Mumbai North"),
    ("andheri", "Mumbai West"),
    ("bandra", "Mumbai West"),
    ("vasai", "Vasai Virar"),
    ("virar", "Vasai Virar"),
    ("naigaon", "Vasai Virar"),
];

/// Zone label used when no substring matches.
pub const DEFAULT_ZONE: &str = "Mira Road & Beyond";

/// Resolve a locality name to its canonical zone label.
pub fn determine_zone(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    for (needle, zone) in ZONE_TABLE {
        if lower.contains(needle) {
            return zone;
        }
    }
    DEFAULT_ZONE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_match_wins() {
        // "Mira Road Bhayandar" contains both needles; the earlier entry wins.
        assert_eq!(determine_zone("Mira Road Bhayandar"), "Mira Road");
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(determine_zone("BHAYANDAR WEST"), "Mira Bhayandar");
        assert_eq!(determine_zone("borivali east"), "Mumbai North");
    }

    #[test]
    fn unknown_locality_falls_back_to_default() {
        assert_eq!(determine_zone("Shanti Park"), DEFAULT_ZONE);
        assert_eq!(determine_zone(""), DEFAULT_ZONE);
    }
}
