//! Streaming-provider keyword matching.
//!
//! Subscribed services are configured as short codes; each code maps to
//! lower-cased substrings matched against the display names the catalog
//! reports. Substring matching deliberately tolerates provider rebrands
//! ("HBO Max" vs "Max").

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

/// Short code -> lower-cased name substrings.
static KEYWORD_MAP: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    let mut map: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
    map.insert("nfx", &["netflix"]);
    map.insert("amp", &["amazon prime video", "prime video"]);
    map.insert("max", &["max", "hbo max"]);
    map.insert("dnp", &["disney plus", "disney+"]);
    map.insert("hlu", &["hulu"]);
    map.insert("apt", &["apple tv plus", "apple tv+", "appletv", "apple itunes"]);
    map.insert("pmp", &["paramount plus", "paramount+"]);
    map.insert("pck", &["peacock", "peacock premium"]);
    map.insert("cru", &["crunchyroll"]);
    map.insert("sho", &["showtime"]);
    map.insert("glb", &["globoplay"]);
    map.insert("sp", &["star+"]);
    map
});

/// Substrings for a subscribed short code; unknown codes match nothing.
fn keywords_for(code: &str) -> &'static [&'static str] {
    KEYWORD_MAP
        .get(code.to_lowercase().as_str())
        .copied()
        .unwrap_or(&[])
}

/// Filter provider display names down to the ones covered by the caller's
/// subscriptions.
///
/// A name matches when any substring of any subscribed code occurs in it,
/// case-insensitively. Results are deduplicated by display name (original
/// casing kept) and sorted for stable rendering.
pub fn matching_providers(provider_names: &[String], subscribed: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut matched = Vec::new();

    for name in provider_names {
        let lowered = name.to_lowercase();
        if seen.contains(&lowered) {
            continue;
        }
        let covered = subscribed
            .iter()
            .any(|code| keywords_for(code).iter().any(|kw| lowered.contains(kw)));
        if covered {
            seen.insert(lowered);
            matched.push(name.clone());
        }
    }

    matched.sort_by_key(|name| name.to_lowercase());
    matched
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subs(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_substring_match_is_case_insensitive() {
        let matched = matching_providers(&names(&["HBO Max"]), &subs(&["max"]));
        assert_eq!(matched, vec!["HBO Max"]);
    }

    #[test]
    fn test_rebranded_provider_still_matches() {
        let matched = matching_providers(&names(&["Netflix Standard with Ads"]), &subs(&["nfx"]));
        assert_eq!(matched, vec!["Netflix Standard with Ads"]);
    }

    #[test]
    fn test_one_name_satisfying_two_codes_appears_once() {
        // "HBO Max" contains both "max" and "hbo max".
        let matched = matching_providers(&names(&["HBO Max"]), &subs(&["max", "max"]));
        assert_eq!(matched, vec!["HBO Max"]);
    }

    #[test]
    fn test_dedup_by_display_name_keeps_original_casing() {
        let matched = matching_providers(
            &names(&["Netflix", "NETFLIX", "netflix"]),
            &subs(&["nfx"]),
        );
        assert_eq!(matched, vec!["Netflix"]);
    }

    #[test]
    fn test_unsubscribed_providers_filtered_out() {
        let matched = matching_providers(
            &names(&["Netflix", "Hulu", "Disney Plus"]),
            &subs(&["dnp"]),
        );
        assert_eq!(matched, vec!["Disney Plus"]);
    }

    #[test]
    fn test_unknown_code_matches_nothing() {
        let matched = matching_providers(&names(&["Netflix"]), &subs(&["zzz"]));
        assert!(matched.is_empty());
    }

    #[test]
    fn test_results_sorted_for_stable_rendering() {
        let matched = matching_providers(
            &names(&["Peacock", "Crunchyroll", "Apple TV+"]),
            &subs(&["pck", "cru", "apt"]),
        );
        assert_eq!(matched, vec!["Apple TV+", "Crunchyroll", "Peacock"]);
    }
}
