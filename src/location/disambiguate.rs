//! Match policy: turns raw search results into a verdict.
//!
//! A candidate counts only if its address country equals the requested
//! country (case-insensitive). Ambiguity is the number of distinct
//! provinces among those matches, not the number of hits.

use super::types::{Candidate, Verdict};
use std::collections::HashSet;

/// Decide whether `candidates` confirm a city inside `country`.
pub fn resolve(candidates: &[Candidate], country: &str) -> Verdict {
    if candidates.is_empty() {
        return Verdict::not_found();
    }

    let wanted = country.to_lowercase();
    let matches: Vec<&Candidate> = candidates
        .iter()
        .filter(|c| !c.address.country.is_empty() && c.address.country.to_lowercase() == wanted)
        .collect();

    if matches.is_empty() {
        // Results exist, but all of them lie outside the requested country.
        return Verdict::not_found();
    }

    // Matches without state or county share the single `None` bucket.
    let provinces: HashSet<Option<&str>> = matches.iter().map(|c| c.province()).collect();
    Verdict::found(provinces.len() > 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(country: &str, state: &str) -> Candidate {
        Candidate::new(country, state, "")
    }

    #[test]
    fn test_empty_candidates() {
        assert_eq!(resolve(&[], "Canada"), Verdict::not_found());
    }

    #[test]
    fn test_wrong_country() {
        assert_eq!(resolve(&[c("France", "")], "Canada"), Verdict::not_found());
    }

    #[test]
    fn test_same_province_not_ambiguous() {
        let rows = [c("Canada", "Ontario"), c("Canada", "Ontario")];
        assert_eq!(resolve(&rows, "Canada"), Verdict::found(false));
    }

    #[test]
    fn test_two_provinces_ambiguous() {
        let rows = [c("Canada", "Ontario"), c("Canada", "Quebec")];
        assert_eq!(resolve(&rows, "Canada"), Verdict::found(true));
    }

    #[test]
    fn test_single_match_without_province() {
        assert_eq!(resolve(&[c("Monaco", "")], "Monaco"), Verdict::found(false));
    }

    #[test]
    fn test_provinceless_matches_collapse() {
        let rows = [c("Singapore", ""), c("Singapore", ""), c("Malaysia", "Johor")];
        assert_eq!(resolve(&rows, "Singapore"), Verdict::found(false));
    }

    #[test]
    fn test_missing_province_counts_as_distinct_value() {
        let rows = [c("Canada", "Ontario"), c("Canada", "")];
        assert_eq!(resolve(&rows, "Canada"), Verdict::found(true));
    }

    #[test]
    fn test_county_fallback() {
        let rows = [
            Candidate::new("Norway", "", "Troms"),
            Candidate::new("Norway", "", "Troms"),
        ];
        assert_eq!(resolve(&rows, "Norway"), Verdict::found(false));

        let rows = [
            Candidate::new("Norway", "", "Troms"),
            Candidate::new("Norway", "", "Nordland"),
        ];
        assert_eq!(resolve(&rows, "Norway"), Verdict::found(true));
    }

    #[test]
    fn test_state_and_county_share_key_space() {
        // One row keyed by state, the other by county with the same text.
        let rows = [
            Candidate::new("Sweden", "Stockholm", "Other"),
            Candidate::new("Sweden", "", "Stockholm"),
        ];
        assert_eq!(resolve(&rows, "Sweden"), Verdict::found(false));
    }

    #[test]
    fn test_country_case_insensitive() {
        let rows = [c("France", "Île-de-France")];
        assert_eq!(resolve(&rows, "france"), resolve(&rows, "FRANCE"));
        assert_eq!(resolve(&rows, "fRaNcE"), Verdict::found(false));

        let rows = [c("FRANCE", "Île-de-France")];
        assert_eq!(resolve(&rows, "France"), Verdict::found(false));
    }

    #[test]
    fn test_empty_country_never_matches() {
        let rows = [c("", "Ontario")];
        assert_eq!(resolve(&rows, "Canada"), Verdict::not_found());
        assert_eq!(resolve(&rows, ""), Verdict::not_found());
    }

    #[test]
    fn test_only_matching_rows_count_toward_ambiguity() {
        let rows = [c("Canada", "Ontario"), c("United States", "Texas")];
        assert_eq!(resolve(&rows, "Canada"), Verdict::found(false));
    }

    #[test]
    fn test_ambiguous_implies_valid() {
        let pools: [&[Candidate]; 4] = [
            &[],
            &[c("France", "")],
            &[c("Canada", "Ontario"), c("Canada", "Quebec")],
            &[c("Canada", ""), c("Canada", "Yukon"), c("Peru", "Lima")],
        ];
        for rows in pools {
            for country in ["Canada", "France", "peru"] {
                let v = resolve(rows, country);
                assert!(!v.ambiguous || v.valid, "{:?} for {}", rows, country);
            }
        }
    }
}
