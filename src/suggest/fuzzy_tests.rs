use super::*;

// ── levenshtein ───────────────────────────────────────────────

#[test]
fn test_levenshtein_identical() {
    assert_eq!(levenshtein("starbucks", "starbucks"), 0);
}

#[test]
fn test_levenshtein_empty() {
    assert_eq!(levenshtein("", ""), 0);
    assert_eq!(levenshtein("", "abc"), 3);
    assert_eq!(levenshtein("abcd", ""), 4);
}

#[test]
fn test_levenshtein_single_edits() {
    assert_eq!(levenshtein("netflx", "netflix"), 1); // insertion
    assert_eq!(levenshtein("netflix", "netflx"), 1); // deletion
    assert_eq!(levenshtein("hulu", "halu"), 1); // substitution
}

#[test]
fn test_levenshtein_classic() {
    assert_eq!(levenshtein("kitten", "sitting"), 3);
    assert_eq!(levenshtein("flaw", "lawn"), 2);
}

#[test]
fn test_levenshtein_symmetric() {
    for (a, b) in [("starbks", "starbucks"), ("gas", "game"), ("uber", "burger")] {
        assert_eq!(levenshtein(a, b), levenshtein(b, a), "{a} / {b}");
    }
}

#[test]
fn test_levenshtein_counts_chars_not_bytes() {
    assert_eq!(levenshtein("café", "cafe"), 1);
    assert_eq!(levenshtein("crème", "creme"), 1);
}

// ── matches_keyword ───────────────────────────────────────────

#[test]
fn test_matches_keyword_substring() {
    assert!(matches_keyword("starbucks coffee #123", "coffee", 2));
    assert!(matches_keyword("weekly groceries run", "grocer", 0));
}

#[test]
fn test_matches_keyword_multi_word_keyword() {
    assert!(matches_keyword("whole foods market", "whole foods", 0));
}

#[test]
fn test_matches_keyword_typo_within_threshold() {
    assert!(matches_keyword("starbks", "starbucks", 2));
    assert!(matches_keyword("monthly netflx", "netflix", 2));
}

#[test]
fn test_matches_keyword_typo_beyond_threshold() {
    assert!(!matches_keyword("strbks", "starbucks", 2));
    assert!(matches_keyword("strbks", "starbucks", 3));
}

#[test]
fn test_matches_keyword_zero_threshold_is_exact_only() {
    assert!(!matches_keyword("netflx", "netflix", 0));
}

#[test]
fn test_matches_keyword_nonsense() {
    assert!(!matches_keyword("xyzabc123", "starbucks", 2));
    assert!(!matches_keyword("xyzabc123", "bp", 2));
}
