use proptest::prelude::*;
use roster_match::{MatchThresholds, NameMatcher};
use roster_model::Confidence;

#[test]
fn concatenated_request_is_stable() {
    let matcher = NameMatcher::default();
    let candidates = ["Chris Smith", "Chris Jones"];
    let first = matcher.match_name("chrissmith", &candidates);
    for _ in 0..20 {
        assert_eq!(matcher.match_name("chrissmith", &candidates), first);
    }
    assert_eq!(first.matched.as_deref(), Some("Chris Smith"));
    assert!(first.confidence >= Confidence::High);
}

#[test]
fn candidate_order_does_not_change_tie_winner() {
    let matcher = NameMatcher::default();
    let forward = matcher.match_name("Bob", &["Robert Marsh", "Robert Jones"]);
    let reverse = matcher.match_name("Bob", &["Robert Jones", "Robert Marsh"]);
    assert_eq!(forward.matched, reverse.matched);
    assert_eq!(forward.confidence, reverse.confidence);
}

#[test]
fn strict_thresholds_demote_borderline_typos() {
    let candidates = ["Katarina Ostrowski"];
    let default = NameMatcher::default().match_name("Katrina Ostrowsky", &candidates);
    let strict =
        NameMatcher::new(MatchThresholds::strict()).match_name("Katrina Ostrowsky", &candidates);
    assert!(default.is_match());
    assert!(strict.confidence <= default.confidence);
}

fn name() -> impl Strategy<Value = String> {
    "[A-Za-z]{1,8}( [A-Za-z]{1,10})?"
}

proptest! {
    #[test]
    fn matching_is_deterministic(
        requested in "[A-Za-z ,.-]{0,20}",
        candidates in prop::collection::vec(name(), 0..8),
    ) {
        let matcher = NameMatcher::default();
        let first = matcher.match_name(&requested, &candidates);
        let second = matcher.match_name(&requested, &candidates);
        prop_assert_eq!(&first, &second);
    }

    #[test]
    fn proposals_come_from_the_candidates(
        requested in name(),
        candidates in prop::collection::vec(name(), 0..8),
    ) {
        let outcome = NameMatcher::default().match_name(&requested, &candidates);
        if let Some(matched) = &outcome.matched {
            prop_assert!(candidates.contains(matched));
            prop_assert!(outcome.confidence > Confidence::None);
        } else {
            prop_assert_eq!(outcome.confidence, Confidence::None);
        }
    }
}
