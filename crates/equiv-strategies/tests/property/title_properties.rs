//! Property tests for title normalisation and the title scorer.

use proptest::prelude::*;

use equiv_core::Score;
use equiv_strategies::titles::{normalize, same_title, similarity};
use equiv_strategies::TitleMatchingScorer;

fn title_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 :&,.'-]{0,40}"
}

proptest! {
    #[test]
    fn normalised_titles_use_a_small_alphabet(title in title_strategy()) {
        let key = normalize(&title);
        prop_assert!(key.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        prop_assert!(!key.starts_with('-') && !key.ends_with('-'));
    }

    #[test]
    fn every_title_matches_itself(title in title_strategy()) {
        prop_assert!(same_title(&title, &title));
    }

    #[test]
    fn similarity_is_symmetric_and_bounded(a in title_strategy(), b in title_strategy()) {
        let ab = similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&ab));
        prop_assert!((ab - similarity(&b, &a)).abs() < 1e-9);
    }

    #[test]
    fn scorer_is_symmetric(a in title_strategy(), b in title_strategy()) {
        let scorer = TitleMatchingScorer::new(2.0).with_mismatch_score(Score::Real(-1.0));
        prop_assert_eq!(scorer.score_titles(&a, &b), scorer.score_titles(&b, &a));
    }
}
