// Covenant proximity rule.
//
// A covenant line counts as a violation mention when any risk term
// ("waiv", "viol", "in default", "modif", "not in compliance") occurs within
// PROXIMITY_WINDOW lines of it. This stands in for "same paragraph" without
// parsing sentences; false positives and negatives are expected.
use crate::extractors::KeywordIndex;
use crate::patterns::PROXIMITY_WINDOW;
use filing_types::{Keyword, ViolationResult};
use std::collections::{BTreeMap, BTreeSet};

/// Lines within the proximity window of any of `lines`, clipped to line 1
pub fn eligible_neighborhood(lines: &BTreeSet<usize>) -> BTreeSet<usize> {
    lines
        .iter()
        .flat_map(|&line| {
            let start = line.saturating_sub(PROXIMITY_WINDOW).max(1);
            start..=line + PROXIMITY_WINDOW
        })
        .collect()
}

/// Counts covenant lines that have a risk term nearby
#[derive(Debug, Clone, Copy, Default)]
pub struct ViolationDetector;

impl ViolationDetector {
    pub fn new() -> Self {
        Self
    }

    /// Index `lines` and run the proximity rule
    pub fn detect<I, S>(&self, lines: I) -> ViolationResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.detect_indexed(&KeywordIndex::build(lines))
    }

    /// Run the proximity rule over an existing index
    pub fn detect_indexed(&self, index: &KeywordIndex) -> ViolationResult {
        let keyword_counts = index.counts();

        let Some(covenant_lines) = index.lines_for(Keyword::Covenant) else {
            return ViolationResult::none(keyword_counts);
        };

        let mut flagged_lines: BTreeMap<usize, BTreeSet<Keyword>> = BTreeMap::new();
        for keyword in Keyword::risk_terms() {
            let Some(keyword_lines) = index.lines_for(keyword) else {
                continue;
            };
            let neighborhood = eligible_neighborhood(keyword_lines);
            for &line in covenant_lines {
                if neighborhood.contains(&line) {
                    flagged_lines.entry(line).or_default().insert(keyword);
                }
            }
        }

        ViolationResult {
            violation_count: flagged_lines.len(),
            keyword_counts,
            flagged_lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filing_types::KeywordCounts;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    /// Build a document of `len` filler lines with text placed at 1-based lines
    fn document(len: usize, placed: &[(usize, &str)]) -> Vec<String> {
        let mut lines = vec!["filler text".to_string(); len];
        for &(line, text) in placed {
            lines[line - 1] = text.to_string();
        }
        lines
    }

    #[test]
    fn test_waiver_two_lines_below_covenant() {
        let doc = document(20, &[(10, "the covenant"), (12, "was waived")]);
        let result = ViolationDetector::new().detect(&doc);

        let mut expected = KeywordCounts::new();
        expected.set(Keyword::Covenant, 1);
        expected.set(Keyword::Waiv, 1);

        assert_eq!(result.violation_count, 1);
        assert_eq!(result.keyword_counts, expected);
        assert_eq!(
            result.flagged_lines.get(&10),
            Some(&BTreeSet::from([Keyword::Waiv]))
        );
    }

    #[test]
    fn test_violation_outside_window() {
        let doc = document(25, &[(10, "the covenant"), (20, "a violation")]);
        let result = ViolationDetector::new().detect(&doc);
        assert_eq!(result.violation_count, 0);
        assert_eq!(result.keyword_counts.get(Keyword::Viol), 1);
    }

    #[test]
    fn test_window_edges_are_inclusive() {
        let detector = ViolationDetector::new();
        let below = document(20, &[(10, "covenant"), (13, "modification")]);
        assert_eq!(detector.detect(&below).violation_count, 1);

        let above = document(20, &[(10, "covenant"), (7, "modification")]);
        assert_eq!(detector.detect(&above).violation_count, 1);

        let too_far_below = document(20, &[(10, "covenant"), (14, "modification")]);
        assert_eq!(detector.detect(&too_far_below).violation_count, 0);

        let too_far_above = document(20, &[(10, "covenant"), (6, "modification")]);
        assert_eq!(detector.detect(&too_far_above).violation_count, 0);
    }

    #[test]
    fn test_same_line_counts() {
        let doc = document(3, &[(2, "covenant violation")]);
        assert_eq!(ViolationDetector::new().detect(&doc).violation_count, 1);
    }

    #[test]
    fn test_several_keywords_near_one_covenant_count_once() {
        let doc = document(
            10,
            &[
                (5, "covenant"),
                (3, "waiver"),
                (6, "in default"),
                (7, "not in compliance"),
            ],
        );
        let result = ViolationDetector::new().detect(&doc);
        assert_eq!(result.violation_count, 1);
        assert_eq!(result.flagged_lines[&5].len(), 3);
    }

    #[test]
    fn test_no_covenant_means_no_violations() {
        let doc = document(5, &[(1, "waiver"), (2, "violation"), (3, "in default")]);
        let result = ViolationDetector::new().detect(&doc);
        assert_eq!(result.violation_count, 0);
        assert!(result.flagged_lines.is_empty());
        assert_eq!(result.keyword_counts.get(Keyword::Waiv), 1);
    }

    #[test]
    fn test_neighborhood_clips_at_first_line() {
        let neighborhood = eligible_neighborhood(&BTreeSet::from([2]));
        let lines: Vec<_> = neighborhood.into_iter().collect();
        assert_eq!(lines, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_neighborhood_unions_windows() {
        let neighborhood = eligible_neighborhood(&BTreeSet::from([10, 20]));
        assert_eq!(neighborhood.len(), 14);
        assert!(neighborhood.contains(&7));
        assert!(neighborhood.contains(&23));
        assert!(!neighborhood.contains(&15));
    }

    #[test]
    fn test_empty_document() {
        let result = ViolationDetector::new().detect(std::iter::empty::<&str>());
        assert_eq!(result, ViolationResult::none(KeywordCounts::new()));
    }

    fn arb_document() -> impl Strategy<Value = Vec<String>> {
        let line = prop_oneof![
            Just("plain text".to_string()),
            Just("the covenant".to_string()),
            Just("waiver".to_string()),
            Just("violation".to_string()),
            Just("in default".to_string()),
            Just("modified".to_string()),
            Just("not in compliance".to_string()),
            "[a-z ]{0,30}",
        ];
        prop::collection::vec(line, 0..80)
    }

    proptest! {
        /// Property: without a covenant line nothing is flagged
        #[test]
        fn no_covenant_no_violation(doc in arb_document()) {
            let doc: Vec<String> = doc.into_iter().filter(|l| !l.contains("covenant")).collect();
            let result = ViolationDetector::new().detect(&doc);
            prop_assert_eq!(result.violation_count, 0);
        }

        /// Property: violations never exceed covenant lines
        #[test]
        fn violations_bounded_by_covenant_lines(doc in arb_document()) {
            let covenant_lines = doc.iter().filter(|l| l.contains("covenant")).count();
            let result = ViolationDetector::new().detect(&doc);
            prop_assert!(result.violation_count <= covenant_lines);
            prop_assert_eq!(result.keyword_counts.get(Keyword::Covenant), covenant_lines as u64);
        }

        /// Property: every keyword is always reported
        #[test]
        fn counts_cover_all_keywords(doc in arb_document()) {
            let result = ViolationDetector::new().detect(&doc);
            prop_assert_eq!(result.keyword_counts.iter().count(), 6);
        }

        /// Property: detection is idempotent
        #[test]
        fn detection_is_idempotent(doc in arb_document()) {
            let detector = ViolationDetector::new();
            prop_assert_eq!(detector.detect(&doc), detector.detect(&doc));
        }

        /// Property: a risk term on line L reaches exactly [L-3, L+3]
        #[test]
        fn window_reaches_exactly_three_lines(term_line in 1usize..40, covenant_line in 1usize..40) {
            prop_assume!(term_line != covenant_line);
            let doc = document(40, &[(term_line, "waiver"), (covenant_line, "covenant")]);
            let result = ViolationDetector::new().detect(&doc);
            let expected = usize::from(term_line.abs_diff(covenant_line) <= PROXIMITY_WINDOW);
            prop_assert_eq!(result.violation_count, expected);
        }
    }
}
