// Keyword occurrence index: which lines mention which target terms
use filing_types::{Keyword, KeywordCounts};
use std::collections::{BTreeMap, BTreeSet};

/// 1-based line numbers per keyword, built in one forward pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordIndex {
    lines: BTreeMap<Keyword, BTreeSet<usize>>,
}

impl KeywordIndex {
    /// Index every line of a document.
    ///
    /// Matching is a case-sensitive substring test and each keyword is
    /// tested independently, so one line may land in several sets.
    pub fn build<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::default();
        for (offset, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            for keyword in Keyword::ALL {
                if line.contains(keyword.as_str()) {
                    index.lines.entry(keyword).or_default().insert(offset + 1);
                }
            }
        }
        index
    }

    /// Lines containing `keyword`, `None` when it never occurs
    pub fn lines_for(&self, keyword: Keyword) -> Option<&BTreeSet<usize>> {
        self.lines.get(&keyword).filter(|set| !set.is_empty())
    }

    pub fn occurs(&self, keyword: Keyword) -> bool {
        self.lines_for(keyword).is_some()
    }

    /// Number of lines hit per keyword, zero-filled
    pub fn counts(&self) -> KeywordCounts {
        let mut counts = KeywordCounts::new();
        for (keyword, lines) in &self.lines {
            counts.set(*keyword, lines.len() as u64);
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_one_based_lines() {
        let index = KeywordIndex::build(["intro", "the covenant", "waived", "covenant again"]);
        let covenant: Vec<_> = index.lines_for(Keyword::Covenant).unwrap().iter().copied().collect();
        assert_eq!(covenant, vec![2, 4]);
        let waiv: Vec<_> = index.lines_for(Keyword::Waiv).unwrap().iter().copied().collect();
        assert_eq!(waiv, vec![3]);
    }

    #[test]
    fn test_line_can_hit_several_keywords() {
        let index = KeywordIndex::build(["covenant violation waiver was not in compliance"]);
        let counts = index.counts();
        assert_eq!(counts.get(Keyword::Covenant), 1);
        assert_eq!(counts.get(Keyword::Viol), 1);
        assert_eq!(counts.get(Keyword::Waiv), 1);
        assert_eq!(counts.get(Keyword::NotInCompliance), 1);
        assert_eq!(counts.get(Keyword::InDefault), 0);
    }

    #[test]
    fn test_repeats_on_one_line_count_once() {
        let index = KeywordIndex::build(["covenant covenant covenant"]);
        assert_eq!(index.counts().get(Keyword::Covenant), 1);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let index = KeywordIndex::build(["COVENANT", "Covenant", "Waiver"]);
        assert!(!index.occurs(Keyword::Covenant));
        assert!(!index.occurs(Keyword::Waiv));
        assert_eq!(index.counts().total(), 0);
    }

    #[test]
    fn test_in_default_needs_the_space() {
        let index = KeywordIndex::build(["indefault", "we are in default"]);
        let lines: Vec<_> = index.lines_for(Keyword::InDefault).unwrap().iter().copied().collect();
        assert_eq!(lines, vec![2]);
    }
}
