/// A matched item as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub title: String,
    /// Publish date exactly as it appeared in the feed.
    pub published: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchGroup {
    pub pattern: String,
    pub matches: Vec<Match>,
}

/// Matches of one cycle grouped by the pattern that selected them.
///
/// Groups appear in the order their first match was recorded; entries within
/// a group keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    groups: Vec<MatchGroup>,
}

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pattern: &str, entry: Match) {
        match self.groups.iter_mut().find(|g| g.pattern == pattern) {
            Some(group) => group.matches.push(entry),
            None => self.groups.push(MatchGroup {
                pattern: pattern.to_string(),
                matches: vec![entry],
            }),
        }
    }

    pub fn get(&self, pattern: &str) -> Option<&[Match]> {
        self.groups
            .iter()
            .find(|g| g.pattern == pattern)
            .map(|g| g.matches.as_slice())
    }

    pub fn groups(&self) -> &[MatchGroup] {
        &self.groups
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.pattern.as_str())
    }

    /// Total number of entries across all patterns.
    pub fn total(&self) -> usize {
        self.groups.iter().map(|g| g.matches.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str) -> Match {
        Match {
            title: title.into(),
            published: "2024-01-01".into(),
            link: format!("https://example.com/{}", title),
        }
    }

    #[test]
    fn test_groups_by_pattern_in_first_seen_order() {
        let mut set = MatchSet::new();
        set.push("b", entry("one"));
        set.push("a", entry("two"));
        set.push("b", entry("three"));

        assert_eq!(set.patterns().collect::<Vec<_>>(), ["b", "a"]);
        let b: Vec<_> = set.get("b").unwrap().iter().map(|m| m.title.as_str()).collect();
        assert_eq!(b, ["one", "three"]);
        assert_eq!(set.total(), 3);
    }

    #[test]
    fn test_empty() {
        let set = MatchSet::new();
        assert!(set.is_empty());
        assert_eq!(set.total(), 0);
        assert!(set.get("anything").is_none());
    }
}
