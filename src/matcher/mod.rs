use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};

use crate::app::Result;
use crate::domain::{FeedItems, Match, MatchSet};

/// Case-insensitive patterns, compiled once and kept with their source text.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<(String, Regex)>,
}

impl PatternSet {
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| -> Result<(String, Regex)> {
                let source = p.as_ref();
                let regex = RegexBuilder::new(source).case_insensitive(true).build()?;
                Ok((source.to_string(), regex))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Collect the items published at or after `cutoff` whose title or any
    /// category contains a pattern.
    pub fn find(&self, items: &FeedItems, cutoff: DateTime<Utc>) -> MatchSet {
        let mut matches = MatchSet::new();

        for item in items {
            match item.published_at() {
                Ok(published) if published >= cutoff => {}
                Ok(_) => continue,
                Err(e) => {
                    tracing::debug!(link = %item.link, error = %e, "Skipping item");
                    continue;
                }
            }

            for (source, regex) in &self.patterns {
                if item.searchable_texts().any(|text| regex.is_match(text)) {
                    matches.push(
                        source,
                        Match {
                            title: item.title.clone(),
                            published: item.published.clone(),
                            link: item.link.clone(),
                        },
                    );
                }
            }
        }

        matches
    }
}

/// Compile `patterns` and match them against `items` in one go.
pub fn find_matches<S: AsRef<str>>(
    items: &FeedItems,
    patterns: &[S],
    cutoff: DateTime<Utc>,
) -> Result<MatchSet> {
    Ok(PatternSet::compile(patterns)?.find(items, cutoff))
}
