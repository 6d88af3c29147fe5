use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::app::Result;
use crate::dates;

/// One `<item>` of a feed. The link is the item's identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub link: String,
    pub title: String,
    /// Raw `pubDate` text, converted on demand by [`FeedItem::published_at`].
    pub published: String,
    pub categories: Vec<String>,
}

impl FeedItem {
    pub fn new(
        link: impl Into<String>,
        title: impl Into<String>,
        published: impl Into<String>,
    ) -> Self {
        Self {
            link: link.into(),
            title: title.into(),
            published: published.into(),
            categories: Vec::new(),
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn published_at(&self) -> Result<DateTime<Utc>> {
        dates::parse_published(&self.published)
    }

    /// Texts a pattern is searched in: every category, then the title.
    pub fn searchable_texts(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.title.as_str()))
    }
}

/// Items of one fetched document, keyed by link, in document order.
///
/// Inserting an item whose link is already present replaces the stored data
/// but keeps the position of the first occurrence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedItems {
    items: Vec<FeedItem>,
    index: HashMap<String, usize>,
}

impl FeedItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item, returning the one it replaced if the link was known.
    pub fn insert(&mut self, item: FeedItem) -> Option<FeedItem> {
        match self.index.get(&item.link) {
            Some(&pos) => Some(std::mem::replace(&mut self.items[pos], item)),
            None => {
                self.index.insert(item.link.clone(), self.items.len());
                self.items.push(item);
                None
            }
        }
    }

    pub fn get(&self, link: &str) -> Option<&FeedItem> {
        self.index.get(link).map(|&pos| &self.items[pos])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FeedItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<FeedItem> for FeedItems {
    fn from_iter<T: IntoIterator<Item = FeedItem>>(iter: T) -> Self {
        let mut items = FeedItems::new();
        for item in iter {
            items.insert(item);
        }
        items
    }
}

impl<'a> IntoIterator for &'a FeedItems {
    type Item = &'a FeedItem;
    type IntoIter = std::slice::Iter<'a, FeedItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_insert_keeps_document_order() {
        let items: FeedItems = vec![
            FeedItem::new("L1", "First", "2024-01-01"),
            FeedItem::new("L2", "Second", "2024-01-02"),
            FeedItem::new("L3", "Third", "2024-01-03"),
        ]
        .into_iter()
        .collect();

        let links: Vec<_> = items.iter().map(|i| i.link.as_str()).collect();
        assert_eq!(links, ["L1", "L2", "L3"]);
    }

    #[test]
    fn test_duplicate_link_last_wins() {
        let mut items = FeedItems::new();
        assert!(items.insert(FeedItem::new("L1", "Old", "2024-01-01")).is_none());
        items.insert(FeedItem::new("L2", "Other", "2024-01-01"));
        let replaced = items.insert(FeedItem::new("L1", "New", "2024-01-05"));

        assert_eq!(replaced.map(|i| i.title), Some("Old".to_string()));
        assert_eq!(items.len(), 2);
        assert_eq!(items.get("L1").unwrap().title, "New");
        assert_eq!(items.get("L1").unwrap().published, "2024-01-05");
        // Position of the first occurrence is kept
        assert_eq!(items.iter().next().unwrap().link, "L1");
    }

    #[test]
    fn test_searchable_texts_include_title_last() {
        let item = FeedItem::new("L1", "Flights to Wroclaw", "2024-01-02")
            .with_categories(["Poland", "Deals"]);
        let texts: Vec<_> = item.searchable_texts().collect();
        assert_eq!(texts, ["Poland", "Deals", "Flights to Wroclaw"]);
    }

    #[test]
    fn test_published_at() {
        let item = FeedItem::new("L1", "T", "Tue, 02 Jan 2024 12:00:00 +0000");
        assert_eq!(
            item.published_at().unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap()
        );
        assert!(FeedItem::new("L2", "T", "garbage").published_at().is_err());
    }
}
