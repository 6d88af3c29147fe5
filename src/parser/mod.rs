use crate::app::{CheckerError, Result};
use crate::domain::{FeedItem, FeedItems};

/// Parse an RSS document into its items.
///
/// Every `<item>` must carry `<title>`, `<link>` and `<pubDate>`; a document
/// with an item missing one of them is rejected as a whole. Text is stored as
/// the XML reader decoded it; an escaped entity stays literal.
pub fn parse(body: &[u8]) -> Result<FeedItems> {
    let channel =
        rss::Channel::read_from(body).map_err(|e| CheckerError::Parse(e.to_string()))?;

    let mut items = FeedItems::new();

    for (pos, item) in channel.items().iter().enumerate() {
        let link = required(item.link(), "link", pos)?;
        let title = required(item.title(), "title", pos)?;
        let published = required(item.pub_date(), "pubDate", pos)?;

        let categories = item
            .categories()
            .iter()
            .map(|c| c.name().trim());

        items.insert(
            FeedItem::new(link.trim(), title.trim(), published.trim()).with_categories(categories),
        );
    }

    Ok(items)
}

fn required<'a>(value: Option<&'a str>, field: &str, pos: usize) -> Result<&'a str> {
    value.ok_or_else(|| CheckerError::Parse(format!("item {} has no <{}>", pos + 1, field)))
}
