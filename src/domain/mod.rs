pub mod item;
pub mod matches;
pub mod state;

pub use item::{FeedItem, FeedItems};
pub use matches::{Match, MatchGroup, MatchSet};
pub use state::{CheckState, Phase};
