pub mod item;
pub mod page;

pub use item::FeedItem;
pub use page::Page;
