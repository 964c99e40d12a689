pub mod item;
pub mod request;

pub use item::{Article, ExtractedItem, TitleLink};
pub use request::{CollectionRequest, ContentMode, PageRange, RangeBounds};
