pub mod article_fetcher;
pub mod article_parser;
pub mod item_extractor;
pub mod login;
pub mod pacing;
pub mod page_loader;
pub mod record_writer;

pub use article_fetcher::{ArticleFetcher, ArticleOutcome};
pub use article_parser::{ArticleParser, HtmdConverter, MarkdownConverter};
pub use item_extractor::{Extraction, ExtractionStrategy, ItemExtractor};
pub use login::{LoginOutcome, LoginService};
pub use page_loader::{EmptyReason, PageLoad, PageLoader};
pub use record_writer::RecordWriter;
