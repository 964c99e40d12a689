pub mod chrome;
pub mod driver;
pub mod tab_scope;

pub use chrome::{ChromeItem, ChromeSession, ChromeTab};
pub use driver::{ItemHandle, Session, Tab};
pub use tab_scope::with_tab;
