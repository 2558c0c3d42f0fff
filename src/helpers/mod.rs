//! Helper functions shared by the loader, the feed and the commands

mod date;
mod url;

pub use date::*;
pub use url::*;
