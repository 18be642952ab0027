use std::fmt;
use std::path::PathBuf;

use crate::fetch::FetchFailure;

/// Site specific scraping logic plugged into the catalog crawler.
pub trait Scrapable {
    type Record;

    /// Item links of a catalog listing page, as written in its markup.
    fn item_links(&self, listing: &str) -> Vec<String>;

    /// Extracts a record from an item detail page. Missing elements must degrade
    /// to placeholder values rather than fail the whole page.
    fn scrap(&self, page: &str, location: &PageLocation) -> Self::Record;

    /// Record kept for an item whose detail page couldn't be fetched.
    fn failed(&self, location: &PageLocation, failure: &FetchFailure) -> Self::Record;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageLocation {
    Url(String),
    Path(PathBuf),
}

impl fmt::Display for PageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}
