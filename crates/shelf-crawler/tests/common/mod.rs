#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use shelf_crawler::{Fetch, FetchFailure, Fetched, PageLocation, Scrapable};

/// Serves canned pages, any other URL gets a 404.
#[derive(Debug, Default)]
pub struct MockFetcher {
    pages: HashMap<String, Result<Fetched, String>>,
    requested: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn page(mut self, url: &str, status: u16, body: &str) -> Self {
        self.pages.insert(url.into(), Ok(Fetched::new(status, body)));
        self
    }

    pub fn broken(mut self, url: &str, error: &str) -> Self {
        self.pages.insert(url.into(), Err(error.into()));
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl Fetch for MockFetcher {
    async fn fetch(&self, url: &str) -> anyhow::Result<Fetched> {
        self.requested.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(Ok(fetched)) => Ok(fetched.clone()),
            Some(Err(e)) => Err(anyhow::anyhow!("{e}")),
            None => Ok(Fetched::new(404, "Not Found")),
        }
    }
}

/// Listing pages hold one item link per line, item pages are kept verbatim.
pub struct LineScraper;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Page { url: String, body: String },
    Failed { url: String, failure: String },
}

impl Scrapable for LineScraper {
    type Record = Item;

    fn item_links(&self, listing: &str) -> Vec<String> {
        listing
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect()
    }

    fn scrap(&self, page: &str, location: &PageLocation) -> Item {
        Item::Page {
            url: location.to_string(),
            body: page.to_string(),
        }
    }

    fn failed(&self, location: &PageLocation, failure: &FetchFailure) -> Item {
        Item::Failed {
            url: location.to_string(),
            failure: failure.to_string(),
        }
    }
}

pub const PAGE_1: &str = "http://books.toscrape.com/catalogue/page-1.html";
pub const PAGE_2: &str = "http://books.toscrape.com/catalogue/page-2.html";
pub const PAGE_3: &str = "http://books.toscrape.com/catalogue/page-3.html";

pub const BOOK_ONE: &str = "http://books.toscrape.com/catalogue/book-one_001/index.html";
pub const BOOK_TWO: &str = "http://books.toscrape.com/catalogue/book-two_002/index.html";
pub const BOOK_THREE: &str = "http://books.toscrape.com/catalogue/book-three_003/index.html";
