use futures::{pin_mut, StreamExt};
use tokio::time::sleep;

use crate::config::{CrawlerConfig, OnError};
use crate::fetch::{Fetch, FetchFailure};
use crate::scrapable::{PageLocation, Scrapable};
use crate::walker::{walk, CatalogPage};

/// Outcome of one complete catalog traversal.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlReport<R> {
    pub records: Vec<R>,
    pub pages_visited: u32,
    pub items_collected: usize,
}

/// Walks the catalog and scraps every item detail page, one request at a time.
///
/// Items are fetched in catalog order with `config.delay` between two item
/// fetches. A detail page that can't be fetched never aborts the crawl, it is
/// handled according to `config.on_item_error`.
pub async fn crawl_catalog<F, T>(
    fetcher: &F,
    scraper: &T,
    config: &CrawlerConfig,
) -> anyhow::Result<CrawlReport<T::Record>>
where
    F: Fetch,
    T: Scrapable,
{
    config.validate()?;

    let delay = config.delay();
    let mut records = vec![];
    let mut pages_visited = 0;
    let mut first_item = true;

    log::info!("Starting crawl of {}", config.catalog_url);

    let pages = walk(fetcher, scraper, config);
    pin_mut!(pages);

    while let Some(CatalogPage { number, items }) = pages.next().await {
        log::info!("Processing page {number}...");
        pages_visited += 1;

        let mut collected = 0;
        for url in items {
            if !first_item && !delay.is_zero() {
                sleep(delay).await;
            }
            first_item = false;

            if let Some(record) = scrap_item(fetcher, scraper, config, url).await {
                records.push(record);
                collected += 1;
            }
        }

        log::info!("Page {number}: collected {collected} items");
    }

    let items_collected = records.len();
    log::info!("Crawl done: {items_collected} items from {pages_visited} pages");

    Ok(CrawlReport {
        records,
        pages_visited,
        items_collected,
    })
}

async fn scrap_item<F, T>(
    fetcher: &F,
    scraper: &T,
    config: &CrawlerConfig,
    url: String,
) -> Option<T::Record>
where
    F: Fetch,
    T: Scrapable,
{
    log::debug!("Fetching item {url}");

    let fetched = fetcher.fetch(&url).await;
    let failure = match fetched {
        Ok(fetched) if fetched.is_success() => {
            let location = PageLocation::Url(url);
            return Some(scraper.scrap(&fetched.body, &location));
        }
        Ok(fetched) => FetchFailure::Status(fetched.status),
        Err(e) => FetchFailure::from(e),
    };

    let location = PageLocation::Url(url);
    match config.on_item_error {
        OnError::Record => {
            log::warn!("Keeping placeholder record for {location} got: {failure}");
            Some(scraper.failed(&location, &failure))
        }
        OnError::SkipAndLog => {
            log::warn!("Skipping item {location} got: {failure}");
            None
        }
    }
}
