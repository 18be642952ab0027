use futures::{stream, Stream};

use crate::config::CrawlerConfig;
use crate::fetch::Fetch;
use crate::scrapable::Scrapable;

/// One catalog listing page and the absolute URLs of its items, in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPage {
    pub number: u32,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkState {
    Fetching(u32),
    Done,
}

/// Lazily walks the catalog listing pages, starting at page 1.
///
/// The walk ends on the first page that can't be fetched or returns a
/// non-success status, on the first page without any item link, or once
/// `page_limit` pages were yielded. Pages that end the walk are never yielded.
/// An invalid `config` yields nothing.
pub fn walk<'a, F, T>(
    fetcher: &'a F,
    scraper: &'a T,
    config: &'a CrawlerConfig,
) -> impl Stream<Item = CatalogPage> + 'a
where
    F: Fetch,
    T: Scrapable,
{
    let start = match config.validate() {
        Ok(()) => WalkState::Fetching(1),
        Err(e) => {
            log::error!("Catalog walk not started: {e}");
            WalkState::Done
        }
    };

    stream::unfold(start, move |state| async move {
        let WalkState::Fetching(number) = state else {
            return None;
        };

        let url = config.page_url(number);
        let listing = match fetcher.fetch(&url).await {
            Ok(fetched) if fetched.is_success() => fetched.body,
            Ok(fetched) => {
                log::info!(
                    "Catalog ends at page {number}: {url} returned {}",
                    fetched.status
                );
                return None;
            }
            Err(e) => {
                log::warn!("Catalog ends at page {number}: couldn't fetch {url} got: {e}");
                return None;
            }
        };

        let items = scraper
            .item_links(&listing)
            .iter()
            .map(|link| absolutize(&config.catalogue_base, link))
            .collect::<Vec<_>>();
        if items.is_empty() {
            log::info!("Catalog ends at page {number}: no items found on {url}");
            return None;
        }

        let next = match config.page_limit {
            Some(limit) if number >= limit.get() => {
                log::info!("Reached the limit of {limit} pages");
                WalkState::Done
            }
            _ => WalkState::Fetching(number + 1),
        };

        Some((CatalogPage { number, items }, next))
    })
}

/// Resolves an item link found on a listing page against the catalogue base.
///
/// Leading `../` and `./` segments are dropped, absolute links are kept as-is.
pub fn absolutize(base: &str, link: &str) -> String {
    if link.starts_with("http://") || link.starts_with("https://") {
        return link.to_string();
    }

    let mut path = link;
    loop {
        if let Some(rest) = path.strip_prefix("../") {
            path = rest;
        } else if let Some(rest) = path.strip_prefix("./") {
            path = rest;
        } else {
            break;
        }
    }

    format!("{}/{}", base.trim_end_matches('/'), path)
}
