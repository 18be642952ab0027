mod config;
mod crawler;
mod fetch;
mod scheduler;
mod scrapable;
mod walker;

pub use config::{CrawlerConfig, OnError, SchedulerConfig, PAGE_PLACEHOLDER};
pub use crawler::{crawl_catalog, CrawlReport};
pub use fetch::{Fetch, FetchFailure, Fetched, HttpFetcher};
pub use scheduler::{Clock, JobFuture, Scheduler, SystemClock};
pub use scrapable::{PageLocation, Scrapable};
pub use walker::{absolutize, walk, CatalogPage};

pub use anyhow;
