use std::num::NonZeroU32;
use std::time::Duration;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Placeholder replaced by the page number in [`CrawlerConfig::catalog_url`].
pub const PAGE_PLACEHOLDER: &str = "{}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlerConfig {
    /// Listing page URL, `{}` is replaced by the 1-based page number
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,

    /// Base that relative item links are resolved against
    #[serde(default = "default_catalogue_base")]
    pub catalogue_base: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Last listing page to visit, `None` walks until the catalog ends
    #[serde(default)]
    pub page_limit: Option<NonZeroU32>,

    /// Pause in seconds between two item fetches
    #[serde(default = "default_delay")]
    pub delay: f32,

    #[serde(default = "default_on_item_error")]
    pub on_item_error: OnError,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            catalog_url: default_catalog_url(),
            catalogue_base: default_catalogue_base(),
            user_agent: default_user_agent(),
            page_limit: None,
            delay: default_delay(),
            on_item_error: default_on_item_error(),
        }
    }
}

impl CrawlerConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.catalog_url.contains(PAGE_PLACEHOLDER) {
            anyhow::bail!(
                "Invalid catalogUrl {}, missing page placeholder {PAGE_PLACEHOLDER}",
                self.catalog_url
            );
        }
        if Duration::try_from_secs_f32(self.delay).is_err() {
            anyhow::bail!("Invalid delay {}, expected seconds >= 0", self.delay);
        }
        Ok(())
    }

    pub fn page_url(&self, page: u32) -> String {
        self.catalog_url.replacen(PAGE_PLACEHOLDER, &page.to_string(), 1)
    }

    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f32(self.delay).unwrap_or_default()
    }
}

fn default_catalog_url() -> String {
    String::from("http://books.toscrape.com/catalogue/page-{}.html")
}

fn default_catalogue_base() -> String {
    String::from("http://books.toscrape.com/catalogue/")
}

fn default_user_agent() -> String {
    String::from("SHELFbot")
}

fn default_delay() -> f32 {
    0.5
}

fn default_on_item_error() -> OnError {
    OnError::Record
}

/// What to do with a catalog item whose detail page couldn't be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OnError {
    /// Keep a placeholder record tagged with the failure
    Record,
    SkipAndLog,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerConfig {
    /// Local wall-clock time of the daily run
    #[serde(default = "default_at")]
    pub at: NaiveTime,

    /// Seconds between two checks for due jobs
    #[serde(default = "default_poll_secs")]
    pub poll_secs: u64,

    #[serde(default = "default_daily_crawl")]
    pub crawler: CrawlerConfig,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            at: default_at(),
            poll_secs: default_poll_secs(),
            crawler: default_daily_crawl(),
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.poll_secs == 0 {
            anyhow::bail!("Invalid pollSecs 0, expected at least 1 second");
        }
        self.crawler.validate()
    }

    pub fn poll(&self) -> Duration {
        Duration::from_secs(self.poll_secs)
    }
}

fn default_at() -> NaiveTime {
    NaiveTime::from_hms_opt(20, 5, 0).unwrap_or_default()
}

fn default_poll_secs() -> u64 {
    2
}

fn default_daily_crawl() -> CrawlerConfig {
    CrawlerConfig {
        page_limit: NonZeroU32::new(3),
        delay: 0.3,
        ..Default::default()
    }
}
