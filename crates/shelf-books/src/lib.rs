mod record;
mod scraper;
pub mod writer;

pub use record::{Record, NOT_FOUND, RATINGS};
pub use scraper::{extract, BooksScraper};
pub use writer::{persist, render, OutputFormat, DEFAULT_OUTPUT_FILE};

pub use shelf_crawler;
