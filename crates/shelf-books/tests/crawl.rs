use std::collections::HashMap;

use shelf_books::{persist, BooksScraper, OutputFormat, NOT_FOUND};
use shelf_crawler::{crawl_catalog, CrawlerConfig, Fetch, Fetched};

struct MockCatalog(HashMap<&'static str, &'static str>);

impl Fetch for MockCatalog {
    async fn fetch(&self, url: &str) -> anyhow::Result<Fetched> {
        Ok(match self.0.get(url) {
            Some(body) => Fetched::new(200, *body),
            None => Fetched::new(404, ""),
        })
    }
}

const LISTING: &str = r#"
<ol>
    <li><h3><a href="../../book-one_001/index.html">Book One</a></h3></li>
    <li><h3><a href="../../book-two_002/index.html">Book Two</a></h3></li>
</ol>
"#;

const BOOK: &str = r#"
<html>
    <h1>Test Book</h1>
    <p class="price_color">£15.00</p>
    <p class="star-rating Four"></p>
    <p class="instock">In stock</p>
</html>
"#;

fn catalog() -> MockCatalog {
    MockCatalog(HashMap::from([
        ("http://books.toscrape.com/catalogue/page-1.html", LISTING),
        (
            "http://books.toscrape.com/catalogue/book-one_001/index.html",
            BOOK,
        ),
        (
            "http://books.toscrape.com/catalogue/book-two_002/index.html",
            BOOK,
        ),
    ]))
}

#[tokio::test]
async fn crawl_two_page_catalog_and_persist() {
    let config = CrawlerConfig {
        delay: 0.0,
        ..Default::default()
    };

    let report = crawl_catalog(&catalog(), &BooksScraper, &config)
        .await
        .unwrap();

    assert_eq!(1, report.pages_visited);
    assert_eq!(2, report.items_collected);
    for record in &report.records {
        assert_eq!("Test Book", record.title);
        assert_eq!("£15.00", record.price);
        assert_eq!("Four", record.rating);
        assert_eq!("In stock", record.availability);
        assert_eq!(NOT_FOUND, record.description);
        assert!(record.attributes.is_empty());
        assert!(!record.is_failed());
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("artifacts/books_data.txt");
    persist(&report.records, &path, OutputFormat::Text).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(2, content.trim_end().split("\n\n").count());
}
