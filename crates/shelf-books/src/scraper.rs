use select::document::Document;
use select::node::Node;
use select::predicate::{Attr, Class, Name, Predicate};
use shelf_crawler::{FetchFailure, PageLocation, Scrapable};

use crate::record::{Record, NOT_FOUND, RATINGS};

/// Scraper for the books.toscrape.com catalogue markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooksScraper;

impl Scrapable for BooksScraper {
    type Record = Record;

    fn item_links(&self, listing: &str) -> Vec<String> {
        Document::from(listing)
            .find(Name("h3").descendant(Name("a")))
            .filter_map(|a| a.attr("href"))
            .map(String::from)
            .collect()
    }

    fn scrap(&self, page: &str, location: &PageLocation) -> Record {
        let record = extract(page);
        log::debug!("Scrapped {location}: {}", record.title);
        record
    }

    fn failed(&self, location: &PageLocation, failure: &FetchFailure) -> Record {
        Record::failed(format!("{failure} for {location}"))
    }
}

/// Extracts a book record from a detail page.
///
/// Every field is looked up independently, an element missing from the page
/// only turns its own field into [`NOT_FOUND`].
pub fn extract(page: &str) -> Record {
    let document = Document::from(page);

    let title = document.find(Name("h1")).next();
    let price = document
        .find(Name("p").and(Class("price_color")))
        .next();
    let availability = document.find(Name("p").and(Class("instock"))).next();

    Record {
        title: trimmed_text(title),
        price: trimmed_text(price),
        rating: rating(&document).unwrap_or_else(|| NOT_FOUND.into()),
        availability: trimmed_text(availability),
        description: description(&document).unwrap_or_else(|| NOT_FOUND.into()),
        attributes: attributes(&document),
        error: None,
    }
}

fn trimmed_text(node: Option<Node>) -> String {
    node.map(|n| n.text().trim().to_string())
        .unwrap_or_else(|| NOT_FOUND.into())
}

// The rating is the second class of the marker, e.g. `star-rating Three`
fn rating(document: &Document) -> Option<String> {
    let marker = document
        .find(Name("p").and(Class("star-rating")))
        .next()?;
    let token = marker.attr("class")?.split_whitespace().nth(1)?;
    RATINGS
        .contains(&token)
        .then(|| token.to_string())
}

fn description(document: &Document) -> Option<String> {
    let anchor = document
        .find(Name("div").and(Attr("id", "product_description")))
        .next()?;

    let mut sibling = anchor.next();
    while let Some(node) = sibling {
        if node.name() == Some("p") {
            return Some(node.text().trim().to_string());
        }
        sibling = node.next();
    }
    None
}

fn attributes(document: &Document) -> indexmap::IndexMap<String, String> {
    let Some(table) = document
        .find(Name("table").and(Class("table-striped")))
        .next()
    else {
        return Default::default();
    };

    table
        .find(Name("tr"))
        .filter_map(|row| {
            let label = row.find(Name("th")).next()?;
            let value = row.find(Name("td")).next()?;
            Some((
                label.text().trim().to_string(),
                value.text().trim().to_string(),
            ))
        })
        .collect()
}
