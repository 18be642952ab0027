use shelf_books::{extract, BooksScraper, Record, NOT_FOUND};
use shelf_crawler::{FetchFailure, PageLocation, Scrapable};

const BOOK_PAGE: &str = r#"
<html>
    <h1>A Light in the Attic</h1>
    <p class="price_color">£51.77</p>
    <p class="star-rating Three"></p>
    <p class="instock availability">
        <i class="icon-ok"></i>
        In stock (22 available)
    </p>
    <div id="product_description"><h2>Product Description</h2></div>
    <p>It's hard to imagine a world without A Light in the Attic...</p>
    <table class="table table-striped">
        <tr><th>UPC</th><td>a897fe39b1053632</td></tr>
        <tr><th>Product Type</th><td>Books</td></tr>
        <tr><th>Price (excl. tax)</th><td>£51.77</td></tr>
        <tr><th>Tax</th><td>£0.00</td></tr>
        <tr><th>Number of reviews</th><td>0</td></tr>
    </table>
</html>
"#;

#[test]
fn extract_full_page() {
    let record = extract(BOOK_PAGE);

    assert_eq!("A Light in the Attic", record.title);
    assert_eq!("£51.77", record.price);
    assert_eq!("Three", record.rating);
    assert_eq!("In stock (22 available)", record.availability);
    assert_eq!(
        "It's hard to imagine a world without A Light in the Attic...",
        record.description
    );
    assert_eq!(None, record.error);
    assert_eq!(
        vec![
            ("UPC", "a897fe39b1053632"),
            ("Product Type", "Books"),
            ("Price (excl. tax)", "£51.77"),
            ("Tax", "£0.00"),
            ("Number of reviews", "0"),
        ],
        record
            .attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect::<Vec<_>>()
    );
}

#[test]
fn extract_empty_page() {
    assert_eq!(Record::not_found(), extract("<html><body></body></html>"));
    assert_eq!(Record::not_found(), extract(""));
}

#[test]
fn missing_rating_marker() {
    let record = extract(r#"<h1>Title</h1><p class="price_color">£1.00</p>"#);

    assert_eq!(NOT_FOUND, record.rating);
    assert_eq!("Title", record.title);
    assert_eq!("£1.00", record.price);
}

#[test]
fn rating_without_second_class() {
    let record = extract(r#"<p class="star-rating"></p>"#);

    assert_eq!(NOT_FOUND, record.rating);
}

#[test]
fn rating_outside_vocabulary() {
    let record = extract(r#"<p class="star-rating Six"></p>"#);

    assert_eq!(NOT_FOUND, record.rating);
}

#[test]
fn rating_is_read_from_class_not_text() {
    let record = extract(r#"<p class="star-rating Five">One</p>"#);

    assert_eq!("Five", record.rating);
}

#[test]
fn description_is_sibling_not_child() {
    let child_only = r#"<div id="product_description"><p>inside</p></div>"#;
    assert_eq!(NOT_FOUND, extract(child_only).description);

    let sibling = r#"
        <div id="product_description"><p>inside</p></div>
        <span>skipped</span>
        <p>outside</p>
    "#;
    assert_eq!("outside", extract(sibling).description);
}

#[test]
fn description_without_anchor() {
    let record = extract("<h1>Title</h1><p>Lonely paragraph</p>");

    assert_eq!(NOT_FOUND, record.description);
}

#[test]
fn empty_description_is_kept() {
    let record = extract(r#"<div id="product_description"></div><p>   </p>"#);

    assert_eq!("", record.description);
}

#[test]
fn incomplete_table_rows_are_skipped() {
    let record = extract(
        r#"<table class="table-striped">
            <tr><th>UPC</th><td>123</td></tr>
            <tr><th>Lonely header</th></tr>
            <tr><td>Lonely value</td></tr>
            <tr><th> Tax </th><td> £0.00 </td></tr>
        </table>"#,
    );

    assert_eq!(2, record.attributes.len());
    assert_eq!(Some("123"), record.attributes.get("UPC").map(String::as_str));
    assert_eq!(Some("£0.00"), record.attributes.get("Tax").map(String::as_str));
}

#[test]
fn other_tables_are_ignored() {
    let record = extract(r#"<table><tr><th>UPC</th><td>123</td></tr></table>"#);

    assert!(record.attributes.is_empty());
}

#[test]
fn item_links_from_listing() {
    let listing = r#"
        <ol class="row">
            <li><h3><a href="../../book-one_001/index.html" title="Book One">Book One</a></h3></li>
            <li><h3><a>No link</a></h3></li>
            <li><h3><a href="book-two_002/index.html">Book Two</a></h3></li>
        </ol>
        <a href="../category/books_1/index.html">Books</a>
    "#;

    assert_eq!(
        vec!["../../book-one_001/index.html", "book-two_002/index.html"],
        BooksScraper.item_links(listing)
    );
}

#[test]
fn failed_item_is_tagged() {
    let location = PageLocation::Url("http://books.toscrape.com/catalogue/x_1/index.html".into());

    let record = BooksScraper.failed(&location, &FetchFailure::Status(404));

    assert!(record.is_failed());
    assert_eq!(
        Some("HTTP 404 for http://books.toscrape.com/catalogue/x_1/index.html"),
        record.error.as_deref()
    );
    assert_eq!(NOT_FOUND, record.title);
    assert!(record.attributes.is_empty());

    // an empty page is not a failed fetch
    assert!(!BooksScraper.scrap("", &location).is_failed());
}
