use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::{
    error::SourceError,
    http,
    sources::BookSource,
    types::{book_record::RawRecord, isbn::Isbn},
};

const NAME: &str = "scrape";

const CONTAINER: &str = "div.bookinfo";
const TITLE: &str = "h1";
const PARAGRAPH: &str = "p";
const COVER: &str = "div.image img";

fn selector(s: &str) -> Selector {
    Selector::parse(s).expect("valid selector")
}

/// Reads a book-listing page, e.g. `https://isbnsearch.org/isbn/{isbn}`.
pub struct ScrapeSource {
    client:       Client,
    url_template: String,
}

impl ScrapeSource {
    pub fn new(client: Client, url_template: String) -> Self {
        Self {
            client,
            url_template,
        }
    }

    pub fn url_for(&self, isbn: &Isbn) -> String {
        self.url_template.replace("{isbn}", isbn.as_str())
    }
}

#[async_trait]
impl BookSource for ScrapeSource {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn fetch(&self, isbn: &Isbn) -> Result<RawRecord, SourceError> {
        let url = self.url_for(isbn);
        let body = http::get_text(&self.client, NAME, &url, &[]).await?;
        let record = parse_page(&body);
        if !record.has_title() {
            debug!("{NAME}: no book information on {url}");
        }
        Ok(record)
    }
}

/// Extracts the labelled fields of the first book container. Anything missing stays empty.
pub fn parse_page(html: &str) -> RawRecord {
    let document = Html::parse_document(html);
    let Some(container) = document.select(&selector(CONTAINER)).next() else {
        return RawRecord::default();
    };
    let title = container
        .select(&selector(TITLE))
        .next()
        .map(|el| element_text(&el))
        .filter(|title| !title.is_empty());
    if title.is_none() {
        return RawRecord::default();
    }

    let mut record = RawRecord {
        title,
        ..RawRecord::default()
    };
    for paragraph in container.select(&selector(PARAGRAPH)) {
        let text = element_text(&paragraph);
        if let Some(value) = strip_label(&text, "ISBN-13:") {
            record.isbn13 = Some(value);
        } else if let Some(value) =
            strip_label(&text, "Authors:").or_else(|| strip_label(&text, "Author:"))
        {
            record.author = Some(value);
        } else if let Some(value) = strip_label(&text, "Edition:") {
            record.edition = Some(value);
        } else if let Some(value) = strip_label(&text, "Publisher:") {
            record.publisher = Some(value);
        } else if let Some(value) = strip_label(&text, "Published:") {
            record.year = Some(value);
        }
    }
    record.image_url = document
        .select(&selector(COVER))
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(ToOwned::to_owned);
    record
}

fn strip_label(text: &str, label: &str) -> Option<String> {
    text.strip_prefix(label).map(|value| value.trim().to_string())
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
