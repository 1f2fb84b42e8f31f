use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use crate::{
    error::SourceError,
    http,
    sources::{join_names, BookSource},
    types::{book_record::RawRecord, isbn::Isbn},
};

pub mod schema;

const NAME: &str = "open_library";

/// The Open Library books API. Editions are not part of its `data` view.
pub struct OpenLibrarySource {
    client:   Client,
    base_url: String,
}

impl OpenLibrarySource {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl BookSource for OpenLibrarySource {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn fetch(&self, isbn: &Isbn) -> Result<RawRecord, SourceError> {
        let isbn_prefixed = format!("ISBN:{isbn}");
        let params = [
            ("bibkeys", isbn_prefixed.as_str()),
            ("jscmd", "data"),
            ("format", "json"),
        ];
        let mut books: HashMap<String, schema::Book> =
            http::get_json(&self.client, NAME, &self.base_url, &params).await?;
        match books.remove(&isbn_prefixed) {
            Some(book) => Ok(to_record(book)),
            None => {
                info!("Book not found in response, might not be in the OpenLibrary database");
                Ok(RawRecord::default())
            }
        }
    }
}

fn to_record(book: schema::Book) -> RawRecord {
    RawRecord {
        isbn13:    book
            .identifiers
            .and_then(|ids| ids.isbn_13.into_iter().next()),
        title:     book.title,
        author:    join_names(book.authors.iter().map(|a| a.name.as_str())),
        edition:   None,
        publisher: join_names(book.publishers.iter().map(|p| p.name.as_str())),
        year:      book.publish_date,
        image_url: book.cover.and_then(schema::Cover::best),
    }
}
