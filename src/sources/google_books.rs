use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use crate::{
    error::SourceError,
    http,
    sources::{join_names, BookSource},
    types::{book_record::RawRecord, isbn::Isbn},
};

const NAME: &str = "google_books";

/// The Google Books volumes search. Google does not expose editions, so `edition` is
/// always left empty.
pub struct GoogleBooksSource {
    client:   Client,
    base_url: String,
    api_key:  Option<String>,
}

impl GoogleBooksSource {
    pub fn new(client: Client, base_url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl BookSource for GoogleBooksSource {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn fetch(&self, isbn: &Isbn) -> Result<RawRecord, SourceError> {
        info!("Searching for ISBN '{isbn}' using Google Books API");
        let q = format!("isbn:{isbn}");
        let mut query = vec![("q", q.as_str())];
        if let Some(key) = &self.api_key {
            query.push(("key", key.as_str()));
        }
        let model: GoogleModel = http::get_json(&self.client, NAME, &self.base_url, &query).await?;
        Ok(model.into_record())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleModel {
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Item {
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct VolumeInfo {
    title:                Option<String>,
    authors:              Vec<String>,
    publisher:            Option<String>,
    published_date:       Option<String>,
    industry_identifiers: Vec<IndustryIdentifier>,
    image_links:          Option<ImageLinks>,
}

#[derive(Debug, Deserialize)]
struct IndustryIdentifier {
    #[serde(rename = "type")]
    kind:       String,
    identifier: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ImageLinks {
    thumbnail:       Option<String>,
    small_thumbnail: Option<String>,
}

impl GoogleModel {
    fn into_record(self) -> RawRecord {
        let Some(item) = self.items.into_iter().next() else {
            return RawRecord::default();
        };
        let VolumeInfo {
            title,
            authors,
            publisher,
            published_date,
            industry_identifiers,
            image_links,
        } = item.volume_info;

        RawRecord {
            isbn13: industry_identifiers
                .into_iter()
                .find(|id| id.kind == "ISBN_13")
                .map(|id| id.identifier),
            title,
            author: join_names(authors.iter().map(String::as_str)),
            edition: None,
            publisher,
            // date_parts = Year-Month-Day, where Month and Day are optional
            year: published_date.and_then(|date| date.split('-').next().map(ToOwned::to_owned)),
            image_url: image_links.and_then(|links| links.thumbnail.or(links.small_thumbnail)),
        }
    }
}
