//! Interchangeable places to look a book up.
//!
//! Every source answers the same question: given an ISBN, what does it know? A source
//! that knows nothing returns a [`RawRecord`] without a title. Errors are reserved for
//! transport and decoding failures.

use std::{fmt::Display, str::FromStr};

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    error::SourceError,
    types::{isbn::Isbn, book_record::RawRecord},
};

pub mod chain;
pub mod generative;
pub mod google_books;
pub mod open_library;
pub mod scrape;

pub use chain::SourceChain;
pub use generative::GenerativeSource;
pub use google_books::GoogleBooksSource;
pub use open_library::OpenLibrarySource;
pub use scrape::ScrapeSource;

#[async_trait]
pub trait BookSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, isbn: &Isbn) -> Result<RawRecord, SourceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Scrape,
    GoogleBooks,
    OpenLibrary,
    Generative,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Scrape,
        SourceKind::GoogleBooks,
        SourceKind::OpenLibrary,
        SourceKind::Generative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Scrape => "scrape",
            SourceKind::GoogleBooks => "google_books",
            SourceKind::OpenLibrary => "open_library",
            SourceKind::Generative => "generative",
        }
    }

    pub fn build(&self, config: &Config, client: &Client) -> Result<Box<dyn BookSource>> {
        Ok(match self {
            SourceKind::Scrape => Box::new(ScrapeSource::new(
                client.clone(),
                config.scrape.url_template.clone(),
            )),
            SourceKind::GoogleBooks => Box::new(GoogleBooksSource::new(
                client.clone(),
                config.google_books.base_url.clone(),
                config.google_books.api_key.clone(),
            )),
            SourceKind::OpenLibrary => Box::new(OpenLibrarySource::new(
                client.clone(),
                config.open_library.base_url.clone(),
            )),
            SourceKind::Generative => {
                let api_key = config.generative.api_key.clone().ok_or_else(|| {
                    SourceError::Config {
                        source_name: "generative",
                        message:     "an API key is required (OPENAI_API_KEY or generative.api_key)"
                            .to_string(),
                    }
                })?;
                Box::new(GenerativeSource::new(
                    client.clone(),
                    config.generative.endpoint.clone(),
                    config.generative.model.clone(),
                    api_key,
                ))
            }
        })
    }
}

impl Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown source {s:?}"))
    }
}

/// The configured source, wrapped in a [`SourceChain`] when fallbacks are configured.
pub fn from_config(config: &Config, client: &Client) -> Result<Box<dyn BookSource>> {
    let primary = config.lookup.source.build(config, client)?;
    if config.lookup.fallback.is_empty() {
        return Ok(primary);
    }
    let mut sources = vec![primary];
    for kind in &config.lookup.fallback {
        sources.push(kind.build(config, client)?);
    }
    Ok(Box::new(SourceChain::new(sources)))
}

/// Joins non-blank names with `", "`.
pub(crate) fn join_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let joined = names
        .into_iter()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    (!joined.is_empty()).then_some(joined)
}
