use chrono::{Datelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    mla::{self, CitationFields},
    types::isbn::Isbn,
};

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{4})\b").expect("valid regex"));

/// Metadata exactly as one source handed it back. A record without a title means "not found".
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub isbn13:    Option<String>,
    pub title:     Option<String>,
    pub author:    Option<String>,
    pub edition:   Option<String>,
    pub publisher: Option<String>,
    pub year:      Option<String>,
    pub image_url: Option<String>,
}

impl RawRecord {
    pub fn has_title(&self) -> bool {
        self.title
            .as_deref()
            .map_or(false, |title| !title.trim().is_empty())
    }
}

/// The normalized record returned to callers.
///
/// Only [`BookRecord::finish`] builds one, so `mla_citation` is present exactly when
/// `title` is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    isbn13:       Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title:        Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author:       Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    edition:      Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    publisher:    Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    year:         Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url:    Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mla_citation: Option<String>,
}

impl BookRecord {
    /// Normalizes `raw` and derives the citation. `searched` fills in a missing ISBN-13.
    pub fn finish(raw: RawRecord, searched: &Isbn) -> Self {
        let RawRecord {
            isbn13,
            title,
            author,
            edition,
            publisher,
            year,
            image_url,
        } = raw;

        let mut record = Self {
            isbn13:       non_empty(isbn13).or_else(|| Some(searched.to_string())),
            title:        non_empty(title),
            author:       non_empty(author),
            edition:      non_empty(edition),
            publisher:    non_empty(publisher),
            year:         non_empty(year).map(|year| normalize_year(&year)),
            image_url:    non_empty(image_url),
            mla_citation: None,
        };
        record.mla_citation = record.title.as_ref().map(|_| {
            mla::format_citation(&CitationFields {
                author:    record.author.as_deref(),
                title:     record.title.as_deref(),
                edition:   record.edition.as_deref(),
                publisher: record.publisher.as_deref(),
                year:      record.year.as_deref(),
            })
        });
        record
    }

    pub fn isbn13(&self) -> Option<&str> {
        self.isbn13.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn edition(&self) -> Option<&str> {
        self.edition.as_deref()
    }

    pub fn publisher(&self) -> Option<&str> {
        self.publisher.as_deref()
    }

    pub fn year(&self) -> Option<&str> {
        self.year.as_deref()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn mla_citation(&self) -> Option<&str> {
        self.mla_citation.as_deref()
    }
}

fn non_empty(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Reduces a publication date to its year. Text with no recognizable year is kept as is.
pub fn normalize_year(date: &str) -> String {
    let date = date.trim();
    if date.len() == 4 && date.chars().all(|c| c.is_ascii_digit()) {
        return date.to_string();
    }
    if let Ok(parsed) = dateparser::parse_with_timezone(date, &Utc) {
        return format!("{:04}", parsed.year());
    }
    match YEAR_RE.captures(date) {
        Some(caps) => caps[1].to_string(),
        None => date.to_string(),
    }
}
