//! MLA citation formatting.
//!
//! Titles are wrapped in `*...*`; turning those markers into italics is up to whoever
//! displays the citation (see [`crate::page`]).

use once_cell::sync::Lazy;
use regex::Regex;

static PARENTHETICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]*\)").expect("valid regex"));

/// The fields a citation is built from. Absent fields render as empty text.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CitationFields<'a> {
    pub author:    Option<&'a str>,
    pub title:     Option<&'a str>,
    pub edition:   Option<&'a str>,
    pub publisher: Option<&'a str>,
    pub year:      Option<&'a str>,
}

/// `Author. *Title*. 9th ed., Publisher, Year.`
///
/// Stray commas from missing publisher or year are left in place.
pub fn format_citation(fields: &CitationFields<'_>) -> String {
    let author = fields.author.unwrap_or_default().trim();
    let title = clean_title(fields.title.unwrap_or_default());
    let publisher = fields.publisher.unwrap_or_default();
    let year = fields.year.unwrap_or_default();

    let mut citation = format!("{author}. *{title}*");
    if let Some(edition) = fields.edition.map(str::trim) {
        if !edition.is_empty() && edition != "1" {
            citation.push_str(". ");
            citation.push_str(&edition_label(edition));
            if !names_itself(edition) {
                citation.push_str(" ed.");
            }
        }
    }
    citation.push_str(&format!(", {publisher}, {year}."));
    citation
}

/// The citation without its `*` italic markers, as sent to the relay.
pub fn plain_text(citation: &str) -> String {
    citation.replace('*', "")
}

/// Drops the first `(...)` group, which is usually an edition note like `(9th Edition)`.
pub fn clean_title(title: &str) -> String {
    PARENTHETICAL.replacen(title, 1, "").trim().to_string()
}

fn edition_label(edition: &str) -> String {
    match edition.parse::<u32>() {
        Ok(n) => ordinal(n),
        Err(_) => edition.to_string(),
    }
}

/// Textual editions like `2nd Edition` or `Rev. ed.` already carry the word.
fn names_itself(edition: &str) -> bool {
    let lower = edition.to_lowercase();
    lower.ends_with("ed.") || lower.ends_with("edition")
}

/// English ordinal: 1st, 2nd, 3rd, 4th, 11th, 12th, 13th, 21st, ...
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
