use serde::{Deserialize, Serialize};

/// One entry of `/api/books?jscmd=data`, keyed by `ISBN:<isbn>` in the response.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
    pub url:          Option<String>,
    pub key:          Option<String>,
    pub title:        Option<String>,
    pub authors:      Vec<Author>,
    pub identifiers:  Option<Identifiers>,
    pub publishers:   Vec<Publisher>,
    pub publish_date: Option<String>,
    pub cover:        Option<Cover>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub url:  Option<String>,
    pub name: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Identifiers {
    pub isbn_10:     Vec<String>,
    pub isbn_13:     Vec<String>,
    pub openlibrary: Vec<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Publisher {
    pub name: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cover {
    pub small:  Option<String>,
    pub medium: Option<String>,
    pub large:  Option<String>,
}

impl Cover {
    /// Largest size on offer.
    pub fn best(self) -> Option<String> {
        self.large.or(self.medium).or(self.small)
    }
}
