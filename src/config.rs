use std::{collections::BTreeMap, path::Path};

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::sources::SourceKind;

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Environment values are parsed before extraction, so `-123` arrives as a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Signed(n) => n.to_string(),
            Scalar::Unsigned(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

fn lenient_string_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = BTreeMap::<String, Scalar>::deserialize(deserializer)?;
    Ok(map.into_iter().map(|(k, v)| (k, v.into_string())).collect())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_string))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Falls back to the machine's LAN address when unset.
    pub host: Option<String>,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("isbncite/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    pub source:   SourceKind,
    /// Tried in order after `source` comes back empty or fails.
    pub fallback: Vec<SourceKind>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            source:   SourceKind::GoogleBooks,
            fallback: vec![],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// `{isbn}` is replaced by the searched ISBN.
    pub url_template: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            url_template: "https://isbnsearch.org/isbn/{isbn}".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleBooksConfig {
    pub base_url: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub api_key:  Option<String>,
}

impl Default for GoogleBooksConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/books/v1/volumes".into(),
            api_key:  None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenLibraryConfig {
    pub base_url: String,
}

impl Default for OpenLibraryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openlibrary.org/api/books".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerativeConfig {
    /// Any OpenAI-compatible chat completions endpoint.
    pub endpoint: String,
    pub model:    String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub api_key:  Option<String>,
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".into(),
            model:    "gpt-4o-mini".into(),
            api_key:  None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    pub endpoint:      String,
    pub content_field: String,
    /// Fixed tokens the form endpoint expects alongside the content field.
    #[serde(deserialize_with = "lenient_string_map")]
    pub hidden_fields: BTreeMap<String, String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint:      "https://docs.google.com/forms/d/e/citations/formResponse".into(),
            content_field: "entry.1000000".into(),
            hidden_fields: BTreeMap::from([
                ("fvv".to_string(), "1".to_string()),
                ("pageHistory".to_string(), "0".to_string()),
                ("fbzx".to_string(), "0".to_string()),
            ]),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub server:       ServerConfig,
    pub http:         HttpConfig,
    pub lookup:       LookupConfig,
    pub scrape:       ScrapeConfig,
    pub google_books: GoogleBooksConfig,
    pub open_library: OpenLibraryConfig,
    pub generative:   GenerativeConfig,
    pub relay:        RelayConfig,
}

impl Config {
    pub fn default_as_string() -> Result<String> {
        Ok(toml::to_string(&Self::default())?)
    }

    /// Defaults, then the TOML file, then `ISBNCITE_*` variables (`__` separates sections).
    pub fn read_config(path: Option<&Path>) -> Result<Self> {
        Ok(Self::figment(path).extract()?)
    }

    pub fn figment(path: Option<&Path>) -> Figment {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(
                Env::raw()
                    .only(&["GOOGLE_BOOKS_API_KEY"])
                    .map(|_| "google_books.api_key".into()),
            )
            .merge(
                Env::raw()
                    .only(&["OPENAI_API_KEY"])
                    .map(|_| "generative.api_key".into()),
            )
            .merge(Env::prefixed("ISBNCITE_").split("__"))
    }
}
