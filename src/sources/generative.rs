use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::{
    error::SourceError,
    http,
    sources::BookSource,
    types::{book_record::RawRecord, isbn::Isbn},
};

const NAME: &str = "generative";

const INSTRUCTION: &str = "You are a bibliographic assistant. Given an ISBN, reply with a single \
JSON object describing that exact book with the string fields \"title\", \"author\" (all authors \
joined with \", \"), \"edition\" (a bare number such as \"9\" when numbered), \"publisher\", \
\"year\" (four digits), \"isbn13\" and \"image_url\". Use an empty string for anything you do not \
know. If you do not know the book, reply with an empty \"title\".";

/// Asks a chat-completion model to recall the book's metadata.
pub struct GenerativeSource {
    client:   Client,
    endpoint: String,
    model:    String,
    api_key:  String,
}

impl GenerativeSource {
    pub fn new(client: Client, endpoint: String, model: String, api_key: String) -> Self {
        Self {
            client,
            endpoint,
            model,
            api_key,
        }
    }

    fn request<'a>(&'a self, isbn: &Isbn) -> ChatRequest<'a> {
        ChatRequest {
            model:           &self.model,
            temperature:     0.0,
            response_format: ResponseFormat {
                kind: "json_object",
            },
            messages:        vec![
                Message {
                    role:    "system",
                    content: INSTRUCTION.to_string(),
                },
                Message {
                    role:    "user",
                    content: format!("ISBN: {isbn}"),
                },
            ],
        }
    }
}

#[async_trait]
impl BookSource for GenerativeSource {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn fetch(&self, isbn: &Isbn) -> Result<RawRecord, SourceError> {
        info!("Asking {} about ISBN '{isbn}'", self.model);
        let request = self.request(isbn);
        let response: ChatResponse = http::post_json(
            &self.client,
            NAME,
            &self.endpoint,
            Some(&self.api_key),
            &request,
        )
        .await?;
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        parse_extraction(&content)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model:           &'a str,
    temperature:     f32,
    response_format: ResponseFormat,
    messages:        Vec<Message>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct Message {
    role:    &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Reads the model's JSON answer. Blank output means the model did not know the book.
pub fn parse_extraction(content: &str) -> Result<RawRecord, SourceError> {
    let content = strip_code_fence(content.trim());
    if content.is_empty() {
        return Ok(RawRecord::default());
    }
    let fields: Map<String, Value> =
        serde_json::from_str(content).map_err(|e| SourceError::parse(NAME, e))?;
    let field = |key: &str| match fields.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    Ok(RawRecord {
        isbn13:    field("isbn13"),
        title:     field("title"),
        author:    field("author"),
        edition:   field("edition"),
        publisher: field("publisher"),
        year:      field("year"),
        image_url: field("image_url"),
    })
}

// Some models wrap JSON in ```json fences even when asked not to.
fn strip_code_fence(content: &str) -> &str {
    content
        .strip_prefix("```json")
        .or_else(|| content.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(content)
}
