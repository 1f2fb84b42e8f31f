//! Single-attempt HTTP helpers shared by the lookup sources.
//!
//! No retries and no explicit timeout: a failed request is final and the transport's
//! defaults apply.

use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::error::SourceError;

pub fn build_client(user_agent: &str) -> anyhow::Result<Client> {
    Ok(Client::builder().user_agent(user_agent).build()?)
}

pub async fn get_text(
    client: &Client,
    source_name: &'static str,
    url: &str,
    query: &[(&str, &str)],
) -> Result<String, SourceError> {
    send_text(client.get(url).query(query), source_name, url).await
}

pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    source_name: &'static str,
    url: &str,
    query: &[(&str, &str)],
) -> Result<T, SourceError> {
    let text = get_text(client, source_name, url, query).await?;
    decode_json(source_name, &text)
}

pub async fn post_json<B: Serialize, T: DeserializeOwned>(
    client: &Client,
    source_name: &'static str,
    url: &str,
    bearer: Option<&str>,
    body: &B,
) -> Result<T, SourceError> {
    let mut request = client.post(url).json(body);
    if let Some(token) = bearer {
        request = request.bearer_auth(token);
    }
    let text = send_text(request, source_name, url).await?;
    decode_json(source_name, &text)
}

/// Deserializes `text`, reporting the JSON path of the first mismatch.
pub fn decode_json<T: DeserializeOwned>(
    source_name: &'static str,
    text: &str,
) -> Result<T, SourceError> {
    let de = &mut serde_json::Deserializer::from_str(text);
    serde_path_to_error::deserialize(de).map_err(|e| SourceError::parse(source_name, e))
}

async fn send_text(
    request: RequestBuilder,
    source_name: &'static str,
    url: &str,
) -> Result<String, SourceError> {
    let transport = |error: reqwest::Error| SourceError::Transport {
        source_name,
        url: url.to_string(),
        error,
    };
    let resp = request.send().await.map_err(transport)?;
    debug!("{source_name}: {} -> {}", resp.url(), resp.status());
    let status = resp.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            source_name,
            url: url.to_string(),
            status,
        });
    }
    resp.text().await.map_err(transport)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Outer {
        #[allow(dead_code)]
        items: Vec<Inner>,
    }

    #[derive(Debug, Deserialize)]
    struct Inner {
        #[allow(dead_code)]
        title: String,
    }

    #[test]
    fn decode_errors_carry_the_json_path() {
        let err = decode_json::<Outer>("google_books", r#"{"items": [{"title": 3}]}"#)
            .unwrap_err()
            .to_string();
        assert!(err.starts_with("google_books: could not parse response: items[0].title"), "{err}");
    }
}
