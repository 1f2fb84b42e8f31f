use std::{
    collections::HashMap,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use local_ip_address::local_ip;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    config::ServerConfig,
    error::{LookupError, RelayError},
    lookup::CitationService,
    page::{self, Notice},
    relay::SubmissionRelay,
};

pub struct TheStateOfAffairs {
    pub service: CitationService,
    pub relay:   SubmissionRelay,
}

pub fn router(state: Arc<TheStateOfAffairs>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/cite", post(cite))
        .route("/submit", post(submit))
        .route("/api/isbn", get(isbn_query))
        .route("/api/isbn/:isbn", get(isbn))
        .with_state(state)
}

pub async fn start(config: &ServerConfig, state: TheStateOfAffairs) -> Result<()> {
    let ip = match &config.host {
        Some(host) => host.parse::<IpAddr>()?,
        None => local_ip().unwrap_or_else(|e| {
            warn!("Couldn't get local ip address ({e}), using localhost.");
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        }),
    };
    let port = config.port;
    let addr = SocketAddr::from((ip, port));
    let app = router(Arc::new(state));
    info!("Listening on {ip}:{port}.");
    axum::Server::try_bind(&addr)?
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct CiteForm {
    #[serde(default)]
    isbn: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    citation: String,
    #[serde(default)]
    quantity: String,
}

#[derive(Debug, Serialize)]
struct ApiError {
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
    error: String,
}

async fn index() -> Html<String> {
    Html(page::index("", None))
}

async fn cite(
    State(state): State<Arc<TheStateOfAffairs>>,
    Form(form): Form<CiteForm>,
) -> (StatusCode, Html<String>) {
    info!("Received {}.", form.isbn);
    match state.service.cite(&form.isbn).await {
        Ok(record) => (StatusCode::OK, Html(page::record(&form.isbn, &record))),
        Err(e) => {
            let status = lookup_status(&e);
            let notice = match &e {
                LookupError::Validation(v) => Notice::Field {
                    field:   v.field(),
                    message: v.to_string(),
                },
                _ => Notice::Error(e.to_string()),
            };
            (status, Html(page::index(&form.isbn, Some(&notice))))
        }
    }
}

async fn submit(
    State(state): State<Arc<TheStateOfAffairs>>,
    Form(form): Form<SubmitForm>,
) -> (StatusCode, Html<String>) {
    let (status, notice) = match state.relay.submit(&form.citation, &form.quantity).await {
        Ok(()) => (
            StatusCode::OK,
            Notice::Success("Citation submitted.".to_string()),
        ),
        Err(RelayError::Validation(v)) => (
            StatusCode::BAD_REQUEST,
            Notice::Field {
                field:   v.field(),
                message: v.to_string(),
            },
        ),
        Err(e @ RelayError::Unavailable) => (StatusCode::BAD_GATEWAY, Notice::Error(e.to_string())),
    };
    (
        status,
        Html(page::submission(&form.citation, &form.quantity, &notice)),
    )
}

async fn isbn(
    Path(isbn): Path<String>,
    State(state): State<Arc<TheStateOfAffairs>>,
) -> Response {
    info!("Received {}.", isbn);
    lookup_json(&state, &isbn).await
}

async fn isbn_query(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<TheStateOfAffairs>>,
) -> Response {
    let isbn = match params.get("content") {
        Some(isbn) => isbn,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiError {
                    field: Some("isbn"),
                    error: "Missing query parameter `content`.".to_string(),
                }),
            )
                .into_response()
        }
    };
    info!("Received {}.", isbn);
    lookup_json(&state, isbn).await
}

async fn lookup_json(state: &TheStateOfAffairs, isbn: &str) -> Response {
    match state.service.cite(isbn).await {
        Ok(record) => Json(record).into_response(),
        Err(e) => {
            let field = match &e {
                LookupError::Validation(v) => Some(v.field()),
                _ => None,
            };
            let body = ApiError {
                field,
                error: e.to_string(),
            };
            (lookup_status(&e), Json(body)).into_response()
        }
    }
}

fn lookup_status(e: &LookupError) -> StatusCode {
    match e {
        LookupError::Validation(_) => StatusCode::BAD_REQUEST,
        LookupError::NotFound(_) => StatusCode::NOT_FOUND,
        LookupError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
    }
}
