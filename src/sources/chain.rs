use async_trait::async_trait;
use tracing::{info, warn};

use crate::{
    error::SourceError,
    sources::BookSource,
    types::{book_record::RawRecord, isbn::Isbn},
};

/// Asks each source in turn, one at a time, until one of them knows the book.
///
/// Errors from a source are logged and the next source is tried. The chain only fails
/// when every source failed; otherwise an exhausted chain reports "not found".
pub struct SourceChain {
    sources: Vec<Box<dyn BookSource>>,
}

impl SourceChain {
    pub fn new(sources: Vec<Box<dyn BookSource>>) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl BookSource for SourceChain {
    fn name(&self) -> &'static str {
        "chain"
    }

    async fn fetch(&self, isbn: &Isbn) -> Result<RawRecord, SourceError> {
        let mut last_error = None;
        let mut answered = false;
        for source in &self.sources {
            match source.fetch(isbn).await {
                Ok(record) if record.has_title() => {
                    info!("{} found {isbn}", source.name());
                    return Ok(record);
                }
                Ok(_) => {
                    info!("{} does not know {isbn}", source.name());
                    answered = true;
                }
                Err(e) => {
                    warn!("{e}, trying the next source");
                    last_error = Some(e);
                }
            }
        }
        match last_error {
            Some(e) if !answered => Err(e),
            _ => Ok(RawRecord::default()),
        }
    }
}
