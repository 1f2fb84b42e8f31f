use tracing::{error, info, warn};

use crate::{
    error::LookupError,
    sources::BookSource,
    types::{book_record::BookRecord, isbn::Isbn},
};

/// Turns raw form input into a finished [`BookRecord`] using one configured source.
pub struct CitationService {
    source: Box<dyn BookSource>,
}

impl CitationService {
    pub fn new(source: Box<dyn BookSource>) -> Self {
        Self { source }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Validates `input`, looks it up and formats the citation.
    ///
    /// Invalid input never reaches the source. Source failures are logged here and reported
    /// to the caller only as [`LookupError::Unavailable`].
    pub async fn cite(&self, input: &str) -> Result<BookRecord, LookupError> {
        let isbn = Isbn::parse(input)?;
        if !isbn.checksum_valid() {
            warn!("{isbn} fails the ISBN checksum, looking it up anyway");
        }
        info!("Looking up {isbn} with {}.", self.source.name());

        let raw = match self.source.fetch(&isbn).await {
            Ok(raw) => raw,
            Err(e) => {
                error!("Lookup of {isbn} failed: {:#}", anyhow::Error::new(e));
                return Err(LookupError::Unavailable);
            }
        };
        if !raw.has_title() {
            info!("No book found for {isbn}.");
            return Err(LookupError::NotFound(isbn.to_string()));
        }

        let record = BookRecord::finish(raw, &isbn);
        info!("Handling of {isbn} complete.");
        Ok(record)
    }
}
