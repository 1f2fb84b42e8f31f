#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use isbncite::{
    error::SourceError,
    sources::BookSource,
    types::{Isbn, RawRecord},
};

/// Answers every lookup with the same record (or error) and counts the calls.
pub struct MockSource {
    answer: Result<RawRecord, String>,
    calls:  Arc<AtomicUsize>,
}

impl MockSource {
    pub fn found(record: RawRecord) -> (Self, Arc<AtomicUsize>) {
        Self::new(Ok(record))
    }

    pub fn not_found() -> (Self, Arc<AtomicUsize>) {
        Self::new(Ok(RawRecord::default()))
    }

    pub fn failing(message: &str) -> (Self, Arc<AtomicUsize>) {
        Self::new(Err(message.to_string()))
    }

    fn new(answer: Result<RawRecord, String>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                answer,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

#[async_trait]
impl BookSource for MockSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch(&self, _isbn: &Isbn) -> Result<RawRecord, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer
            .clone()
            .map_err(|message| SourceError::parse("mock", message))
    }
}

pub fn operating_system_concepts() -> RawRecord {
    RawRecord {
        isbn13:    None,
        title:     Some("Operating System Concepts (9th Edition)".into()),
        author:    Some("Silberschatz, Abraham".into()),
        edition:   Some("9".into()),
        publisher: Some("Wiley".into()),
        year:      Some("2012".into()),
        image_url: None,
    }
}

pub const OSC_CITATION: &str =
    "Silberschatz, Abraham. *Operating System Concepts*. 9th ed., Wiley, 2012.";

pub fn calls(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}
