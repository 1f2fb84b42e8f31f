use thiserror::Error;

/// Input rejected before anything leaves the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("ISBN must be at least 10 characters long.")]
    IsbnTooShort,

    #[error("ISBN may only contain digits, the letter X and hyphens.")]
    IsbnInvalidCharacters,

    #[error("Quantity must be a positive whole number.")]
    Quantity,
}

impl ValidationError {
    /// Name of the form field the message belongs next to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::IsbnTooShort | ValidationError::IsbnInvalidCharacters => "isbn",
            ValidationError::Quantity => "quantity",
        }
    }
}

/// Failure of a lookup source. Never shown to users verbatim.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{source_name}: request to {url} failed")]
    Transport {
        source_name: &'static str,
        url:         String,
        #[source]
        error:       reqwest::Error,
    },

    #[error("{source_name}: {url} responded with HTTP {status}")]
    Status {
        source_name: &'static str,
        url:         String,
        status:      reqwest::StatusCode,
    },

    #[error("{source_name}: could not parse response: {message}")]
    Parse {
        source_name: &'static str,
        message:     String,
    },

    #[error("{source_name}: {message}")]
    Config {
        source_name: &'static str,
        message:     String,
    },
}

impl SourceError {
    pub fn parse(source_name: &'static str, message: impl ToString) -> Self {
        SourceError::Parse {
            source_name,
            message: message.to_string(),
        }
    }

    pub fn source_name(&self) -> &'static str {
        match self {
            SourceError::Transport { source_name, .. }
            | SourceError::Status { source_name, .. }
            | SourceError::Parse { source_name, .. }
            | SourceError::Config { source_name, .. } => source_name,
        }
    }
}

/// Outcome of a failed citation lookup, worded for the person at the form.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Could not find a book with ISBN: {0}. Please check the number and try again.")]
    NotFound(String),

    #[error("The book lookup service is currently unavailable. Please try again later.")]
    Unavailable,
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Could not submit the citation. Please try again later.")]
    Unavailable,
}
