use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the landroute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a country code is not a key of the routing graph.
    #[error("unknown country code: {code}")]
    UnknownCountry { code: String },

    /// Raised when user input could not be resolved to a canonical code.
    #[error("unknown country: {input}{}", format_suggestions(.suggestions))]
    UnresolvedIdentifier {
        input: String,
        suggestions: Vec<String>,
    },

    /// Raised by front ends when a search found no land route between two
    /// valid countries.
    #[error("no land route found between {origin} and {destination}")]
    RouteNotFound { origin: String, destination: String },

    /// Dataset could not be located at the resolved path.
    #[error("country dataset not found at {path}")]
    DatasetNotFound { path: PathBuf },

    /// Raised when attempting to write a dataset without any countries.
    #[error("refusing to write empty border data")]
    EmptyDataset,

    /// Raised when a persisted cache key is not of the form `ORIGIN->DEST`.
    #[error("invalid route cache key: {key}")]
    InvalidCacheKey { key: String },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for data or cache files")]
    ProjectDirsUnavailable,

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error means "this country is not known", whichever stage
    /// detected it.
    pub fn is_unknown_country(&self) -> bool {
        matches!(
            self,
            Error::UnknownCountry { .. } | Error::UnresolvedIdentifier { .. }
        )
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
