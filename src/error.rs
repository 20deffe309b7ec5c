use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GithubError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("GraphQL errors: {}", messages.join(", "))]
    GraphQL { messages: Vec<String> },

    #[error("Empty response from API")]
    EmptyResponse,

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Malformed Link header: {0}")]
    InvalidLinkHeader(String),

    #[error("GraphQL page reports more results but no end cursor")]
    MissingEndCursor,

    #[error("Page token {0} is not understood by this endpoint")]
    UnexpectedPageToken(String),

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error(
        "No GitHub token found. Set GITHUB_TOKEN env var or add token to the gh-team config.toml"
    )]
    MissingToken,

    #[error("Organization not specified. Pass --org, set GITHUB_OWNER or add owner to config")]
    NoOwner,

    #[error("Team not found: {0}")]
    TeamNotFound(String),
}

pub type Result<T> = std::result::Result<T, GithubError>;
