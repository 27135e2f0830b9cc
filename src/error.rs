use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

/// Paper-trading errors raised by the ledger and the trade flow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TradeError {
    #[error("no holdings found for {ticker}")]
    NoHolding { ticker: String },

    #[error("quantity must be greater than zero")]
    ZeroQuantity,

    #[error("instruction does not say whether to buy or sell: {instruction}")]
    MissingAction { instruction: String },

    #[error("could not fetch live price for {ticker}")]
    PriceUnavailable { ticker: String },
}

/// Ticker resolution errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("could not detect a valid NSE ticker in: {query}")]
    NoTicker { query: String },

    #[error("invalid ticker '{raw}': {reason}")]
    InvalidTicker { raw: String, reason: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Trade(#[from] TradeError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("scrape failed for {ticker}: {reason}")]
    Scrape { ticker: String, reason: String },

    #[error("LLM error: {0}")]
    Llm(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Self {
        Error::Database(err.to_string())
    }
}
