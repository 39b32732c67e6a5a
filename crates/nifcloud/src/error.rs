use std::fmt;

/// Coarse classification of a failed fetch.
///
/// None of these are retried inside a call; the next scrape is the retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    RequestBuild,
    Transport,
    NoData,
    ParseFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequestBuild => "request_build",
            Self::Transport => "transport",
            Self::NoData => "no_data",
            Self::ParseFailure => "parse_failure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchError {
    kind: ErrorKind,
    detail: String,
}

impl FetchError {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn request_build(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestBuild, detail)
    }

    pub fn transport(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, detail)
    }

    pub fn no_data() -> Self {
        Self::new(ErrorKind::NoData, "fetched no datapoints")
    }

    pub fn parse_failure(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::ParseFailure, detail)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::RequestBuild => write!(f, "failed building request: {}", self.detail),
            ErrorKind::Transport => write!(f, "transport: {}", self.detail),
            ErrorKind::NoData => f.write_str(&self.detail),
            ErrorKind::ParseFailure => write!(f, "parse: {}", self.detail),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            Self::request_build(e.to_string())
        } else {
            Self::transport(e.to_string())
        }
    }
}
