//! Error types.

use serde_json::Value;

/// Error enumerates the possible Alias Crab error states.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Returned when a client request is missing a required field, or a field fails the
    /// alias/destination format checks of the [rules API][crate::api].
    ///
    /// The message is returned to the client verbatim.
    #[error("{0}")]
    Validation(String),

    /// Returned when a call to the email routing provider fails.
    ///
    /// `status` is `None` for transport level failures (connection refused, timeouts, etc)
    /// where the provider never answered. `body` holds the provider's JSON error document when
    /// it sent one, and is relayed to the client as-is.
    #[error("upstream request failed: {message}")]
    Upstream {
        status: Option<u16>,
        body: Option<Value>,
        message: String,
    },

    /// Returned when a rule can't be found by identifier, neither by the detail lookup nor by a
    /// scan of the full rule list (matching the identifier or the legacy tag).
    #[error("Regla no encontrada")]
    RuleNotFound(String),

    /// Returned when a rule could be fetched for a full resubmission but lacks the `matchers`
    /// or `actions` the provider requires. Wraps the error of the minimal update that made the
    /// resubmission necessary.
    #[error("Regla incompleta: faltan matchers o actions")]
    IncompleteRule {
        #[source]
        source: Box<Error>,
    },

    /// Returned at start-up when a required configuration value is absent or blank.
    #[error("missing required configuration value {0}")]
    MissingConfig(&'static str),

    /// Returned at start-up when a configuration value can't be parsed.
    #[error("invalid value for {name}: \"{value}\"")]
    InvalidConfig { name: &'static str, value: String },

    /// Returned when a generic IO error occurs.
    #[error("an IO error occurred")]
    IO(#[from] std::io::Error),

    /// Returned when a JSON config file can't be parsed.
    #[error("invalid JSON")]
    InvalidJSON(#[from] serde_json::Error),
}

impl Error {
    /// The HTTP status the provider answered with, if this error came from the provider.
    ///
    /// For [`Error::IncompleteRule`] this is the status of the wrapped error.
    #[must_use]
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Error::Upstream { status, .. } => *status,
            Error::IncompleteRule { source } => source.upstream_status(),
            _ => None,
        }
    }

    /// The structured JSON error document the provider sent, if any.
    #[must_use]
    pub fn upstream_body(&self) -> Option<&Value> {
        match self {
            Error::Upstream { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Upstream {
            status: err.status().map(|s| s.as_u16()),
            body: None,
            message: err.to_string(),
        }
    }
}
