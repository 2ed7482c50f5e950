use thiserror::Error;

/// Errors that can occur while building or dispatching a payment form.
#[derive(Debug, Error)]
pub enum PayzenError {
    /// A required part of the configuration is missing.
    ///
    /// This kind of error should be fixed while integrating and never show up
    /// in production.
    #[error("No {field} provided. Please read documentation")]
    Integration {
        /// Dotted path of the missing field, e.g. `config.orderData`.
        field: String,
    },
    /// The credentials source is not a usable URL, or the HTTP client
    /// could not be built.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// Sending the credentials request or receiving its response failed.
    #[error("Request error: {0}")]
    Request(String),
    /// The credentials source answered with something other than `200 OK`.
    #[error("Credentials source returned {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code of the response.
        status: u16,
        /// Response body, as far as it could be read.
        body: String,
    },
    /// The credentials response could not be parsed as JSON.
    #[error("Deserialization error: {0}")]
    Deserialization(String),
    /// The credentials response parsed but carried no signature.
    #[error("Credentials response contains no signature")]
    MissingSignature,
}

impl PayzenError {
    pub(crate) fn integration(field: impl Into<String>) -> Self {
        Self::Integration {
            field: field.into(),
        }
    }

    /// Returns `true` for errors caused by the credentials source rather than
    /// by the caller's configuration.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Request(_)
                | Self::UnexpectedStatus { .. }
                | Self::Deserialization(_)
                | Self::MissingSignature
        )
    }
}
