//! API gateway error types.

use thiserror::Error;

/// Errors that can occur when calling the remote API.
///
/// Produced only by the gateway; domain services re-throw these unchanged
/// so callers always see one taxonomy.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status. Whatever structure the
    /// error body offered is carried along.
    #[error("API error ({status}): {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or `HTTP <status>` when the body
        /// was not parseable JSON.
        message: String,
        /// Structured per-field/multi-error list, when provided.
        errors: Vec<String>,
        /// Free-form description, when provided.
        description: Option<String>,
    },

    /// The request was aborted by the fixed timeout.
    #[error("request timed out")]
    Timeout,

    /// Connection-level failure (DNS, refused connection, TLS).
    #[error("network error: {0}")]
    Network(reqwest::Error),

    /// A 2xx body that could not be decoded.
    #[error("response parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A 2xx envelope with no data where data was required.
    #[error("response body missing data: {0}")]
    MissingData(String),
}

impl ApiError {
    /// The user-facing detail for this error: the structured error list if
    /// present, else the description, else the plain message.
    #[must_use]
    pub fn user_detail(&self) -> String {
        match self {
            Self::Status {
                message,
                errors,
                description,
                ..
            } => {
                if !errors.is_empty() {
                    errors.join("; ")
                } else if let Some(description) = description {
                    description.clone()
                } else {
                    message.clone()
                }
            }
            other => other.to_string(),
        }
    }

    /// HTTP status code, when the server produced one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(
        errors: Vec<String>,
        description: Option<String>,
    ) -> ApiError {
        ApiError::Status {
            status: 422,
            message: "Unprocessable Entity".to_owned(),
            errors,
            description,
        }
    }

    #[test]
    fn test_user_detail_prefers_error_list() {
        let err = status_error(
            vec!["email already taken".to_owned(), "weak password".to_owned()],
            Some("ignored".to_owned()),
        );
        assert_eq!(err.user_detail(), "email already taken; weak password");
    }

    #[test]
    fn test_user_detail_falls_back_to_description() {
        let err = status_error(vec![], Some("tax ID rejected".to_owned()));
        assert_eq!(err.user_detail(), "tax ID rejected");
    }

    #[test]
    fn test_user_detail_falls_back_to_message() {
        let err = status_error(vec![], None);
        assert_eq!(err.user_detail(), "Unprocessable Entity");
    }

    #[test]
    fn test_status_accessor() {
        assert_eq!(status_error(vec![], None).status(), Some(422));
        assert_eq!(ApiError::Timeout.status(), None);
    }
}
