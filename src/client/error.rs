use std::fmt;

use reqwest::StatusCode;

#[derive(Debug)]
pub enum ClientError {
    /// Transport or body decoding failure.
    Http(reqwest::Error),
    /// The API answered with a non-success status.
    Api { status: StatusCode, message: String },
    /// A protected endpoint was called before logging in.
    NotAuthenticated,
}

impl ClientError {
    /// True when the caller should send the user back to the login page.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::NotAuthenticated)
            || matches!(self, ClientError::Api { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Http(e) => e.status(),
            ClientError::Api { status, .. } => Some(*status),
            ClientError::NotAuthenticated => None,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Http(e) => write!(f, "Request failed: {}", e),
            ClientError::Api { status, message } => write!(f, "{}: {}", status, message),
            ClientError::NotAuthenticated => write!(f, "Not logged in"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        ClientError::Http(error)
    }
}
