//! Error kind enumeration for categorizing SDK errors.

/// Categorization of SDK errors.
///
/// Every failed call maps to exactly one kind, so callers can `match` on the
/// failure mode without parsing messages.
///
/// | ErrorKind         | Raised when                                          |
/// |-------------------|------------------------------------------------------|
/// | `Configuration`   | Invalid host URL or credentials at construction      |
/// | `InvalidArgument` | The request payload could not be encoded             |
/// | `Connection`      | DNS, TLS handshake or connect failure                |
/// | `Timeout`         | The per-call timeout elapsed                          |
/// | `Transport`       | Any other HTTP-level failure                          |
/// | `HttpStatus`      | The backend answered with a status other than 200    |
/// | `Application`     | The envelope carried a non-zero `code`               |
/// | `InvalidResponse` | The body or its `data` did not match the expected shape |
/// | `MissingField`    | An expected field was absent from the decoded data   |
/// | `InvalidField`    | An expected field was present with the wrong type    |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Client configuration is invalid (bad host URL, unusable credentials).
    #[error("configuration error")]
    Configuration,

    /// The request payload could not be encoded into a query string or body.
    #[error("invalid argument")]
    InvalidArgument,

    /// Connection error (DNS, TLS handshake, network unreachable).
    #[error("connection error")]
    Connection,

    /// The request did not complete within its timeout.
    #[error("timeout")]
    Timeout,

    /// Other transport-level failure reported by the HTTP client.
    #[error("transport error")]
    Transport,

    /// The backend answered with an HTTP status other than 200.
    ///
    /// [`Error::status()`](crate::Error::status) holds the status, and
    /// [`Error::code()`](crate::Error::code) the envelope code when the body
    /// could be parsed.
    #[error("unexpected http status")]
    HttpStatus,

    /// The backend answered with a non-zero envelope code.
    #[error("application error")]
    Application,

    /// The response body or its `data` payload had an unexpected shape.
    #[error("invalid response")]
    InvalidResponse,

    /// An expected field was absent from the response data.
    #[error("missing field")]
    MissingField,

    /// An expected field was present but had the wrong type.
    #[error("invalid field")]
    InvalidField,
}

impl ErrorKind {
    /// Returns `true` if the error happened before the backend produced a
    /// response (connection, timeout, other transport failures).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ErrorKind::Connection | ErrorKind::Timeout | ErrorKind::Transport
        )
    }

    /// Returns `true` if the backend answered but rejected the request.
    pub fn is_backend_rejection(&self) -> bool {
        matches!(self, ErrorKind::HttpStatus | ErrorKind::Application)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_transport() {
        assert!(ErrorKind::Connection.is_transport());
        assert!(ErrorKind::Timeout.is_transport());
        assert!(ErrorKind::Transport.is_transport());
        assert!(!ErrorKind::HttpStatus.is_transport());
        assert!(!ErrorKind::Application.is_transport());
        assert!(!ErrorKind::MissingField.is_transport());
    }

    #[test]
    fn test_is_backend_rejection() {
        assert!(ErrorKind::HttpStatus.is_backend_rejection());
        assert!(ErrorKind::Application.is_backend_rejection());
        assert!(!ErrorKind::InvalidResponse.is_backend_rejection());
        assert!(!ErrorKind::Timeout.is_backend_rejection());
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorKind::Configuration.to_string(), "configuration error");
        assert_eq!(ErrorKind::HttpStatus.to_string(), "unexpected http status");
        assert_eq!(ErrorKind::Application.to_string(), "application error");
        assert_eq!(ErrorKind::MissingField.to_string(), "missing field");
        assert_eq!(ErrorKind::InvalidField.to_string(), "invalid field");
    }
}
