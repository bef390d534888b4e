//! The error struct returned by every IAM backend operation.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use super::ErrorKind;

/// The error type for IAM backend operations.
///
/// ```text
/// Error
/// ├── kind: ErrorKind          (category for matching)
/// ├── message: String          (human-readable description)
/// ├── status: Option<u16>      (HTTP status, when the backend answered)
/// ├── code: Option<i64>        (envelope code, when the body was an envelope)
/// └── source: Option           (underlying cause)
/// ```
///
/// ## Example
///
/// ```rust
/// use iam_backend::{Error, ErrorKind};
///
/// fn describe(err: &Error) -> String {
///     match err.kind() {
///         ErrorKind::Application => format!("backend refused: code={:?}", err.code()),
///         ErrorKind::HttpStatus => format!("bad status: {:?}", err.status()),
///         kind if kind.is_transport() => "backend unreachable".to_string(),
///         _ => err.to_string(),
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    status: Option<u16>,
    code: Option<i64>,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl Error {
    /// Creates a new error with the given kind and message.
    ///
    /// ```rust
    /// use iam_backend::{Error, ErrorKind};
    ///
    /// let err = Error::new(ErrorKind::MissingField, "no token in response body");
    /// assert_eq!(err.kind(), ErrorKind::MissingField);
    /// ```
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            code: None,
            source: None,
        }
    }

    /// Returns the error kind for categorization.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable message without the kind prefix.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status the backend answered with, if any.
    #[inline]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns the envelope `code` the backend answered with, if any.
    #[inline]
    pub fn code(&self) -> Option<i64> {
        self.code
    }

    /// Sets the HTTP status for this error.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the envelope code for this error.
    #[must_use]
    pub fn with_code(mut self, code: i64) -> Self {
        self.code = Some(code);
        self
    }

    /// Sets the source error for this error.
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Prefixes the message with `context`.
    #[must_use]
    pub(crate) fn with_context(mut self, context: &str) -> Self {
        self.message = format!("{}: {}", context, self.message).into();
        self
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Creates an error for a non-zero envelope code.
    ///
    /// The message reads `response body.code: <code>, message:<message>`.
    pub fn application(code: i64, message: &str) -> Self {
        Self::new(
            ErrorKind::Application,
            format!("response body.code: {}, message:{}", code, message),
        )
        .with_code(code)
    }

    /// Creates an error for an HTTP status other than 200.
    ///
    /// When the body parsed as an envelope with a non-empty message, the
    /// envelope code and message are appended.
    pub fn http_status(status: u16, envelope: Option<(i64, &str)>) -> Self {
        let mut message = format!("statusCode is {} not 200", status);
        let mut code = None;
        if let Some((c, msg)) = envelope
            && !msg.is_empty()
        {
            message.push_str(&format!(". response body.code: {}, message:{}", c, msg));
            code = Some(c);
        }
        let err = Self::new(ErrorKind::HttpStatus, message).with_status(status);
        match code {
            Some(c) => err.with_code(c),
            None => err,
        }
    }

    /// Creates an error for a field absent from the response data.
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorKind::MissingField,
            format!("no {} in response body", field),
        )
    }

    /// Creates an error for a field that is not a string.
    pub fn invalid_field(field: &str) -> Self {
        Self::new(
            ErrorKind::InvalidField,
            format!("{} is not a valid string", field),
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::configuration(format!("invalid URL: {}", err)).with_source(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection
        } else if err.is_builder() {
            ErrorKind::InvalidArgument
        } else {
            ErrorKind::Transport
        };
        let message = format!("request failed: {}", chain(&err));
        let status = err.status().map(|s| s.as_u16());
        let mapped = Error::new(kind, message).with_source(err);
        match status {
            Some(status) => mapped.with_status(status),
            None => mapped,
        }
    }
}

// reqwest's Display names only the failure class; the cause lives in the
// source chain.
fn chain(err: &dyn StdError) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !out.ends_with(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = cause.source();
    }
    out
}
