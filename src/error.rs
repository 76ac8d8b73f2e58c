use crate::{status::StatusError, tidy::tidy_error};
use std::{error::Error, fmt, io, path::PathBuf};
use thiserror::Error;

/// The result type returned from the library.
pub type Result<T> = std::result::Result<T, CannotError>;

/// A boxed error that can be carried as the cause of a [`CannotError`].
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// An error with an English message of the form
/// ```text
/// cannot <verb>[ <adjective>] <noun>[ <suffix>][: <cause>]
/// ```
/// where the noun may be put in double quotes.
///
/// The cause, if any, is embedded in the message after being passed through [`tidy_error`], and is kept as-is for
/// inspection through [`cause`](CannotError::cause) or [`Error::source`].
#[derive(Debug)]
pub struct CannotError {
    verb: String,
    adjective: String,
    noun: String,
    quote_noun: bool,
    suffix: String,
    cause: Option<BoxError>,
}

/// Returns a new [`CannotError`] for the given verb and noun, with no adjective, suffix or cause. Use the chained
/// setters on the returned value to fill in the rest.
///
/// ```
/// let err = cannot::cannot("open", "settings.toml").with_adjective("file").quoted();
/// assert_eq!(err.to_string(), r#"cannot open file "settings.toml""#);
/// ```
pub fn cannot<V, N>(verb: V, noun: N) -> CannotError
where
    V: Into<String>,
    N: Into<String>,
{
    CannotError::new(verb, "", noun, false, "", None)
}

impl CannotError {
    /// Returns a new error from all of its parts. Empty adjectives and suffixes are left out of the message. No
    /// validation is done on any of the values.
    pub fn new<V, A, N, S>(
        verb: V,
        adjective: A,
        noun: N,
        quote_noun: bool,
        suffix: S,
        cause: Option<BoxError>,
    ) -> Self
    where
        V: Into<String>,
        A: Into<String>,
        N: Into<String>,
        S: Into<String>,
    {
        Self {
            verb: verb.into(),
            adjective: adjective.into(),
            noun: noun.into(),
            quote_noun,
            suffix: suffix.into(),
            cause,
        }
    }

    /// Set the adjective that qualifies the noun.
    #[must_use]
    pub fn with_adjective<A>(mut self, adjective: A) -> Self
    where
        A: Into<String>,
    {
        self.adjective = adjective.into();
        self
    }

    /// Put the noun in double quotes.
    #[must_use]
    pub fn quoted(mut self) -> Self {
        self.quote_noun = true;
        self
    }

    /// Set the clause that follows the noun.
    #[must_use]
    pub fn with_suffix<S>(mut self, suffix: S) -> Self
    where
        S: Into<String>,
    {
        self.suffix = suffix.into();
        self
    }

    /// Set the underlying error.
    #[must_use]
    pub fn caused_by<E>(mut self, cause: E) -> Self
    where
        E: Into<BoxError>,
    {
        self.cause = Some(cause.into());
        self
    }

    /// Returns the verb telling what couldn't be done.
    pub fn verb(&self) -> &str {
        &self.verb
    }

    /// Returns the adjective qualifying the noun, or an empty string.
    pub fn adjective(&self) -> &str {
        &self.adjective
    }

    /// Returns the noun telling what the action was on.
    pub fn noun(&self) -> &str {
        &self.noun
    }

    /// Returns whether the noun is put in double quotes in the message.
    pub fn quotes_noun(&self) -> bool {
        self.quote_noun
    }

    /// Returns the clause following the noun, or an empty string.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Returns a reference to the underlying error, if any.
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Consumes the error and returns the underlying error, if any.
    pub fn into_cause(self) -> Option<BoxError> {
        self.cause
    }

    /// Returns the HTTP status code if the underlying error is a [`StatusError`].
    pub fn status_code(&self) -> Option<u16> {
        self.cause()
            .and_then(|cause| cause.downcast_ref::<StatusError>())
            .map(StatusError::code)
    }
}

impl fmt::Display for CannotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot {} ", self.verb)?;

        if !self.adjective.is_empty() {
            write!(f, "{} ", self.adjective)?;
        }

        if self.quote_noun {
            write!(f, "\"{}\"", self.noun)?;
        } else {
            f.write_str(&self.noun)?;
        }

        if !self.suffix.is_empty() {
            write!(f, " {}", self.suffix)?;
        }

        if let Some(cause) = self.cause() {
            write!(f, ": {}", tidy_error(cause))?;
        }

        Ok(())
    }
}

impl Error for CannotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|cause| cause as &(dyn Error + 'static))
    }
}

/// An I/O error that happened while doing an operation on a path in the filesystem.
///
/// When embedded in a [`CannotError`], only the inner I/O error's text is shown since the operation and path are
/// expected to be told by the [`CannotError`] itself.
#[derive(Debug, Error)]
#[error("{op}: {}: {source}", .path.display())]
pub struct PathError {
    op: String,
    path: PathBuf,
    source: io::Error,
}

impl PathError {
    /// Returns a new path error for the given operation, such as `"open"`, on the given path.
    pub fn new<O, P>(op: O, path: P, source: io::Error) -> Self
    where
        O: Into<String>,
        P: Into<PathBuf>,
    {
        Self {
            op: op.into(),
            path: path.into(),
            source,
        }
    }

    /// Returns the operation that failed.
    pub fn op(&self) -> &str {
        &self.op
    }

    /// Returns the path the operation was on.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Returns the underlying I/O error.
    pub fn io_error(&self) -> &io::Error {
        &self.source
    }
}

/// An error that happened while doing an operation on an URL, such as parsing it.
#[derive(Debug, Error)]
#[error("{op} \"{url}\": {source}")]
pub struct UrlError {
    op: String,
    url: String,
    source: BoxError,
}

impl UrlError {
    /// Returns a new URL error for the given operation, such as `"parse"`, on the given URL.
    pub fn new<O, U, E>(op: O, url: U, source: E) -> Self
    where
        O: Into<String>,
        U: Into<String>,
        E: Into<BoxError>,
    {
        Self {
            op: op.into(),
            url: url.into(),
            source: source.into(),
        }
    }

    /// Returns the operation that failed.
    pub fn op(&self) -> &str {
        &self.op
    }

    /// Returns the URL the operation was on.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the underlying error.
    pub fn inner(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.source.as_ref()
    }
}

/// An URL contains an ASCII control character.
///
/// URL parsers percent-encode most control characters and drop tabs and newlines, which would send the request
/// somewhere other than where the caller asked, so such URLs are refused before parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid control character in URL")]
pub struct ControlCharacterError;

#[cfg(test)]
mod tests {
    use super::{cannot, CannotError, PathError, UrlError};
    use crate::StatusError;
    use std::{error::Error, io};

    #[test]
    fn bare_verb_and_noun() {
        let err = CannotError::new("fetch", "", "the thing", false, "", None);
        assert_eq!(err.to_string(), "cannot fetch the thing");
    }

    #[test]
    fn all_parts() {
        let err = cannot("read", "hosts.txt")
            .with_adjective("file")
            .quoted()
            .with_suffix("from disk")
            .caused_by(io::Error::new(io::ErrorKind::Other, "disk on fire"));

        assert_eq!(err.to_string(), r#"cannot read file "hosts.txt" from disk: disk on fire"#);
        assert_eq!(err.verb(), "read");
        assert_eq!(err.adjective(), "file");
        assert_eq!(err.noun(), "hosts.txt");
        assert!(err.quotes_noun());
        assert_eq!(err.suffix(), "from disk");
    }

    #[test]
    fn quoted_noun_keeps_exact_characters() {
        let err = cannot("open", "a \"b\"\tc").quoted();
        assert_eq!(err.to_string(), "cannot open \"a \"b\"\tc\"");
    }

    #[test]
    fn cause_is_normalised_in_message() {
        let path_err = PathError::new(
            "open",
            "/tmp/x",
            io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        );
        let err = cannot("open", "/tmp/x").with_adjective("file").quoted().caused_by(path_err);

        assert_eq!(err.to_string(), r#"cannot open file "/tmp/x": permission denied"#);
    }

    #[test]
    fn cause_is_kept_unchanged() {
        let err = cannot("fetch", "x").caused_by(StatusError::new(404, "404 Not Found"));

        let cause = err.cause().expect("no cause");
        assert_eq!(cause.to_string(), "HTTP error 404 (Not Found)");
        assert!(err.source().expect("no source").is::<StatusError>());
        assert_eq!(err.status_code(), Some(404));

        let owned = err.into_cause().expect("no owned cause");
        assert!(owned.downcast::<StatusError>().is_ok());
    }

    #[test]
    fn no_cause() {
        let err = cannot("fetch", "x");
        assert!(err.cause().is_none());
        assert!(err.source().is_none());
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn path_error_display() {
        let err = PathError::new(
            "open",
            "/tmp/x",
            io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        );
        assert_eq!(err.to_string(), "open: /tmp/x: permission denied");
        assert_eq!(err.op(), "open");
        assert!(err.source().is_some());
    }

    #[test]
    fn url_error_display() {
        let err = UrlError::new("parse", "not a url", url::ParseError::RelativeUrlWithoutBase);
        assert_eq!(err.to_string(), r#"parse "not a url": relative URL without a base"#);
        assert_eq!(err.url(), "not a url");
    }

    #[test]
    fn errors_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CannotError>();
        assert_send_sync::<PathError>();
        assert_send_sync::<UrlError>();
    }
}
