//! Readable errors for command-line programs, and simple blocking HTTP retrieval that uses them.
//!
//! The centrepiece is [`CannotError`], an error whose message reads like
//! ```text
//! cannot fetch "https://example.com/hosts": HTTP error 404 (Not Found)
//! ```
//! It is built from a verb, an optional adjective, a noun (optionally in double quotes), an optional suffix and an
//! optional underlying cause. The cause is kept as-is for inspection, but its text is cleaned up with [`tidy_error`]
//! before it is put in the message, so the user doesn't see the terse texts some errors have.
//!
//! [`get_via_http`] and [`head_via_http`] make simple GET and HEAD requests and report any failure as a
//! [`CannotError`]. A response whose status code is not 2xx is reported with a [`StatusError`] as the cause:
//! ```no_run
//! let err = cannot::get_via_http("https://example.com/missing", "", None, &[]).unwrap_err();
//! if err.status_code() == Some(404) {
//!     eprintln!("{}", err);
//! }
//! ```
//! Use a [`Fetcher`] with a configured [`ureq::Agent`] to control the transport, for example its timeouts.

mod error;
mod http;
mod status;
mod tidy;

pub use error::{cannot, BoxError, CannotError, ControlCharacterError, PathError, Result, UrlError};
pub use http::{get_via_http, head_via_http, is_http_error, Cookie, Fetcher, Headers, Metadata};
pub use status::StatusError;
pub use tidy::tidy_error;
