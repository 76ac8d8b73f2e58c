use thiserror::Error;

/// An HTTP response whose status code is not a success (2xx).
///
/// The message is of the form `HTTP error <code> (<text>)`. Servers often repeat the status code at the start of the
/// status text, so a leading `"<code> "` is left out of the text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("HTTP error {code} ({})", strip_code(.code, .text))]
pub struct StatusError {
    code: u16,
    text: String,
}

impl StatusError {
    /// Returns a new status error from a status code and the server's status text.
    pub fn new<S>(code: u16, text: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            code,
            text: text.into(),
        }
    }

    /// Returns a new status error with the code and status text of the given response.
    pub fn from_response(response: &ureq::Response) -> Self {
        Self::new(response.status(), response.status_text())
    }

    /// Returns the HTTP status code.
    pub fn code(&self) -> u16 {
        self.code
    }

    /// Returns the status text as given by the server.
    pub fn text(&self) -> &str {
        &self.text
    }
}

fn strip_code<'a>(code: &u16, text: &'a str) -> &'a str {
    let prefix = format!("{} ", code);
    text.strip_prefix(prefix.as_str()).unwrap_or(text)
}
