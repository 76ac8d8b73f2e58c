use crate::{
    error::{cannot, BoxError, CannotError, ControlCharacterError, UrlError},
    status::StatusError,
    Result,
};
use lazy_static::lazy_static;
use log::*;
use std::{collections::BTreeMap, fmt, io::Read};
use ureq::{Agent, Request, Response};
use url::Url;

/// Request headers: each header name maps to one or more values, all of which are sent.
pub type Headers = BTreeMap<String, Vec<String>>;

lazy_static! {
    static ref DEFAULT_AGENT: Agent = ureq::agent();
}

/// A cookie to send along with a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Cookie {
    /// The cookie's name.
    pub name: String,
    /// The cookie's value.
    pub value: String,
}

impl Cookie {
    /// Returns a new cookie with the given name and value.
    pub fn new<N, V>(name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// The status and headers of a response to a HEAD request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    url: String,
    status: u16,
    status_text: String,
    headers: Vec<(String, Vec<String>)>,
}

impl Metadata {
    fn from_response(response: &Response) -> Self {
        let mut headers: Vec<(String, Vec<String>)> = Vec::new();
        for name in response.headers_names() {
            if headers.iter().any(|(existing, _)| existing.eq_ignore_ascii_case(&name)) {
                continue;
            }

            let values = response.all(&name).into_iter().map(str::to_string).collect();
            headers.push((name, values));
        }

        Self {
            url: response.get_url().to_string(),
            status: response.status(),
            status_text: response.status_text().to_string(),
            headers,
        }
    }

    /// Returns the URL the response came from, after any redirects the transport followed.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the response's status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns the response's status text, such as `OK`.
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Returns the first value of the given header. Header names are matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.all(name).into_iter().next()
    }

    /// Returns every value of the given header. Header names are matched case-insensitively.
    pub fn all(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(header, _)| header.eq_ignore_ascii_case(name))
            .flat_map(|(_, values)| values.iter().map(String::as_str))
            .collect()
    }

    /// Returns an iterator over every header name and its values, in the order the server sent them.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.headers.iter().map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Returns the length of the content as told by the `Content-Length` header, if present and valid.
    pub fn content_length(&self) -> Option<u64> {
        self.header("content-length").and_then(|len| len.parse().ok())
    }
}

/// Makes blocking HTTP requests with a given [`Agent`].
///
/// The agent carries the transport's configuration, such as its timeouts. Configure it once and share the fetcher
/// between threads as needed; cloning a fetcher is cheap and clones share the agent's connection pool. A
/// [default](Fetcher::default) fetcher uses a process-wide agent with `ureq`'s default configuration.
#[derive(Clone)]
pub struct Fetcher {
    agent: Agent,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new(DEFAULT_AGENT.clone())
    }
}

impl Fetcher {
    /// Returns a new fetcher that makes its requests with the given agent.
    pub fn new(agent: Agent) -> Self {
        Self { agent }
    }

    /// Performs a GET request and returns the body of the response.
    ///
    /// The label describes what is being fetched and is used in error messages. If it is empty, the URL is used in
    /// its place, in double quotes.
    ///
    /// # Errors
    ///
    /// Returns a [`CannotError`] if:
    /// - The URL can't be parsed: `cannot parse URL "<url>": <cause>`
    /// - The request fails, or the response's status is not 2xx: `cannot fetch <label>: <cause>`, where the cause is
    ///   a [`StatusError`] for an unsuccessful status.
    /// - Reading the response body fails: `cannot read <label> from network: <cause>`
    pub fn get(&self, url: &str, label: &str, headers: Option<&Headers>, cookies: &[Cookie]) -> Result<Vec<u8>> {
        let (noun, quote_noun) = noun_for(url, label);
        let request = self.new_request("GET", url, headers, cookies)?;

        debug!("GET {}", url);
        let response = call(request).map_err(|e| failure("fetch", noun, quote_noun, e))?;
        debug!("Got response status {} from {}", response.status(), url);

        let mut body = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut body)
            .map_err(|e| failure("read", noun, quote_noun, e.into()).with_suffix("from network"))?;

        debug!("Read {} bytes from {}", body.len(), url);
        Ok(body)
    }

    /// Performs a HEAD request and returns the response's status and headers.
    ///
    /// The label is treated the same as in [`get`](Fetcher::get).
    ///
    /// # Errors
    ///
    /// Returns a [`CannotError`] if:
    /// - The URL can't be parsed: `cannot parse URL "<url>": <cause>`
    /// - The request fails, or the response's status is not 2xx: `cannot get HEADers for <label>: <cause>`, where the
    ///   cause is a [`StatusError`] for an unsuccessful status.
    pub fn head(&self, url: &str, label: &str, headers: Option<&Headers>, cookies: &[Cookie]) -> Result<Metadata> {
        let (noun, quote_noun) = noun_for(url, label);
        let request = self.new_request("HEAD", url, headers, cookies)?;

        debug!("HEAD {}", url);
        let response = call(request).map_err(|e| failure("get HEADers for", noun, quote_noun, e))?;
        debug!("Got response status {} from {}", response.status(), url);

        let metadata = Metadata::from_response(&response);
        drop(response);

        Ok(metadata)
    }

    fn new_request(&self, method: &str, url: &str, headers: Option<&Headers>, cookies: &[Cookie]) -> Result<Request> {
        let parsed = parse_url(url).map_err(|e| {
            cannot("parse", url)
                .with_adjective("URL")
                .quoted()
                .caused_by(UrlError::new("parse", url, e))
        })?;

        let request = merge_headers(headers, cookies)
            .into_iter()
            .fold(self.agent.request_url(method, &parsed), |request, (name, value)| {
                request.set(&name, &value)
            });

        Ok(request)
    }
}

/// Performs a GET request with the default [`Fetcher`] and returns the body of the response. See [`Fetcher::get`].
pub fn get_via_http(url: &str, label: &str, headers: Option<&Headers>, cookies: &[Cookie]) -> Result<Vec<u8>> {
    Fetcher::default().get(url, label, headers, cookies)
}

/// Performs a HEAD request with the default [`Fetcher`] and returns the response's status and headers. See
/// [`Fetcher::head`].
pub fn head_via_http(url: &str, label: &str, headers: Option<&Headers>, cookies: &[Cookie]) -> Result<Metadata> {
    Fetcher::default().head(url, label, headers, cookies)
}

/// Returns whether the given HTTP status code counts as an error. Anything outside the 2xx range does.
pub fn is_http_error(code: u16) -> bool {
    code / 100 != 2
}

fn parse_url(url: &str) -> std::result::Result<Url, BoxError> {
    if url.chars().any(|c| c.is_ascii_control()) {
        return Err(ControlCharacterError.into());
    }

    Ok(Url::parse(url)?)
}

fn noun_for<'a>(url: &'a str, label: &'a str) -> (&'a str, bool) {
    if label.is_empty() {
        (url, true)
    } else {
        (label, false)
    }
}

fn failure(verb: &str, noun: &str, quote_noun: bool, cause: BoxError) -> CannotError {
    CannotError::new(verb, "", noun, quote_noun, "", Some(cause))
}

// the response is dropped, and with it its body, whenever its status is an error
fn call(request: Request) -> std::result::Result<Response, BoxError> {
    match request.call() {
        Ok(response) if is_http_error(response.status()) => Err(StatusError::from_response(&response).into()),
        Ok(response) => Ok(response),
        Err(ureq::Error::Status(_, response)) => Err(StatusError::from_response(&response).into()),
        Err(ureq::Error::Transport(transport)) => Err(transport.into()),
    }
}

// the transport keeps a single value per header name, so repeated values are folded into one comma-separated field
// and cookies into one semicolon-separated Cookie field
fn merge_headers(headers: Option<&Headers>, cookies: &[Cookie]) -> Vec<(String, String)> {
    let mut merged: Vec<(String, Vec<String>)> = Vec::new();
    let cookie_values = cookies.iter().map(Cookie::to_string).collect::<Vec<_>>();
    let supplied = headers
        .into_iter()
        .flatten()
        .map(|(name, values)| (name.as_str(), values.clone()))
        .chain(Some(("Cookie", cookie_values)));

    for (name, values) in supplied {
        if values.is_empty() {
            continue;
        }

        match merged.iter_mut().find(|(existing, _)| existing.eq_ignore_ascii_case(name)) {
            Some((_, existing)) => existing.extend(values),
            None => merged.push((name.to_string(), values)),
        }
    }

    merged
        .into_iter()
        .map(|(name, values)| {
            let separator = if name.eq_ignore_ascii_case("cookie") { "; " } else { ", " };
            let value = values.join(separator);
            (name, value)
        })
        .collect()
}
