use crate::error::{PathError, UrlError};
use std::{error::Error, io};

/// The tag some URL parsers put in front of their error messages.
const URL_PACKAGE_TAG: &str = "net/url";
/// The prefix some archive readers put in front of their error messages.
const ARCHIVE_PREFIX: &str = "zip: ";

type Tidier = fn(&(dyn Error + 'static)) -> Option<String>;

// tried in order, first match wins
const TIDIERS: &[Tidier] = &[tidy_path_error, tidy_url_error, tidy_io_error, tidy_archive_error];

/// Returns the message text of the given error, cleaned up for users of command-line programs.
///
/// This is the same as the error's [`Display`](std::fmt::Display) text, except for a few recognised cases:
/// - A [`PathError`] gives only its inner I/O error's text, since whoever embeds it is expected to tell the operation
///   and the path themselves.
/// - An [`UrlError`] from parsing gives only its inner error's text, minus a leading URL package tag.
/// - An [`io::Error`] wrapping another error is tidied as that inner error.
/// - Archive errors lose their leading `zip: `.
///
/// Anything else is passed through unchanged.
pub fn tidy_error(err: &(dyn Error + 'static)) -> String {
    TIDIERS
        .iter()
        .find_map(|tidy| tidy(err))
        .unwrap_or_else(|| err.to_string())
}

fn tidy_path_error(err: &(dyn Error + 'static)) -> Option<String> {
    let path_err = err.downcast_ref::<PathError>()?;
    Some(path_err.io_error().to_string())
}

fn tidy_url_error(err: &(dyn Error + 'static)) -> Option<String> {
    let url_err = err.downcast_ref::<UrlError>()?;
    if url_err.op() != "parse" {
        return None;
    }

    let text = url_err.inner().to_string();
    // only the tag goes, the separator stays
    match text.strip_prefix(URL_PACKAGE_TAG) {
        Some(rest) if rest.starts_with(": ") => Some(rest.to_string()),
        _ => Some(text),
    }
}

fn tidy_io_error(err: &(dyn Error + 'static)) -> Option<String> {
    let inner = err.downcast_ref::<io::Error>()?.get_ref()?;
    Some(tidy_error(inner))
}

fn tidy_archive_error(err: &(dyn Error + 'static)) -> Option<String> {
    err.to_string().strip_prefix(ARCHIVE_PREFIX).map(str::to_string)
}
