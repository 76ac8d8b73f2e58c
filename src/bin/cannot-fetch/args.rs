use cannot::{cannot, CannotError, Cookie};
use std::str::FromStr;

/// A request header given on the command line as `Name: value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HeaderArg {
    pub name: String,
    pub value: String,
}

impl FromStr for HeaderArg {
    type Err = CannotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((name, value)) if !name.trim().is_empty() => Ok(Self {
                name: name.trim().to_string(),
                value: value.trim().to_string(),
            }),
            _ => Err(cannot("parse", s).with_adjective("header").quoted().with_suffix("as \"Name: value\"")),
        }
    }
}

/// A cookie given on the command line as `name=value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CookieArg(pub Cookie);

impl FromStr for CookieArg {
    type Err = CannotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, value)) if !name.is_empty() => Ok(Self(Cookie::new(name, value))),
            _ => Err(cannot("parse", s).with_adjective("cookie").quoted().with_suffix("as \"name=value\"")),
        }
    }
}
