use cannot::{Cookie, Headers};
use serde::{Deserialize, Serialize};

// plain values before tables, the TOML serialiser refuses them in the other order
#[derive(Debug, Serialize, Deserialize, Default)]
pub(crate) struct Config {
    /// Value for the User-Agent header. Uses the transport's default if unset.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Connect timeout in milliseconds. Uses the transport's default if unset.
    #[serde(default)]
    pub connect_timeout: Option<u64>,
    /// Read timeout in milliseconds. Uses the transport's default if unset.
    #[serde(default)]
    pub read_timeout: Option<u64>,
    #[serde(default)]
    pub cookies: Vec<Cookie>,
    #[serde(default)]
    pub headers: Headers,
}
