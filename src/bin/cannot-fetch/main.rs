mod args;
mod config;
mod logging;

use args::{CookieArg, HeaderArg};
use cannot::{cannot, Cookie, Fetcher, Headers, Metadata, PathError};
use config::Config;
use log::*;
use num_format::{SystemLocale, ToFormattedString};
use std::{
    fs::File,
    io::{self, Write},
    path::{Path, PathBuf},
    time::Duration,
};
use structopt::StructOpt;

const APP_NAME: &str = env!("CARGO_PKG_NAME");

#[derive(Debug, StructOpt)]
#[structopt(name = "cannot-fetch", author, about)]
struct Opt {
    /// Enable verbose logging
    #[structopt(short, long)]
    verbose: bool,
    /// Custom path to the app's configuration file. By default the app will use the system-specific user configuration
    /// directory.
    #[structopt(short, long)]
    config: Option<PathBuf>,
    /// Only request the response's status and headers with a HEAD request, and print them.
    #[structopt(long)]
    head: bool,
    /// What is being fetched, used in error messages. Defaults to the URL in quotes.
    #[structopt(short, long)]
    label: Option<String>,
    /// Add a request header in the form "Name: value". May be given multiple times.
    #[structopt(short = "H", long = "header", number_of_values = 1)]
    headers: Vec<HeaderArg>,
    /// Add a cookie in the form "name=value". May be given multiple times.
    #[structopt(short = "b", long = "cookie", number_of_values = 1)]
    cookies: Vec<CookieArg>,
    /// Write the fetched body into this file instead of standard output.
    #[structopt(short, long)]
    output: Option<PathBuf>,
    /// The timeout to wait for the connection to succeed in milliseconds. Overrides the configured timeout.
    #[structopt(short, long)]
    timeout: Option<u64>,
    /// The URL to fetch.
    url: String,
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();

    setup_logging(&opt)?;
    let cfg = load_config(&opt)?;

    debug!("{:?}", opt);
    debug!("{:?}", cfg);

    let fetcher = Fetcher::new(build_agent(&opt, &cfg));
    let headers = request_headers(&opt, &cfg);
    let cookies = request_cookies(&opt, &cfg);
    let label = opt.label.as_deref().unwrap_or("");

    if opt.head {
        let metadata = fetcher.head(&opt.url, label, Some(&headers), &cookies)?;
        print_metadata(&metadata)?;
    } else {
        let body = fetcher.get(&opt.url, label, Some(&headers), &cookies)?;
        write_body(opt.output.as_deref(), &body)?;

        let locale = SystemLocale::default()?;
        info!(
            "Fetched {} bytes from {}",
            body.len().to_formatted_string(&locale),
            opt.url
        );
    }

    Ok(())
}

fn setup_logging(opt: &Opt) -> anyhow::Result<()> {
    logging::setup_logging(if opt.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    })?;
    Ok(())
}

fn load_config(opt: &Opt) -> anyhow::Result<Config> {
    Ok(match opt.config.as_deref() {
        Some(path) => confy::load_path(path)?,
        None => confy::load(APP_NAME)?,
    })
}

fn build_agent(opt: &Opt, cfg: &Config) -> ureq::Agent {
    let mut builder = ureq::AgentBuilder::new();

    if let Some(timeout) = opt.timeout.or(cfg.connect_timeout) {
        builder = builder.timeout_connect(Duration::from_millis(timeout));
    }

    if let Some(timeout) = cfg.read_timeout {
        builder = builder.timeout_read(Duration::from_millis(timeout));
    }

    if let Some(user_agent) = &cfg.user_agent {
        builder = builder.user_agent(user_agent);
    }

    builder.build()
}

// configured headers first, then the ones from the command line
fn request_headers(opt: &Opt, cfg: &Config) -> Headers {
    let mut headers = cfg.headers.clone();
    for HeaderArg { name, value } in &opt.headers {
        headers.entry(name.clone()).or_default().push(value.clone());
    }
    headers
}

fn request_cookies(opt: &Opt, cfg: &Config) -> Vec<Cookie> {
    cfg.cookies
        .iter()
        .cloned()
        .chain(opt.cookies.iter().map(|CookieArg(cookie)| cookie.clone()))
        .collect()
}

fn write_body(output: Option<&Path>, body: &[u8]) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let noun = path.display().to_string();
            let mut file = File::create(path).map_err(|e| {
                cannot("create", noun.as_str())
                    .with_adjective("file")
                    .quoted()
                    .caused_by(PathError::new("open", path, e))
            })?;

            file.write_all(body).map_err(|e| {
                cannot("write", noun.as_str())
                    .with_adjective("file")
                    .quoted()
                    .caused_by(PathError::new("write", path, e))
            })?;

            debug!("Wrote body into {}", noun);
        }
        None => {
            io::stdout()
                .lock()
                .write_all(body)
                .map_err(|e| cannot("write", "standard output").caused_by(e))?;
        }
    }

    Ok(())
}

fn print_metadata(metadata: &Metadata) -> anyhow::Result<()> {
    if let Some(len) = metadata.content_length() {
        debug!("{} reports a content length of {}", metadata.url(), len);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let write_err = |e| cannot("write", "standard output").caused_by::<io::Error>(e);

    writeln!(out, "{} {}", metadata.status(), metadata.status_text()).map_err(write_err)?;
    for (name, values) in metadata.headers() {
        for value in values {
            writeln!(out, "{}: {}", name, value).map_err(write_err)?;
        }
    }

    Ok(())
}
