//! Command-line front end for `please`.
//!
//! Examples:
//! ```bash
//! please GET https://httpbin.org/get -q hey=listen -q pi=3
//! please POST https://httpbin.org/post --json '{"6x9": "42"}' --fail
//! please POST https://httpbin.org/post --form time=money --form k=a --form k=b
//! please POST https://httpbin.org/post -F x=y -F file=@notes.txt
//! please -i HEAD https://httpbin.org/status/418
//! ```
//!
//! Logging goes to stderr; set `-v`/`-vv` or `RUST_LOG=please=debug`.

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use log::LevelFilter;
use please::{Auth, Form, MultipartForm, RequestFactory};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// HTTP method, e.g. GET, POST or PATCH
    method: String,

    /// Target URL (relative URLs use the configured base URL)
    url: String,

    /// Request header as `Name: value`
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    headers: Vec<String>,

    /// Query parameter as `key=value`
    #[arg(short = 'q', long = "query", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// Raw text body
    #[arg(long, conflicts_with_all = ["json", "form", "multipart"])]
    data: Option<String>,

    /// JSON body (validated before sending)
    #[arg(long, conflicts_with_all = ["form", "multipart"])]
    json: Option<String>,

    /// Url-encoded form field as `key=value`
    #[arg(long = "form", value_name = "KEY=VALUE", conflicts_with = "multipart")]
    form: Vec<String>,

    /// Multipart field as `name=value`, or `name=@path` for a file
    #[arg(short = 'F', long = "multipart", value_name = "NAME=VALUE")]
    multipart: Vec<String>,

    /// Basic credentials as `user:password`
    #[arg(short = 'u', long, conflicts_with = "bearer")]
    user: Option<String>,

    /// Bearer token
    #[arg(long)]
    bearer: Option<String>,

    /// Skip TLS certificate verification
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Request timeout in milliseconds
    #[arg(long, value_name = "MS")]
    timeout: Option<u64>,

    /// JSON settings file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Fail unless the response status is 2xx
    #[arg(short = 'f', long)]
    fail: bool,

    /// Print the status line and headers before the body
    #[arg(short = 'i', long)]
    include: bool,

    /// Increase log verbosity: -v = Info, -vv = Debug, -vvv = Trace
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Info);
        }
        2 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    let _ = builder.try_init();
}

fn split_pair<'a>(raw: &'a str, sep: char, what: &str) -> Result<(&'a str, &'a str)> {
    match raw.split_once(sep) {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => bail!("invalid {} '{}': expected a '{}' separator", what, raw, sep),
    }
}

fn build_multipart(fields: &[String]) -> Result<MultipartForm> {
    let mut form = MultipartForm::new();
    for raw in fields {
        let (name, value) = split_pair(raw, '=', "multipart field")?;
        form = match value.strip_prefix('@') {
            Some(path) => form.file(name, path),
            None => form.field(name, value),
        };
    }
    Ok(form)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => please::config::load_config_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => please::config::get_config(),
    };
    if let Some(timeout) = cli.timeout {
        config.timeout = timeout;
    }
    config.validate().map_err(anyhow::Error::msg)?;

    let factory = RequestFactory::from_config(&config);
    let mut request = factory
        .request(&cli.method.to_uppercase(), &cli.url)
        .verify_certificates(config.verify_certificates && !cli.insecure);

    if let Some(timeout) = cli.timeout {
        request = request.timeout(Duration::from_millis(timeout));
    }

    for raw in &cli.headers {
        let (name, value) = split_pair(raw, ':', "header")?;
        request = request.header(name, value.trim());
    }

    for raw in &cli.params {
        let (key, value) = split_pair(raw, '=', "query parameter")?;
        request = request.parameter(key, value);
    }

    if let Some(pair) = &cli.user {
        request = request.auth(Auth::from_user_pass(pair));
    } else if let Some(token) = &cli.bearer {
        request = request.bearer_auth(token);
    }

    if let Some(data) = cli.data {
        request = request.body_text(data);
    } else if let Some(json) = &cli.json {
        let value: serde_json::Value =
            serde_json::from_str(json).context("--json is not valid JSON")?;
        request = request.json(&value);
    } else if !cli.form.is_empty() {
        let mut form = Form::new();
        for raw in &cli.form {
            let (key, value) = split_pair(raw, '=', "form field")?;
            form = form.add(key, value);
        }
        request = request.form(form);
    } else if !cli.multipart.is_empty() {
        request = request.multipart(build_multipart(&cli.multipart)?);
    }

    let mut response = if cli.fail {
        request.send_and_verify().await
    } else {
        request.send().await
    }
    .with_context(|| format!("{} {}", cli.method, cli.url))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.include {
        response.dump(&mut out)?;
        writeln!(out)?;
    }

    let body = response.bytes().await?;
    out.write_all(&body)?;
    out.flush()?;
    Ok(())
}
