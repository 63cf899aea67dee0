//! Rendering a result map for the shell or for tools

use std::fmt::Write as _;
use std::string::FromUtf8Error;

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use thiserror::Error;

use crate::aggregator::ResultMap;
use crate::types::OutputMode;

/// `strftime` pattern of the header timestamp
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Indent used for JSON output
pub const JSON_INDENT: &[u8] = b"   ";

pub const TITLE: &str = "awsenvsec";
pub const DESCRIPTION: &str =
    "Retrieve AWS Secrets as Environment Variables from Secrets Manager and/or Parameter Store";

/// Errors while rendering
#[derive(Error, Debug)]
pub enum PresentError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Rendered output is not UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

pub type PresentResult<T> = Result<T, PresentError>;

/// Format a point in time the way headers show it
pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// `# Environment Variables: <timestamp>`
pub fn header(timestamp: &str) -> String {
    format!("# Environment Variables: {}", timestamp)
}

/// Title block shown when running with an explicit output mode
pub fn banner(timestamp: &str) -> String {
    let rule = "-".repeat(102);
    format!(
        "{rule}\nScript: {}\nDescription: {}\nDate: {}\n{rule}\n",
        TITLE,
        DESCRIPTION,
        timestamp,
        rule = rule
    )
}

/// `export KEY=$"value"` per entry, no header
pub fn render_export(map: &ResultMap) -> String {
    let mut out = String::new();
    for (key, value) in map.iter() {
        let _ = writeln!(out, "export {}=$\"{}\"", key, value);
    }
    out
}

/// Header, blank line, then `KEY="value"` sorted by key
pub fn render_env(map: &ResultMap, timestamp: &str) -> String {
    let mut out = format!("{}\n\n", header(timestamp));
    for (key, value) in map.iter() {
        let _ = writeln!(out, "{}=\"{}\"", key, value);
    }
    out
}

/// Header, blank line, then the map as JSON indented by three spaces
pub fn render_json(map: &ResultMap, timestamp: &str) -> PresentResult<String> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(JSON_INDENT));
    map.serialize(&mut serializer)?;
    let body = String::from_utf8(buf)?;
    Ok(format!("{}\n\n{}\n", header(timestamp), body))
}

/// Renders result maps in one output mode with a fixed timestamp
///
/// # Example
///
/// ```
/// use awsenvsec_core::aggregator::ResultMap;
/// use awsenvsec_core::presenter::Presenter;
/// use awsenvsec_core::types::{NormalizedPair, OutputMode};
///
/// let map: ResultMap = vec![NormalizedPair::new("DB_HOST", "db.internal")].into_iter().collect();
/// let out = Presenter::new(OutputMode::Env, "2024-01-02 03:04:05").render(&map).unwrap();
/// assert_eq!(out, "# Environment Variables: 2024-01-02 03:04:05\n\nDB_HOST=\"db.internal\"\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presenter {
    mode: OutputMode,
    timestamp: String,
}

impl Presenter {
    pub fn new(mode: OutputMode, timestamp: impl Into<String>) -> Self {
        Self {
            mode,
            timestamp: timestamp.into(),
        }
    }

    /// Presenter stamped with the current local time
    pub fn now(mode: OutputMode) -> Self {
        Self::new(mode, format_timestamp(&Local::now()))
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Banner for modes that print a header, `None` otherwise
    pub fn banner(&self) -> Option<String> {
        self.mode.has_header().then(|| banner(&self.timestamp))
    }

    pub fn render(&self, map: &ResultMap) -> PresentResult<String> {
        match self.mode {
            OutputMode::Export => Ok(render_export(map)),
            OutputMode::Env => Ok(render_env(map, &self.timestamp)),
            OutputMode::Json => render_json(map, &self.timestamp),
        }
    }
}
