//! Logging configuration document and sink descriptors
//!
//! The on-disk document looks like:
//!
//! ```yaml
//! logging:            # `loguru` is accepted as an alias
//!   handlers:
//!     - sink: stdout
//!       level: INFO
//!       format: "{time:YYYY-MM-DD HH:mm:ss} | {level: <8} | {message}"
//!     - sink: logs/app.log
//!       level: DEBUG
//!       rotation: "10 MB"
//!       retention: "10 days"
//!       compression: gz
//!       backtrace: true
//!       diagnose: false
//!   json_handler:
//!     sink: logs/app.json
//!     rotation: "1 day"
//! ```
//!
//! Each entry becomes a [`SinkSpec`] through [`SinkSpecBuilder`].

use chrono::{Duration, NaiveTime};
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{warn, Level};

use super::levels::{level_from_name, DEFAULT_LEVEL};
use crate::domain::models::ConfigDocument;

/// Token in a sink path replaced by the start-up timestamp.
pub const TIME_TOKEN: &str = "{time}";

/// Errors turning a handler entry into a sink descriptor
#[derive(Debug, Error)]
pub enum SinkConfigError {
    #[error("Malformed logging configuration: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Invalid rotation '{0}'. Use a size (\"10 MB\"), an interval (\"1 day\") or a time (\"00:00\")")]
    InvalidRotation(String),

    #[error("Invalid retention '{0}'. Use a file count (5) or a duration (\"10 days\")")]
    InvalidRetention(String),

    #[error("Handler sink cannot be empty")]
    EmptySink,
}

/// A number or a string in the document (`rotation: 1048576` vs `rotation: "1 MB"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(u64),
    Text(String),
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Top level of the logging configuration document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingDocument {
    #[serde(default, alias = "loguru")]
    pub logging: Option<LoggingSection>,
}

/// Handler list plus the optional structured sink
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSection {
    #[serde(default)]
    pub handlers: Vec<HandlerEntry>,

    #[serde(default)]
    pub json_handler: Option<HandlerEntry>,
}

/// One entry of the `handlers` list, as written in the file
#[derive(Debug, Clone, Deserialize)]
pub struct HandlerEntry {
    pub sink: String,

    #[serde(default)]
    pub level: Option<Scalar>,

    #[serde(default)]
    pub format: Option<String>,

    #[serde(default)]
    pub rotation: Option<Scalar>,

    #[serde(default)]
    pub retention: Option<Scalar>,

    #[serde(default)]
    pub compression: Option<String>,

    #[serde(default)]
    pub backtrace: bool,

    #[serde(default)]
    pub diagnose: bool,

    #[serde(default)]
    pub serialize: bool,
}

impl LoggingDocument {
    pub fn from_document(doc: ConfigDocument) -> Result<Self, SinkConfigError> {
        Ok(serde_json::from_value(Value::Object(doc))?)
    }

    /// Sink descriptors in registration order: every handler, then the
    /// structured sink. `None` when the document has no logging section.
    pub fn sink_specs(&self) -> Result<Option<Vec<SinkSpec>>, SinkConfigError> {
        let Some(section) = &self.logging else {
            return Ok(None);
        };

        let mut specs = section
            .handlers
            .iter()
            .map(|h| h.to_spec(false))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(json) = &section.json_handler {
            specs.push(json.to_spec(true)?);
        }

        Ok(Some(specs))
    }
}

impl HandlerEntry {
    /// Build the descriptor. `forced_json` ignores `format` and serializes
    /// every record.
    pub fn to_spec(&self, forced_json: bool) -> Result<SinkSpec, SinkConfigError> {
        let sink = self.sink.trim();
        if sink.is_empty() {
            return Err(SinkConfigError::EmptySink);
        }

        let target = SinkTarget::parse(sink);
        let templated = !target.is_console() && sink.contains(TIME_TOKEN);

        let mut builder = SinkSpec::builder(target)
            .level(self.level.as_ref().map_or(DEFAULT_LEVEL, level_from_scalar))
            .backtrace(self.backtrace)
            .diagnose(self.diagnose)
            .serialize(forced_json || self.serialize);

        if templated {
            builder = builder.path_template(sink);
        }
        if !forced_json {
            if let Some(format) = &self.format {
                builder = builder.format(format.clone());
            }
        }
        if let Some(rotation) = &self.rotation {
            builder = builder.rotation(Rotation::parse(rotation)?);
        }
        if let Some(retention) = &self.retention {
            builder = builder.retention(Retention::parse(retention)?);
        }
        if let Some(scheme) = &self.compression {
            match Compression::parse(scheme) {
                Some(compression) => builder = builder.compression(compression),
                None => warn!(sink, scheme = %scheme, "Unsupported compression; rotated files stay uncompressed"),
            }
        }

        Ok(builder.build())
    }
}

/// Numeric severities follow the 5/10/20/25/30/40/50 ladder.
fn level_from_scalar(level: &Scalar) -> Level {
    match level {
        Scalar::Text(name) => level_from_name(name),
        Scalar::Int(n) => match n {
            0..=5 => Level::TRACE,
            6..=10 => Level::DEBUG,
            11..=25 => Level::INFO,
            26..=30 => Level::WARN,
            _ => Level::ERROR,
        },
    }
}

/// Destination of one sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkTarget {
    Stdout,
    Stderr,
    File(PathBuf),
}

impl SinkTarget {
    /// Stream aliases map to the console; anything else is a file path.
    ///
    /// `{time}` in a path is replaced by the current local timestamp.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "stdout" | "sys.stdout" | "ext://sys.stdout" => Self::Stdout,
            "stderr" | "sys.stderr" | "ext://sys.stderr" => Self::Stderr,
            _ => {
                let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
                Self::File(PathBuf::from(raw.trim().replace(TIME_TOKEN, &stamp)))
            }
        }
    }

    pub const fn is_console(&self) -> bool {
        matches!(self, Self::Stdout | Self::Stderr)
    }
}

impl std::fmt::Display for SinkTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdout => f.write_str("stdout"),
            Self::Stderr => f.write_str("stderr"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// When a file sink starts a new file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// Once the file would exceed this many bytes
    Size(u64),
    /// After the file has been open this long
    Every(Duration),
    /// Each day at this local time
    DailyAt(NaiveTime),
}

impl Rotation {
    pub fn parse(raw: &Scalar) -> Result<Self, SinkConfigError> {
        let invalid = || SinkConfigError::InvalidRotation(raw.to_string());
        match raw {
            Scalar::Int(0) => Err(invalid()),
            Scalar::Int(bytes) => Ok(Self::Size(*bytes)),
            Scalar::Text(text) => parse_size(text)
                .map(Self::Size)
                .or_else(|| parse_time_of_day(text).map(Self::DailyAt))
                .or_else(|| parse_duration(text).map(Self::Every))
                .ok_or_else(invalid),
        }
    }
}

/// Which rotated files are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    /// Newest N rotated files
    Count(usize),
    /// Rotated files younger than this
    Age(Duration),
}

impl Retention {
    pub fn parse(raw: &Scalar) -> Result<Self, SinkConfigError> {
        let invalid = || SinkConfigError::InvalidRetention(raw.to_string());
        match raw {
            Scalar::Int(count) => usize::try_from(*count).map(Self::Count).map_err(|_| invalid()),
            Scalar::Text(text) => text
                .trim()
                .parse::<usize>()
                .ok()
                .map(Self::Count)
                .or_else(|| parse_duration(text).map(Self::Age))
                .ok_or_else(invalid),
        }
    }
}

/// Compression applied to rotated files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Gzip,
}

impl Compression {
    /// `None` for schemes this crate cannot write.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "gz" | "gzip" => Some(Self::Gzip),
            _ => None,
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Gzip => "gz",
        }
    }
}

/// Descriptor for one logging destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkSpec {
    pub target: SinkTarget,
    /// Records below this level are dropped
    pub level: Level,
    /// Template for plain-text records; `None` uses the default layout
    pub format: Option<String>,
    /// Emit every record as one JSON object
    pub serialize: bool,
    pub rotation: Option<Rotation>,
    pub retention: Option<Retention>,
    pub compression: Option<Compression>,
    /// Append a captured stack trace to ERROR records
    pub backtrace: bool,
    /// Append field values and the active span chain to every record
    pub diagnose: bool,
    /// File path as written, kept when it contains `{time}` so retention
    /// also covers files opened by earlier runs
    pub path_template: Option<String>,
}

impl SinkSpec {
    pub const fn builder(target: SinkTarget) -> SinkSpecBuilder {
        SinkSpecBuilder::new(target)
    }

    /// The fallback sink: stdout at the default level.
    pub fn console() -> Self {
        SinkSpecBuilder::new(SinkTarget::Stdout).build()
    }
}

/// Builder enumerating every sink option.
///
/// Defaults: level INFO, default text layout, no rotation, retention or
/// compression, both diagnostic flags off.
#[derive(Debug, Clone)]
pub struct SinkSpecBuilder {
    spec: SinkSpec,
}

impl SinkSpecBuilder {
    pub const fn new(target: SinkTarget) -> Self {
        Self {
            spec: SinkSpec {
                target,
                level: DEFAULT_LEVEL,
                format: None,
                serialize: false,
                rotation: None,
                retention: None,
                compression: None,
                backtrace: false,
                diagnose: false,
                path_template: None,
            },
        }
    }

    pub fn level(mut self, level: Level) -> Self {
        self.spec.level = level;
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.spec.format = Some(format.into());
        self
    }

    pub fn serialize(mut self, serialize: bool) -> Self {
        self.spec.serialize = serialize;
        self
    }

    /// Only meaningful for file targets.
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.spec.rotation = Some(rotation);
        self
    }

    /// Applied after each rotation.
    pub fn retention(mut self, retention: Retention) -> Self {
        self.spec.retention = Some(retention);
        self
    }

    pub fn compression(mut self, compression: Compression) -> Self {
        self.spec.compression = Some(compression);
        self
    }

    pub fn backtrace(mut self, backtrace: bool) -> Self {
        self.spec.backtrace = backtrace;
        self
    }

    pub fn diagnose(mut self, diagnose: bool) -> Self {
        self.spec.diagnose = diagnose;
        self
    }

    pub fn path_template(mut self, template: impl Into<String>) -> Self {
        self.spec.path_template = Some(template.into());
        self
    }

    pub fn build(self) -> SinkSpec {
        self.spec
    }
}

/// Leading integer and the lowercased remainder: `"10 MB"` -> `(10, "mb")`.
fn split_quantity(text: &str) -> Option<(u64, String)> {
    let text = text.trim();
    let digits_end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    if digits_end == 0 {
        return None;
    }
    let amount = text[..digits_end].parse().ok()?;
    Some((amount, text[digits_end..].trim().to_ascii_lowercase()))
}

fn parse_size(text: &str) -> Option<u64> {
    let (amount, unit) = split_quantity(text)?;
    let multiplier: u64 = match unit.as_str() {
        "b" => 1,
        "kb" => 1_000,
        "mb" => 1_000_000,
        "gb" => 1_000_000_000,
        "kib" => 1 << 10,
        "mib" => 1 << 20,
        "gib" => 1 << 30,
        _ => return None,
    };
    amount.checked_mul(multiplier).filter(|bytes| *bytes > 0)
}

fn parse_duration(text: &str) -> Option<Duration> {
    let named = match text.trim().to_ascii_lowercase().as_str() {
        "minutely" => Some(Duration::minutes(1)),
        "hourly" => Some(Duration::hours(1)),
        "daily" => Some(Duration::days(1)),
        "weekly" => Some(Duration::weeks(1)),
        _ => None,
    };
    if named.is_some() {
        return named;
    }

    let (amount, unit) = split_quantity(text)?;
    let amount = i64::try_from(amount).ok().filter(|n| *n > 0)?;
    match unit.as_str() {
        "s" | "sec" | "second" | "seconds" => Duration::try_seconds(amount),
        "m" | "min" | "minute" | "minutes" => Duration::try_minutes(amount),
        "h" | "hour" | "hours" => Duration::try_hours(amount),
        "d" | "day" | "days" => Duration::try_days(amount),
        "w" | "week" | "weeks" => Duration::try_weeks(amount),
        "month" | "months" => Duration::try_days(amount.checked_mul(30)?),
        _ => None,
    }
}

fn parse_time_of_day(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    let text = text.strip_prefix("at ").unwrap_or(text).trim();
    NaiveTime::parse_from_str(text, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
        .ok()
}
