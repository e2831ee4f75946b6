//! Plain-text record layout driven by a `{placeholder}` template.
//!
//! Supported placeholders: `{time}` / `{time:<pattern>}`, `{level}` /
//! `{level: <8}`, `{name}`, `{module}`, `{function}`, `{file}`, `{line}`,
//! `{message}`, `{thread}`, `{extra}`. Unknown placeholders are written
//! verbatim; colour tags such as `<green>` or `</>` are dropped.

use std::fmt;
use std::sync::LazyLock;

use chrono::Local;
use regex::Regex;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_log::NormalizeEvent;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

/// Layout used when a sink has no `format`.
pub const DEFAULT_TEMPLATE: &str =
    "{time:YYYY-MM-DD HH:mm:ss.SSS} | {level: <8} | {name}:{line} - {message}";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)(?::([^}]*))?\}").expect("placeholder pattern is valid"));

static MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[a-zA-Z_ ,]*>").expect("markup pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Time(String),
    Level { width: usize, align: Align },
    Name,
    Module,
    Function,
    File,
    Line,
    Message,
    Thread,
    Extra,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
}

/// Compiled record template for text sinks
#[derive(Debug, Clone)]
pub struct TemplateFormat {
    segments: Vec<Segment>,
    backtrace: bool,
    diagnose: bool,
}

impl TemplateFormat {
    pub fn new(template: &str) -> Self {
        Self {
            segments: compile(template),
            backtrace: false,
            diagnose: false,
        }
    }

    /// Append a captured stack trace to ERROR records.
    #[must_use]
    pub const fn with_backtrace(mut self, backtrace: bool) -> Self {
        self.backtrace = backtrace;
        self
    }

    /// Append the record's fields and the active span chain.
    #[must_use]
    pub const fn with_diagnose(mut self, diagnose: bool) -> Self {
        self.diagnose = diagnose;
        self
    }
}

impl Default for TemplateFormat {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

fn compile(template: &str) -> Vec<Segment> {
    let template = MARKUP.replace_all(template, "");
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(&template) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            segments.push(Segment::Literal(template[last..whole.start()].to_string()));
        }
        last = whole.end();

        let spec = caps.get(2).map_or("", |m| m.as_str());
        let segment = match &caps[1] {
            "time" => Segment::Time(time_pattern(spec)),
            "level" => {
                let (width, align) = parse_width(spec);
                Segment::Level { width, align }
            }
            "name" => Segment::Name,
            "module" => Segment::Module,
            "function" => Segment::Function,
            "file" => Segment::File,
            "line" => Segment::Line,
            "message" => Segment::Message,
            "thread" => Segment::Thread,
            "extra" => Segment::Extra,
            _ => Segment::Literal(whole.as_str().to_string()),
        };
        segments.push(segment);
    }

    if last < template.len() {
        segments.push(Segment::Literal(template[last..].to_string()));
    }
    segments
}

/// `" <8"` -> (8, Left); `">5"` -> (5, Right); `""` -> (0, Left).
fn parse_width(spec: &str) -> (usize, Align) {
    let spec = spec.trim_start_matches(|c: char| c != '<' && c != '>' && c != '^' && !c.is_ascii_digit());
    let (align, digits) = match spec.chars().next() {
        Some('>') => (Align::Right, &spec[1..]),
        Some('^') => (Align::Center, &spec[1..]),
        Some('<') => (Align::Left, &spec[1..]),
        _ => (Align::Left, spec),
    };
    (digits.trim().parse().unwrap_or(0), align)
}

/// Convert `YYYY-MM-DD HH:mm:ss.SSS`-style tokens into a chrono pattern.
fn time_pattern(spec: &str) -> String {
    const TOKENS: [(&str, &str); 17] = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("DD", "%d"),
        ("dddd", "%A"),
        ("ddd", "%a"),
        ("HH", "%H"),
        ("hh", "%I"),
        ("mm", "%M"),
        ("ss", "%S"),
        ("SSSSSS", "%6f"),
        ("SSS", "%3f"),
        ("A", "%p"),
        ("ZZ", "%z"),
        ("Z", "%:z"),
    ];

    let spec = spec.trim_start_matches("!UTC");
    if spec.is_empty() {
        return "%Y-%m-%d %H:%M:%S%.3f".to_string();
    }

    let mut out = String::with_capacity(spec.len() * 2);
    let mut rest = spec;
    'outer: while !rest.is_empty() {
        for (token, pattern) in TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(pattern);
                rest = tail;
                continue 'outer;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            if c == '%' {
                out.push_str("%%");
            } else {
                out.push(c);
            }
        }
        rest = chars.as_str();
    }
    out
}

fn pad(writer: &mut Writer<'_>, text: &str, width: usize, align: Align) -> fmt::Result {
    match align {
        Align::Left => write!(writer, "{text:<width$}"),
        Align::Right => write!(writer, "{text:>width$}"),
        Align::Center => write!(writer, "{text:^width$}"),
    }
}

/// Splits an event's fields into the message and everything else.
#[derive(Default)]
struct FieldCollector {
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else if !field.name().starts_with("log.") {
            self.fields.push((field.name(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else if !field.name().starts_with("log.") {
            self.fields.push((field.name(), format!("{value:?}")));
        }
    }
}

impl<S, N> FormatEvent<S, N> for TemplateFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        // Records bridged from `log` carry their real call site in fields.
        let normalized = event.normalized_metadata();
        let meta = normalized.as_ref().unwrap_or_else(|| event.metadata());

        let mut collected = FieldCollector::default();
        event.record(&mut collected);

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => writer.write_str(text)?,
                Segment::Time(pattern) => write!(writer, "{}", Local::now().format(pattern))?,
                Segment::Level { width, align } => {
                    pad(&mut writer, meta.level().as_str(), *width, *align)?;
                }
                Segment::Name => writer.write_str(meta.target())?,
                Segment::Module => writer.write_str(meta.module_path().unwrap_or(meta.target()))?,
                Segment::Function => {
                    let module = meta.module_path().unwrap_or(meta.target());
                    writer.write_str(module.rsplit("::").next().unwrap_or(module))?;
                }
                Segment::File => writer.write_str(meta.file().unwrap_or("<unknown>"))?,
                Segment::Line => match meta.line() {
                    Some(line) => write!(writer, "{line}")?,
                    None => writer.write_char('?')?,
                },
                Segment::Message => writer.write_str(&collected.message)?,
                Segment::Thread => {
                    let current = std::thread::current();
                    writer.write_str(current.name().unwrap_or("unnamed"))?;
                }
                Segment::Extra => {
                    let rendered: Vec<_> =
                        collected.fields.iter().map(|(k, v)| format!("{k}={v}")).collect();
                    write!(writer, "{{{}}}", rendered.join(", "))?;
                }
            }
        }

        if self.diagnose {
            for (key, value) in &collected.fields {
                write!(writer, " {key}={value}")?;
            }
            if let Some(scope) = ctx.event_scope() {
                let chain: Vec<String> = scope
                    .from_root()
                    .map(|span| {
                        let ext = span.extensions();
                        match ext.get::<FormattedFields<N>>() {
                            Some(fields) if !fields.is_empty() => {
                                format!("{}{{{}}}", span.name(), fields)
                            }
                            _ => span.name().to_string(),
                        }
                    })
                    .collect();
                if !chain.is_empty() {
                    write!(writer, " [{}]", chain.join(" > "))?;
                }
            }
        }

        if self.backtrace && *meta.level() == Level::ERROR {
            let trace = std::backtrace::Backtrace::force_capture();
            write!(writer, "\nTraceback:\n{trace}")?;
        }

        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;
    use tracing_subscriber::layer::SubscriberExt;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Buffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Buffer {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn render(format: TemplateFormat, emit: impl FnOnce()) -> String {
        let buffer = Buffer::default();
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(buffer.clone())
                .with_ansi(false),
        );
        tracing::subscriber::with_default(subscriber, emit);
        buffer.contents()
    }

    #[test]
    fn test_compile_segments() {
        let segments = compile("<green>{time:HH:mm}</green> | {level: <8} | {message} {bogus}");
        assert_eq!(segments[0], Segment::Time("%H:%M".to_string()));
        assert_eq!(segments[1], Segment::Literal(" | ".to_string()));
        assert_eq!(
            segments[2],
            Segment::Level {
                width: 8,
                align: Align::Left
            }
        );
        assert_eq!(segments[4], Segment::Message);
        assert_eq!(segments[6], Segment::Literal("{bogus}".to_string()));
    }

    #[test]
    fn test_time_pattern() {
        assert_eq!(time_pattern("YYYY-MM-DD HH:mm:ss.SSS"), "%Y-%m-%d %H:%M:%S.%3f");
        assert_eq!(time_pattern("HH:mm ZZ"), "%H:%M %z");
        assert_eq!(time_pattern("100%"), "100%%");
    }

    #[test]
    fn test_parse_width() {
        assert_eq!(parse_width(" <8"), (8, Align::Left));
        assert_eq!(parse_width(">5"), (5, Align::Right));
        assert_eq!(parse_width(""), (0, Align::Left));
    }

    #[test]
    fn test_renders_template() {
        let out = render(TemplateFormat::new("{level: <5}|{name}|{message}|{extra}"), || {
            tracing::warn!(target: "content", draft = 3, "slow provider");
        });
        assert_eq!(out, "WARN |content|slow provider|{draft=3}\n");
    }

    #[test]
    fn test_diagnose_appends_fields_and_spans() {
        let format = TemplateFormat::new("{message}").with_diagnose(true);
        let out = render(format, || {
            let span = tracing::info_span!("generate", group = "blog");
            let _entered = span.enter();
            tracing::info!(tokens = 42, "done");
        });
        assert!(out.starts_with("done tokens=42"));
        assert!(out.contains("[generate{group=\"blog\"}]"));
    }

    #[test]
    fn test_backtrace_only_on_error() {
        let format = TemplateFormat::new("{message}").with_backtrace(true);
        let out = render(format.clone(), || tracing::warn!("not fatal"));
        assert_eq!(out, "not fatal\n");

        let out = render(format, || tracing::error!("fatal"));
        assert!(out.starts_with("fatal\nTraceback:"));
    }
}
