//! Sink registry: turns [`SinkSpec`]s into tracing layers.
//!
//! Each sink is an independent `fmt` layer with its own level, layout and
//! writer. File sinks write through a [`RotatingFileWriter`] behind
//! `tracing_appender::non_blocking`, so one worker thread per sink
//! serializes all appends.

use std::io;

use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Metadata, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::Context;
use tracing_subscriber::{fmt, Layer, Registry};

use super::config::{SinkSpec, SinkTarget};
use super::format::{TemplateFormat, DEFAULT_TEMPLATE};
use super::rotation::{LogRotator, RotatingFileWriter};

/// A type-erased sink layer.
pub type SinkLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Forwards to `inner`, dropping events more verbose than `level`.
///
/// Spans always pass so that span context stays intact for every sink.
pub struct LevelGate<L> {
    level: LevelFilter,
    inner: L,
}

impl<L> LevelGate<L> {
    pub fn new(level: impl Into<LevelFilter>, inner: L) -> Self {
        Self {
            level: level.into(),
            inner,
        }
    }
}

impl<S, L> Layer<S> for LevelGate<L>
where
    S: Subscriber,
    L: Layer<S>,
{
    fn on_register_dispatch(&self, subscriber: &tracing::Dispatch) {
        self.inner.on_register_dispatch(subscriber);
    }

    fn on_layer(&mut self, subscriber: &mut S) {
        self.inner.on_layer(subscriber);
    }

    fn max_level_hint(&self) -> Option<LevelFilter> {
        Some(self.level)
    }

    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        self.inner.on_new_span(attrs, id, ctx);
    }

    fn on_record(&self, span: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        self.inner.on_record(span, values, ctx);
    }

    fn on_follows_from(&self, span: &Id, follows: &Id, ctx: Context<'_, S>) {
        self.inner.on_follows_from(span, follows, ctx);
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        if self.passes(event.metadata()) {
            self.inner.on_event(event, ctx);
        }
    }

    fn on_enter(&self, id: &Id, ctx: Context<'_, S>) {
        self.inner.on_enter(id, ctx);
    }

    fn on_exit(&self, id: &Id, ctx: Context<'_, S>) {
        self.inner.on_exit(id, ctx);
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        self.inner.on_close(id, ctx);
    }

    fn on_id_change(&self, old: &Id, new: &Id, ctx: Context<'_, S>) {
        self.inner.on_id_change(old, new, ctx);
    }
}

impl<L> LevelGate<L> {
    fn passes(&self, metadata: &Metadata<'_>) -> bool {
        *metadata.level() <= self.level
    }
}

/// The layers for one configuration, plus whatever keeps their writers alive.
pub struct SinkSet {
    layers: Vec<SinkLayer>,
    specs: Vec<SinkSpec>,
    guards: Vec<WorkerGuard>,
}

impl SinkSet {
    /// Build every sink, failing on the first file that cannot be opened.
    pub fn build(specs: Vec<SinkSpec>) -> io::Result<Self> {
        let mut layers = Vec::with_capacity(specs.len());
        let mut guards = Vec::new();

        for spec in &specs {
            let (layer, guard) = build_layer(spec)?;
            layers.push(layer);
            guards.extend(guard);
        }

        Ok(Self {
            layers,
            specs,
            guards,
        })
    }

    /// The single stdout sink used when no usable configuration exists.
    pub fn console() -> Self {
        let spec = SinkSpec::console();
        let layer = text_layer(&spec, std::io::stdout);
        Self {
            layers: vec![layer],
            specs: vec![spec],
            guards: Vec::new(),
        }
    }

    pub fn specs(&self) -> &[SinkSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Most verbose level any sink accepts.
    pub fn max_level(&self) -> LevelFilter {
        self.specs
            .iter()
            .map(|s| LevelFilter::from_level(s.level))
            .max()
            .unwrap_or(LevelFilter::OFF)
    }

    pub(crate) fn into_parts(self) -> (Vec<SinkLayer>, Vec<SinkSpec>, Vec<WorkerGuard>) {
        (self.layers, self.specs, self.guards)
    }
}

impl std::fmt::Debug for SinkSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkSet")
            .field("specs", &self.specs)
            .field("file_workers", &self.guards.len())
            .finish_non_exhaustive()
    }
}

fn build_layer(spec: &SinkSpec) -> io::Result<(SinkLayer, Option<WorkerGuard>)> {
    match &spec.target {
        SinkTarget::Stdout => Ok((layer_for(spec, std::io::stdout), None)),
        SinkTarget::Stderr => Ok((layer_for(spec, std::io::stderr), None)),
        SinkTarget::File(path) => {
            let mut rotator = LogRotator::new(spec.retention, spec.compression);
            if let Some(template) = &spec.path_template {
                rotator = rotator.with_path_template(template);
            }
            let writer = RotatingFileWriter::open(path, spec.rotation, rotator)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(writer);
            Ok((layer_for(spec, non_blocking), Some(guard)))
        }
    }
}

fn layer_for<W>(spec: &SinkSpec, writer: W) -> SinkLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    if spec.serialize {
        json_layer(spec, writer)
    } else {
        text_layer(spec, writer)
    }
}

/// Colour markup is stripped from templates, so span fields stay plain too.
fn text_layer<W>(spec: &SinkSpec, writer: W) -> SinkLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let format = TemplateFormat::new(spec.format.as_deref().unwrap_or(DEFAULT_TEMPLATE))
        .with_backtrace(spec.backtrace)
        .with_diagnose(spec.diagnose);

    let layer = fmt::layer()
        .event_format(format)
        .with_writer(writer)
        .with_ansi(false);

    Box::new(LevelGate::new(spec.level, layer))
}

/// Every record as one JSON object, whatever `format` says.
fn json_layer<W>(spec: &SinkSpec, writer: W) -> SinkLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .json()
        .with_writer(writer)
        .with_ansi(false)
        .with_current_span(spec.diagnose)
        .with_span_list(spec.diagnose)
        .with_target(true)
        .with_thread_ids(spec.diagnose)
        .with_thread_names(spec.diagnose)
        .with_file(true)
        .with_line_number(true);

    Box::new(LevelGate::new(spec.level, layer))
}
