use std::sync::{Arc, Mutex, PoisonError};

use once_cell::sync::OnceCell;
use thiserror::Error;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{reload, EnvFilter, Registry};

use super::config::{LoggingDocument, SinkSpec};
use super::intercept::InterceptBridge;
use super::sinks::{SinkLayer, SinkSet};
use crate::domain::models::LOGGING_CONFIG;
use crate::infrastructure::config::{load_document, ConfigResolver};

type SinkHandle = reload::Handle<Vec<SinkLayer>, Registry>;

/// The process-wide subscriber, installed on first use.
struct Installed {
    handle: SinkHandle,
    active: Mutex<Active>,
}

#[derive(Default)]
struct Active {
    specs: Vec<SinkSpec>,
    _guards: Vec<WorkerGuard>,
}

static INSTALLED: OnceCell<Installed> = OnceCell::new();

/// Errors that prevent the bootstrap from touching the global subscriber.
///
/// Problems with the logging configuration itself never surface here; they
/// degrade to the console sink instead.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("a global tracing subscriber is already installed")]
    SubscriberConflict(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("failed to swap logging sinks: {0}")]
    Reload(#[from] reload::Error),
}

/// Outcome of one [`LoggingBootstrap::configure`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingReport {
    /// Sinks active after the call, in registration order
    pub sinks: Vec<SinkSpec>,
    /// Why the console fallback was used, if it was
    pub degraded: Option<String>,
}

impl LoggingReport {
    pub const fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }
}

/// Builds the sink set from `logging_config` and installs it.
///
/// Safe to call repeatedly: each call replaces every previously registered
/// sink, so reconfiguring never duplicates output.
#[derive(Debug, Clone)]
pub struct LoggingBootstrap {
    resolver: Arc<ConfigResolver>,
}

impl LoggingBootstrap {
    pub const fn new(resolver: Arc<ConfigResolver>) -> Self {
        Self { resolver }
    }

    /// Replace all sinks with the ones described by the logging document.
    ///
    /// Falls back to a single stdout sink at INFO when the document is absent,
    /// has no logging section, or describes a sink that cannot be built.
    ///
    /// # Errors
    /// Only when another component already owns the global subscriber.
    pub fn configure(&self) -> Result<LoggingReport, LoggingError> {
        let installed = installed()?;
        let mut active = installed
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let (set, degraded) = match self.load_sinks() {
            Ok(set) => (set, None),
            Err(reason) => (SinkSet::console(), Some(reason)),
        };

        let max_level = set.max_level();
        let (layers, specs, guards) = set.into_parts();
        installed.handle.reload(layers)?;
        InterceptBridge::new().install(max_level);

        // Old writers flush when their guards drop here.
        *active = Active {
            specs: specs.clone(),
            _guards: guards,
        };
        drop(active);

        if let Some(reason) = &degraded {
            warn!(reason = %reason, "Logging configuration unusable, falling back to console");
        }
        info!(sinks = specs.len(), "Logging successfully configured");

        Ok(LoggingReport {
            sinks: specs,
            degraded,
        })
    }

    fn load_sinks(&self) -> Result<SinkSet, String> {
        let path = self.resolver.locate(LOGGING_CONFIG).ok_or_else(|| {
            format!(
                "no {LOGGING_CONFIG} document in {}",
                self.resolver.config_dir().display()
            )
        })?;

        let document = load_document(&path).map_err(|e| e.to_string())?;
        let specs = LoggingDocument::from_document(document)
            .and_then(|doc| doc.sink_specs())
            .map_err(|e| format!("{}: {e}", path.display()))?
            .ok_or_else(|| format!("{} has no logging section", path.display()))?;

        if specs.is_empty() {
            return Err(format!("{} declares no sinks", path.display()));
        }

        SinkSet::build(specs).map_err(|e| format!("cannot open log file: {e}"))
    }
}

/// Number of sinks on the global subscriber, zero before the first configure.
pub fn active_sink_count() -> usize {
    INSTALLED
        .get()
        .and_then(|installed| installed.handle.with_current(Vec::len).ok())
        .unwrap_or(0)
}

/// Specs of the sinks currently installed.
pub fn active_sinks() -> Vec<SinkSpec> {
    INSTALLED
        .get()
        .map(|installed| {
            installed
                .active
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .specs
                .clone()
        })
        .unwrap_or_default()
}

/// Remove every sink and flush file writers.
///
/// Used at process exit so buffered file records reach disk.
pub fn shutdown() {
    if let Some(installed) = INSTALLED.get() {
        let mut active = installed
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if installed.handle.reload(Vec::new()).is_ok() {
            *active = Active::default();
        }
    }
}

/// `RUST_LOG`, when set, narrows what reaches any sink. Read once at install.
fn env_override() -> Option<EnvFilter> {
    EnvFilter::try_from_default_env().ok()
}

fn installed() -> Result<&'static Installed, LoggingError> {
    INSTALLED.get_or_try_init(|| {
        let (layer, handle) = reload::Layer::new(Vec::<SinkLayer>::new());
        let subscriber = tracing_subscriber::registry()
            .with(layer)
            .with(env_override());
        tracing::subscriber::set_global_default(subscriber)?;
        Ok(Installed {
            handle,
            active: Mutex::new(Active::default()),
        })
    })
}
