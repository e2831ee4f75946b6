//! Configuration documents and the named slots that cache them.

use serde_json::{Map, Value};

/// A decoded configuration file: string keys to arbitrary nested values,
/// in file order.
pub type ConfigDocument = Map<String, Value>;

/// One backend's settings block from the `providers` mapping.
pub type ProviderEntry = Map<String, Value>;

/// Provider used when the model configuration does not name one.
pub const DEFAULT_PROVIDER: &str = "openai";

/// Logical name of the logging configuration document.
pub const LOGGING_CONFIG: &str = "logging_config";

/// Documents that are loaded once and kept for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentSlot {
    ModelConfig,
    PromptTemplates,
}

impl DocumentSlot {
    pub const ALL: [Self; 2] = [Self::ModelConfig, Self::PromptTemplates];

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::ModelConfig => 0,
            Self::PromptTemplates => 1,
        }
    }

    /// Logical document name, i.e. the file stem searched for.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ModelConfig => "model_config",
            Self::PromptTemplates => "prompt_templates",
        }
    }
}

impl std::fmt::Display for DocumentSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Short type name for a JSON value, used in shape errors.
pub const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
