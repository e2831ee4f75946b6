use serde::{Deserialize, Serialize};

/// Application-level settings read from the environment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct AppSettings {
    /// Service title reported by the web entrypoint
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Debug mode toggle
    #[serde(default)]
    pub debug: bool,
}

fn default_app_name() -> String {
    "Starter AI Service".to_string()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            debug: false,
        }
    }
}

/// Background-task broker wiring
///
/// Only the locations are configurable; the remaining fields describe the
/// fixed serialization contract of the task workers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct BrokerSettings {
    /// Application name registered with the broker
    #[serde(default = "default_broker_app")]
    pub app_name: String,

    /// Message broker URL (`CELERY_BROKER_URL`)
    #[serde(default = "default_broker_url")]
    pub broker_url: String,

    /// Result backend URL (`CELERY_RESULT_BACKEND`)
    #[serde(default = "default_result_backend")]
    pub result_backend: String,

    /// Task modules loaded by workers
    #[serde(default = "default_include")]
    pub include: Vec<String>,

    #[serde(default = "default_serializer")]
    pub task_serializer: String,

    #[serde(default = "default_accept_content")]
    pub accept_content: Vec<String>,

    #[serde(default = "default_serializer")]
    pub result_serializer: String,

    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default = "default_true")]
    pub enable_utc: bool,

    #[serde(default = "default_true")]
    pub connection_retry_on_startup: bool,
}

fn default_broker_app() -> String {
    "aicontent".to_string()
}

fn default_broker_url() -> String {
    "redis://redis:6379/0".to_string()
}

fn default_result_backend() -> String {
    "redis://redis:6379/1".to_string()
}

fn default_include() -> Vec<String> {
    vec!["tasks".to_string()]
}

fn default_serializer() -> String {
    "json".to_string()
}

fn default_accept_content() -> Vec<String> {
    vec![default_serializer()]
}

fn default_timezone() -> String {
    "UTC".to_string()
}

const fn default_true() -> bool {
    true
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self {
            app_name: default_broker_app(),
            broker_url: default_broker_url(),
            result_backend: default_result_backend(),
            include: default_include(),
            task_serializer: default_serializer(),
            accept_content: default_accept_content(),
            result_serializer: default_serializer(),
            timezone: default_timezone(),
            enable_utc: default_true(),
            connection_retry_on_startup: default_true(),
        }
    }
}
