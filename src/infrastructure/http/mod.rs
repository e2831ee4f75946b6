//! HTTP entrypoint (axum)

pub mod handlers;
pub mod server;

pub use handlers::{ApiError, ContentAppState, ProviderResponse, TemplateResponse};
pub use server::{router, serve};
