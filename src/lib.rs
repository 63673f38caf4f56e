pub mod commands;
pub mod http;

pub use http::{CallOptions, ClientConfig, ErrorBody, OutcomeError, RequestClient};
