//! JSON request client: URL composition, option merging, deadlines, and
//! classification of every outcome into content or an `OutcomeError`.

mod client;
mod config;
mod error;
mod transport;
mod url;

pub use client::RequestClient;
pub use config::{
    CallOptions, ClientConfig, DEFAULT_TIMEOUT, EffectiveConfig, TransportOptions, merge_options,
};
pub use error::{ErrorBody, OutcomeError};
pub use transport::{ReqwestTransport, Transport, TransportError, TransportRequest, TransportResponse};
pub use url::build_url;
