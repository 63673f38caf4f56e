//! Command-line front end over the request client.

pub mod config;
mod list;
mod request;

pub use list::{ItemId, ListItem, failure_summary, fetch_items, list, render_items};
pub use request::{Verb, parse_payload, request, send};

pub use config::{Config, call_options};
