//! Alias Crab
//!
//! A small backend for managing [email routing] forwarding addresses and rules from a static
//! front-end, without handing the front-end the provider's API token.
//!
//! Alias Crab exposes a handful of simplified REST endpoints (see [`api`]) and translates them
//! into calls against the provider's v4 REST API. Paginated collections are flattened into a
//! single list, rule creation is checked for a sane alias and destination before anything is
//! sent, and enabling or disabling a rule falls back to resubmitting the full rule when the
//! provider refuses a flag-only update.
//!
//! Nothing is stored locally: the provider is the single source of truth.
//!
//! [email routing]: https://developers.cloudflare.com/email-routing/
//!
#![warn(clippy::pedantic)]

pub mod api;
pub mod config;
pub mod error;
pub mod rules;
pub mod upstream;

pub use api::new as new_http;
pub use config::{Config, SharedConfig};
pub use upstream::{DynUpstream, HttpUpstream, Upstream};
