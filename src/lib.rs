//! # Airbyte Provider Library
//!
//! Manages Airbyte workspaces, connector definitions, sources, destinations, connections and
//! operations declaratively. Plans and states use a three-state attribute model (see
//! [`state::Attr`]) that [`mapper`] converts to and from the configuration API's wire shapes
//! ([`models`]); [`resources`] and [`data_sources`] drive the remote calls through [`client`].

pub mod client;
pub mod config;
pub mod data_sources;
pub mod error;
pub mod mapper;
pub mod models;
pub mod provider;
pub mod resources;
pub mod state;
pub mod telemetry;
pub mod validation;

pub use error::{ProviderError, ResourceError};
pub use provider::Provider;
