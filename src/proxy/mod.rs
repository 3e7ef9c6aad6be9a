//! Proxy module
//!
//! Handles prompt forwarding to the configured upstream provider.

pub mod gateway;
pub mod headers;
pub mod logging;
pub mod native;
pub mod provider;

pub use gateway::GatewayProvider;
pub use logging::RequestContext;
pub use native::NativeProvider;
pub use provider::{RelayReply, UpstreamProvider};

use std::sync::Arc;

use crate::config::UpstreamConfig;

/// Build the provider selected by configuration
pub fn build_provider(client: reqwest::Client, upstream: UpstreamConfig) -> Arc<dyn UpstreamProvider> {
    match upstream {
        UpstreamConfig::Native(config) => Arc::new(NativeProvider::new(client, config)),
        UpstreamConfig::Gateway(config) => Arc::new(GatewayProvider::new(client, config)),
    }
}
