// src/core/context.rs

use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr};

use crate::config::ScanConfig;
use crate::core::dns::{DnsBackend, HickoryBackend};

/// Handles shared by every scan: immutable configuration, the pooled HTTP client
/// and the DNS backend. Cloning is cheap.
#[derive(Clone)]
pub struct ScanContext {
    pub config: Arc<ScanConfig>,
    pub http: reqwest::Client,
    pub dns: Arc<dyn DnsBackend>,
}

impl ScanContext {
    /// Builds a context backed by real resolvers.
    pub fn new(config: ScanConfig) -> Result<Self> {
        let dns = Arc::new(HickoryBackend::new(&config));
        Self::with_backend(config, dns)
    }

    /// Builds a context around a caller-supplied DNS backend.
    pub fn with_backend(config: ScanConfig, dns: Arc<dyn DnsBackend>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .wrap_err("Failed to build HTTP client")?;

        Ok(Self {
            config: Arc::new(config),
            http,
            dns,
        })
    }
}
