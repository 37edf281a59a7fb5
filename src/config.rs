// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Command-line and environment configuration.

use crate::services::analyzer::{AnalyzerConfig, DEFAULT_MAX_BODY_BYTES, DEFAULT_USER_AGENT};
use clap::builder::TypedValueParser;
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// SEO checklist service.
///
/// Every flag can also be set through its `SEO_AGENT_*` environment variable.
#[derive(Debug, Clone, Parser)]
#[command(name = "seo-agent", version = env!("SEO_AGENT_VERSION"))]
pub struct Config {
    /// Address to bind; 0.0.0.0 accepts connections from any interface (required for Docker)
    #[arg(long, env = "SEO_AGENT_BIND_ADDRESS", default_value = "0.0.0.0")]
    pub bind_address: IpAddr,

    #[arg(long, env = "SEO_AGENT_PORT", default_value_t = 3000)]
    pub port: u16,

    /// User-Agent header sent to analyzed sites
    #[arg(long, env = "SEO_AGENT_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Timeout for fetching the analyzed page, in seconds
    #[arg(
        long,
        env = "SEO_AGENT_FETCH_TIMEOUT_SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub fetch_timeout_secs: u64,

    /// Timeout for the sitemap and DNS checks, in seconds
    #[arg(
        long,
        env = "SEO_AGENT_PROBE_TIMEOUT_SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub probe_timeout_secs: u64,

    /// Comma-separated hostnames whose TLS certificates are not validated.
    /// Only for trusted test targets.
    #[arg(long, env = "SEO_AGENT_INSECURE_TLS_HOSTS", value_delimiter = ',')]
    pub insecure_tls_hosts: Vec<String>,

    /// Largest page body accepted, in bytes
    #[arg(
        long,
        env = "SEO_AGENT_MAX_BODY_BYTES",
        default_value_t = DEFAULT_MAX_BODY_BYTES,
        value_parser = clap::value_parser!(u64).range(1..).map(|v| v as usize)
    )]
    pub max_body_bytes: usize,
}

impl Config {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            user_agent: self.user_agent.clone(),
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
            probe_timeout: Duration::from_secs(self.probe_timeout_secs),
            insecure_tls_hosts: self.insecure_tls_hosts.clone(),
            max_body_bytes: self.max_body_bytes,
        }
    }
}
