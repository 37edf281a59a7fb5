// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Single-page SEO analysis: fetch, parse, probe, assemble.

use crate::models::analysis::AnalysisResult;
use crate::services::checklist::{self, NetworkChecks};
use crate::services::extractor::{extract_signals, PageSignals};
use crate::services::logging::redact_url;
use reqwest::redirect::{Action, Attempt, Policy};
use std::collections::HashSet;
use std::error::Error as _;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::{Host, Url};

/// Default bound for every outbound call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default cap on the page body, in bytes (10 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Same hop limit reqwest applies by default.
const MAX_REDIRECTS: usize = 10;

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("SeoAgent/", env!("SEO_AGENT_VERSION"));

/// Errors that abort an analysis. Everything else degrades to a negative check.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid URL")]
    InvalidUrl(#[from] url::ParseError),
    #[error("unsupported URL scheme '{0}', expected http or https")]
    UnsupportedScheme(String),
    #[error("failed to fetch page")]
    Fetch(#[source] reqwest::Error),
    #[error("page body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),
}

impl AnalysisError {
    /// Whether the caller supplied a bad URL (as opposed to the target failing).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::InvalidUrl(_) | AnalysisError::UnsupportedScheme(_)
        )
    }

    /// The error and all of its causes, joined with ": ".
    pub fn details(&self) -> String {
        let mut details = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            details.push_str(": ");
            details.push_str(&cause.to_string());
            source = cause.source();
        }
        details
    }
}

/// Settings for [`PageAnalyzer`].
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub user_agent: String,
    /// Bound on the primary GET, body included
    pub fetch_timeout: Duration,
    /// Bound on the sitemap HEAD and on the DNS lookup
    pub probe_timeout: Duration,
    /// Hostnames whose TLS certificates are not validated (trusted test targets only)
    pub insecure_tls_hosts: Vec<String>,
    /// Pages larger than this fail the analysis
    pub max_body_bytes: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fetch_timeout: DEFAULT_TIMEOUT,
            probe_timeout: DEFAULT_TIMEOUT,
            insecure_tls_hosts: Vec::new(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Analyzes one page per call. Holds no per-request state and is shared across requests.
pub struct PageAnalyzer {
    client: reqwest::Client,
    /// Only built when `insecure_tls_hosts` is non-empty
    insecure_client: Option<reqwest::Client>,
    insecure_tls_hosts: HashSet<String>,
    fetch_timeout: Duration,
    probe_timeout: Duration,
    max_body_bytes: usize,
}

impl PageAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalysisError> {
        let insecure_tls_hosts: HashSet<String> = config
            .insecure_tls_hosts
            .iter()
            .map(|host| host.trim().to_ascii_lowercase())
            .filter(|host| !host.is_empty())
            .collect();

        let client = build_client(&config.user_agent)?;
        let insecure_client = if insecure_tls_hosts.is_empty() {
            None
        } else {
            warn!(
                hosts = ?insecure_tls_hosts,
                "TLS certificate validation disabled for configured hosts"
            );
            Some(build_insecure_client(&config.user_agent, insecure_tls_hosts.clone())?)
        };

        Ok(Self {
            client,
            insecure_client,
            insecure_tls_hosts,
            fetch_timeout: config.fetch_timeout,
            probe_timeout: config.probe_timeout,
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Run the full analysis of `url`.
    ///
    /// Only the primary fetch can fail the analysis; the sitemap and DNS probes
    /// report `false` instead of erroring.
    pub async fn analyze(&self, url: &str) -> Result<AnalysisResult, AnalysisError> {
        let target = parse_target(url)?;
        let client = self.client_for(&target);
        let redacted = redact_url(url);

        info!(url = %redacted, "Analyzing page");

        let (html, load_time_ms) = self.fetch_page(client, url).await.inspect_err(|e| {
            warn!(url = %redacted, error = %e.details(), "Primary fetch failed");
        })?;

        let signals = extract_signals(&html);

        let (sitemap_exists, dns_resolved) = tokio::join!(
            self.sitemap_exists(client, url),
            self.resolve_host(&target)
        );

        let result = assemble_result(
            url,
            signals,
            NetworkChecks {
                is_https: is_https(url),
                load_time_ms,
                dns_resolved,
                sitemap_exists,
            },
        );

        info!(
            url = %redacted,
            load_time_ms,
            dns_resolved,
            sitemap_exists,
            "Analysis complete"
        );

        Ok(result)
    }

    fn trusts_invalid_certs(&self, target: &Url) -> bool {
        is_trusted_host(&self.insecure_tls_hosts, target.host_str())
    }

    fn client_for(&self, target: &Url) -> &reqwest::Client {
        match &self.insecure_client {
            Some(insecure) if self.trusts_invalid_certs(target) => insecure,
            _ => &self.client,
        }
    }

    /// GET the page and time it, body read included. The body is read chunk by
    /// chunk and the fetch fails as soon as it passes `max_body_bytes`.
    async fn fetch_page(
        &self,
        client: &reqwest::Client,
        url: &str,
    ) -> Result<(String, u64), AnalysisError> {
        let start = Instant::now();

        let mut response = client
            .get(url)
            .timeout(self.fetch_timeout)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(AnalysisError::Fetch)?;

        let too_large = AnalysisError::BodyTooLarge {
            limit: self.max_body_bytes,
        };
        if response
            .content_length()
            .is_some_and(|len| len > self.max_body_bytes as u64)
        {
            return Err(too_large);
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(AnalysisError::Fetch)? {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(too_large);
            }
            body.extend_from_slice(&chunk);
        }
        let html = String::from_utf8_lossy(&body).into_owned();
        let load_time_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        Ok((html, load_time_ms))
    }

    /// HEAD `{url}/sitemap.xml`. The suffix is appended to the raw string, so a
    /// trailing slash produces `//sitemap.xml`.
    async fn sitemap_exists(&self, client: &reqwest::Client, url: &str) -> bool {
        let sitemap_url = format!("{url}/sitemap.xml");

        match client
            .head(&sitemap_url)
            .timeout(self.probe_timeout)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                debug!(status = %response.status(), "Sitemap not found");
                false
            }
            Err(e) => {
                debug!(error = %e, "Sitemap check failed");
                false
            }
        }
    }

    async fn resolve_host(&self, target: &Url) -> bool {
        let domain = match target.host() {
            Some(Host::Domain(domain)) => domain,
            // IP literals need no resolution
            Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => return true,
            None => return false,
        };
        let port = target.port_or_known_default().unwrap_or(80);

        let lookup = tokio::net::lookup_host((domain, port));
        match tokio::time::timeout(self.probe_timeout, lookup).await {
            Ok(Ok(mut addrs)) => addrs.next().is_some(),
            Ok(Err(e)) => {
                debug!(host = domain, error = %e, "DNS lookup failed");
                false
            }
            Err(_) => {
                debug!(host = domain, "DNS lookup timed out");
                false
            }
        }
    }
}

/// Literal, case-sensitive prefix check; `HTTPS://` does not count.
pub fn is_https(url: &str) -> bool {
    url.starts_with("https://")
}

/// Combine extracted signals and network checks into the final result.
pub fn assemble_result(url: &str, signals: PageSignals, checks: NetworkChecks) -> AnalysisResult {
    let checklist = checklist::evaluate(&signals, &checks);

    AnalysisResult {
        url: url.to_string(),
        title: signals.title,
        description: signals.description,
        h1: signals.h1,
        viewport: signals.viewport,
        robots_meta: signals.robots_meta,
        is_https: checks.is_https,
        load_time_ms: checks.load_time_ms,
        dns_resolved: checks.dns_resolved,
        sitemap_exists: checks.sitemap_exists,
        checklist,
    }
}

fn parse_target(url: &str) -> Result<Url, AnalysisError> {
    let parsed = Url::parse(url)?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(AnalysisError::UnsupportedScheme(other.to_string())),
    }
}

fn is_trusted_host(trusted_hosts: &HashSet<String>, host: Option<&str>) -> bool {
    host.is_some_and(|host| trusted_hosts.contains(host))
}

/// Redirect rule for the certificate-skipping client: hops may only land on
/// hosts that are themselves exempt from validation.
fn follow_trusted_redirect(trusted_hosts: &HashSet<String>, attempt: Attempt<'_>) -> Action {
    if attempt.previous().len() >= MAX_REDIRECTS {
        return attempt.error("too many redirects");
    }
    if is_trusted_host(trusted_hosts, attempt.url().host_str()) {
        attempt.follow()
    } else {
        let message = format!(
            "refusing redirect to {} without TLS validation",
            attempt.url().host_str().unwrap_or("<no host>")
        );
        attempt.error(message)
    }
}

fn build_client(user_agent: &str) -> Result<reqwest::Client, AnalysisError> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .build()
        .map_err(AnalysisError::Client)
}

fn build_insecure_client(
    user_agent: &str,
    trusted_hosts: HashSet<String>,
) -> Result<reqwest::Client, AnalysisError> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .danger_accept_invalid_certs(true)
        .redirect(Policy::custom(move |attempt| {
            follow_trusted_redirect(&trusted_hosts, attempt)
        }))
        .build()
        .map_err(AnalysisError::Client)
}
