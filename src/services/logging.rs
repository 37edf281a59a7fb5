// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Logging setup and sensitive data redaction.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "info,seo_agent=debug";

/// Initialize the global `tracing` subscriber, writing to stdout.
pub fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

/// Redact a user-submitted URL for logging.
/// Drops credentials, query string and fragment: "https://u:p@host/a?t=1" -> "https://host/a"
pub fn redact_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut parsed) => {
            // Only fails for cannot-be-a-base URLs, which carry no credentials
            let _ = parsed.set_username("");
            let _ = parsed.set_password(None);
            parsed.set_query(None);
            parsed.set_fragment(None);
            parsed.to_string()
        }
        // Not a URL, redact completely
        Err(_) => "<invalid url>".to_string(),
    }
}
