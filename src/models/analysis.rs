// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================================
// Sentinels and defaults
// ============================================================================

/// Reported when the page has no (non-empty) `<title>`.
pub const TITLE_NOT_FOUND: &str = "Title not found";
/// Reported when the page has no (non-empty) `<meta name="description">`.
pub const DESCRIPTION_NOT_FOUND: &str = "Description not found";
/// Reported when the page has no (non-empty) `<h1>`.
pub const H1_NOT_FOUND: &str = "H1 tag not found";
/// Reported when the page has no (non-empty) `<meta name="viewport">`.
pub const VIEWPORT_NOT_FOUND: &str = "No viewport tag";
/// Crawler behaviour implied by a missing `<meta name="robots">`.
///
/// This is a default, not a "not found" sentinel: it is what search engines
/// assume when the tag is absent.
pub const ROBOTS_DEFAULT: &str = "index, follow";

// ============================================================================
// Request / response types
// ============================================================================

/// Body of `POST /seo-check`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SeoCheckRequest {
    /// Absolute http(s) URL of the page to analyze
    #[serde(default)]
    pub url: Option<String>,
}

/// Outcome of a single checklist row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckStatus {
    Pass,
    Fail,
    Warn,
}

impl CheckStatus {
    /// PASS when `passed`, FAIL otherwise.
    pub fn pass_or_fail(passed: bool) -> Self {
        if passed {
            CheckStatus::Pass
        } else {
            CheckStatus::Fail
        }
    }

    /// PASS when `passed`, WARN otherwise.
    pub fn pass_or_warn(passed: bool) -> Self {
        if passed {
            CheckStatus::Pass
        } else {
            CheckStatus::Warn
        }
    }
}

/// One row of the SEO report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ChecklistItem {
    /// Human-readable label of the checked signal
    #[serde(rename = "item")]
    pub label: String,
    pub status: CheckStatus,
    /// The extracted or measured value the status was derived from
    pub value: String,
}

impl ChecklistItem {
    pub fn new(label: &str, status: CheckStatus, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            status,
            value: value.into(),
        }
    }
}

/// Full analysis of one page, returned as the body of a successful `POST /seo-check`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// The analyzed URL, exactly as submitted
    pub url: String,
    pub title: String,
    pub description: String,
    pub h1: String,
    pub viewport: String,
    #[serde(rename = "robots")]
    pub robots_meta: String,
    #[serde(rename = "https")]
    pub is_https: bool,
    /// Duration of the primary fetch in milliseconds
    #[serde(rename = "loadTime")]
    pub load_time_ms: u64,
    #[serde(rename = "dnsCheck")]
    pub dns_resolved: bool,
    pub sitemap_exists: bool,
    /// Always nine rows in a fixed order
    #[serde(rename = "seoChecklist")]
    pub checklist: Vec<ChecklistItem>,
}

/// Error body. `details` is only present for server-side failures.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}
