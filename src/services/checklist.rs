// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Pass/fail/warn rules for the SEO checklist.

use crate::models::analysis::{
    CheckStatus, ChecklistItem, DESCRIPTION_NOT_FOUND, H1_NOT_FOUND, TITLE_NOT_FOUND,
};
use crate::services::extractor::PageSignals;

/// Pages that load at or above this many milliseconds get a WARN.
pub const LOAD_TIME_WARN_THRESHOLD_MS: u64 = 3000;

/// Number of rows every checklist has.
pub const CHECKLIST_LEN: usize = 9;

/// Results of the network-side checks of one analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkChecks {
    pub is_https: bool,
    pub load_time_ms: u64,
    pub dns_resolved: bool,
    pub sitemap_exists: bool,
}

/// Build the nine checklist rows in their fixed order.
pub fn evaluate(signals: &PageSignals, checks: &NetworkChecks) -> Vec<ChecklistItem> {
    vec![
        ChecklistItem::new(
            "Title Tag",
            CheckStatus::pass_or_fail(signals.title != TITLE_NOT_FOUND),
            &signals.title,
        ),
        ChecklistItem::new(
            "Meta Description",
            CheckStatus::pass_or_fail(signals.description != DESCRIPTION_NOT_FOUND),
            &signals.description,
        ),
        ChecklistItem::new(
            "H1 Tag",
            CheckStatus::pass_or_fail(signals.h1 != H1_NOT_FOUND),
            &signals.h1,
        ),
        ChecklistItem::new(
            "Viewport Tag",
            CheckStatus::pass_or_fail(signals.viewport.contains("width=device-width")),
            &signals.viewport,
        ),
        // A restrictive robots tag is a caution, never a failure
        ChecklistItem::new(
            "Robots Meta Tag",
            CheckStatus::pass_or_warn(signals.robots_meta.contains("index")),
            &signals.robots_meta,
        ),
        ChecklistItem::new(
            "HTTPS",
            CheckStatus::pass_or_fail(checks.is_https),
            if checks.is_https { "Secure" } else { "Not secure" },
        ),
        ChecklistItem::new(
            "Page Load Time",
            CheckStatus::pass_or_warn(checks.load_time_ms < LOAD_TIME_WARN_THRESHOLD_MS),
            format!("{} ms", checks.load_time_ms),
        ),
        ChecklistItem::new(
            "DNS Resolution",
            CheckStatus::pass_or_fail(checks.dns_resolved),
            if checks.dns_resolved {
                "Resolved"
            } else {
                "Resolution failed"
            },
        ),
        ChecklistItem::new(
            "Sitemap.xml",
            CheckStatus::pass_or_fail(checks.sitemap_exists),
            if checks.sitemap_exists {
                "Found"
            } else {
                "Not found"
            },
        ),
    ]
}
