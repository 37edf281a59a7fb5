// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! On-page signal extraction using the `scraper` crate.

use crate::models::analysis::{
    DESCRIPTION_NOT_FOUND, H1_NOT_FOUND, ROBOTS_DEFAULT, TITLE_NOT_FOUND, VIEWPORT_NOT_FOUND,
};
use scraper::{ElementRef, Html, Selector};

/// Markup-derived SEO signals of one page, with sentinels/defaults already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSignals {
    pub title: String,
    pub description: String,
    pub h1: String,
    pub viewport: String,
    pub robots_meta: String,
}

/// Parse `html` and pull out the tags the checklist looks at.
pub fn extract_signals(html: &str) -> PageSignals {
    let document = Html::parse_document(html);

    PageSignals {
        title: first_text(&document, "title").unwrap_or_else(|| TITLE_NOT_FOUND.to_string()),
        description: meta_content(&document, "description")
            .unwrap_or_else(|| DESCRIPTION_NOT_FOUND.to_string()),
        h1: first_text(&document, "h1").unwrap_or_else(|| H1_NOT_FOUND.to_string()),
        viewport: meta_content(&document, "viewport")
            .unwrap_or_else(|| VIEWPORT_NOT_FOUND.to_string()),
        robots_meta: robots_content(&document),
    }
}

fn first_match<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let Ok(selector) = Selector::parse(css) else {
        return None;
    };
    document.select(&selector).next()
}

/// Text content of the first element matching `css`; empty text counts as absent.
fn first_text(document: &Html, css: &str) -> Option<String> {
    let text: String = first_match(document, css)?.text().collect();
    (!text.is_empty()).then_some(text)
}

/// `content` of the first `<meta name="...">`; empty or missing counts as absent.
fn meta_content(document: &Html, name: &str) -> Option<String> {
    let element = first_match(document, &format!(r#"meta[name="{name}"]"#))?;
    element
        .value()
        .attr("content")
        .filter(|content| !content.is_empty())
        .map(str::to_string)
}

/// The robots default applies only when the tag itself is missing; a present tag
/// is reported as written, even if empty.
fn robots_content(document: &Html) -> String {
    match first_match(document, r#"meta[name="robots"]"#) {
        Some(element) => element.value().attr("content").unwrap_or_default().to_string(),
        None => ROBOTS_DEFAULT.to_string(),
    }
}
