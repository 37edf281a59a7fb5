// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

// Integration tests for the page analyzer.
// A fixture site is served from 127.0.0.1 on an ephemeral port, so no external
// network access is needed.

use axum::{
    http::StatusCode,
    response::{Html, Redirect},
    routing::get,
    Router,
};
use seo_agent::models::analysis::{
    CheckStatus, DESCRIPTION_NOT_FOUND, H1_NOT_FOUND, ROBOTS_DEFAULT, TITLE_NOT_FOUND,
    VIEWPORT_NOT_FOUND,
};
use seo_agent::services::analyzer::{AnalysisError, AnalyzerConfig, PageAnalyzer};
use std::net::SocketAddr;
use std::time::{Duration, Instant};

const HOME_PAGE: &str = r#"<!DOCTYPE html>
<html>
    <head>
        <title>Home</title>
        <meta name="viewport" content="width=device-width, initial-scale=1">
    </head>
    <body><h1>Welcome</h1></body>
</html>"#;

const SITEMAP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"></urlset>"#;

fn fixture_site(with_sitemap: bool) -> Router {
    let mut router = Router::new()
        .route("/", get(|| async { Html(HOME_PAGE) }))
        .route(
            "/bare",
            get(|| async { Html("<html><body><p>Nothing here</p></body></html>") }),
        )
        .route(
            "/missing",
            get(|| async { (StatusCode::NOT_FOUND, "gone") }),
        )
        .route("/huge", get(|| async { Html("a".repeat(4096)) }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Html(HOME_PAGE)
            }),
        );

    if with_sitemap {
        // GET routes answer HEAD as well
        router = router.route("/sitemap.xml", get(|| async { SITEMAP }));
    }

    router
}

async fn spawn_site(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fixture site");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    addr
}

/// Site whose pages redirect either to itself or to the same server under `localhost`.
async fn spawn_redirecting_site() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fixture site");
    let addr = listener.local_addr().unwrap();

    let same_host = format!("http://127.0.0.1:{}/", addr.port());
    let other_host = format!("http://localhost:{}/", addr.port());

    let router = Router::new()
        .route("/", get(|| async { Html(HOME_PAGE) }))
        .route(
            "/to-same-host",
            get(move || {
                let target = same_host.clone();
                async move { Redirect::temporary(&target) }
            }),
        )
        .route(
            "/to-other-host",
            get(move || {
                let target = other_host.clone();
                async move { Redirect::temporary(&target) }
            }),
        );

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    addr
}

fn test_analyzer() -> PageAnalyzer {
    PageAnalyzer::new(AnalyzerConfig {
        fetch_timeout: Duration::from_secs(5),
        probe_timeout: Duration::from_secs(2),
        ..AnalyzerConfig::default()
    })
    .expect("Failed to build analyzer")
}

#[tokio::test]
async fn test_analyze_home_page() {
    let addr = spawn_site(fixture_site(true)).await;
    let url = format!("http://{addr}");

    let result = test_analyzer().analyze(&url).await.unwrap();

    assert_eq!(result.url, url);
    assert_eq!(result.title, "Home");
    assert_eq!(result.description, DESCRIPTION_NOT_FOUND);
    assert_eq!(result.h1, "Welcome");
    assert_eq!(result.viewport, "width=device-width, initial-scale=1");
    assert_eq!(result.robots_meta, ROBOTS_DEFAULT);
    assert!(!result.is_https);
    assert!(result.dns_resolved);
    assert!(result.sitemap_exists);
    assert!(result.load_time_ms < 3000);

    let statuses: Vec<CheckStatus> = result.checklist.iter().map(|item| item.status).collect();
    assert_eq!(
        statuses,
        vec![
            CheckStatus::Pass, // title
            CheckStatus::Fail, // description
            CheckStatus::Pass, // h1
            CheckStatus::Pass, // viewport
            CheckStatus::Pass, // robots
            CheckStatus::Fail, // https
            CheckStatus::Pass, // load time
            CheckStatus::Pass, // dns
            CheckStatus::Pass, // sitemap
        ]
    );
}

#[tokio::test]
async fn test_localhost_hostname_is_resolved() {
    let addr = spawn_site(fixture_site(true)).await;
    let url = format!("http://localhost:{}", addr.port());

    let result = test_analyzer().analyze(&url).await.unwrap();

    assert!(result.dns_resolved);
    assert_eq!(result.title, "Home");
}

#[tokio::test]
async fn test_trailing_slash_doubles_sitemap_slash() {
    let addr = spawn_site(fixture_site(true)).await;

    // "http://host/" + "/sitemap.xml" requests "//sitemap.xml", which the site does not serve
    let result = test_analyzer()
        .analyze(&format!("http://{addr}/"))
        .await
        .unwrap();

    assert_eq!(result.title, "Home");
    assert!(!result.sitemap_exists);
    assert_eq!(result.checklist[8].status, CheckStatus::Fail);
}

#[tokio::test]
async fn test_missing_sitemap_is_soft_failure() {
    let addr = spawn_site(fixture_site(false)).await;

    let result = test_analyzer()
        .analyze(&format!("http://{addr}"))
        .await
        .unwrap();

    assert!(!result.sitemap_exists);
    assert_eq!(result.checklist.len(), 9);
    assert_eq!(result.checklist[8].value, "Not found");
}

#[tokio::test]
async fn test_bare_page_reports_sentinels() {
    let addr = spawn_site(fixture_site(true)).await;

    let result = test_analyzer()
        .analyze(&format!("http://{addr}/bare"))
        .await
        .unwrap();

    assert_eq!(result.title, TITLE_NOT_FOUND);
    assert_eq!(result.description, DESCRIPTION_NOT_FOUND);
    assert_eq!(result.h1, H1_NOT_FOUND);
    assert_eq!(result.viewport, VIEWPORT_NOT_FOUND);
    assert_eq!(result.robots_meta, ROBOTS_DEFAULT);
    // Sitemap is looked up under the page URL itself
    assert!(!result.sitemap_exists);
}

#[tokio::test]
async fn test_error_status_is_fatal() {
    let addr = spawn_site(fixture_site(true)).await;

    let err = test_analyzer()
        .analyze(&format!("http://{addr}/missing"))
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::Fetch(_)));
    assert!(!err.is_client_error());
}

#[tokio::test]
async fn test_slow_page_hits_fetch_timeout() {
    let addr = spawn_site(fixture_site(true)).await;
    let analyzer = PageAnalyzer::new(AnalyzerConfig {
        fetch_timeout: Duration::from_millis(200),
        ..AnalyzerConfig::default()
    })
    .unwrap();

    let err = analyzer
        .analyze(&format!("http://{addr}/slow"))
        .await
        .unwrap_err();

    match err {
        AnalysisError::Fetch(source) => assert!(source.is_timeout()),
        other => panic!("expected fetch timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_host_is_fatal() {
    // Nothing listens on port 1
    let err = test_analyzer()
        .analyze("http://127.0.0.1:1/")
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::Fetch(_)));
    assert!(err.details().starts_with("failed to fetch page: "));
}

#[tokio::test]
async fn test_slow_sitemap_hits_probe_timeout() {
    let site = Router::new()
        .route("/", get(|| async { Html(HOME_PAGE) }))
        .route(
            "/sitemap.xml",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                SITEMAP
            }),
        );
    let addr = spawn_site(site).await;
    let analyzer = PageAnalyzer::new(AnalyzerConfig {
        probe_timeout: Duration::from_millis(300),
        ..AnalyzerConfig::default()
    })
    .unwrap();

    let start = Instant::now();
    let result = analyzer.analyze(&format!("http://{addr}")).await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(result.title, "Home");
    assert!(!result.sitemap_exists);
    assert_eq!(result.checklist[8].status, CheckStatus::Fail);
    assert!(
        elapsed >= Duration::from_millis(300),
        "finished before the sitemap check timed out: {elapsed:?}"
    );
    assert!(
        elapsed < Duration::from_secs(5),
        "sitemap check was not bounded: {elapsed:?}"
    );
}

#[tokio::test]
async fn test_oversized_body_is_fatal() {
    let addr = spawn_site(fixture_site(true)).await;
    let analyzer = PageAnalyzer::new(AnalyzerConfig {
        max_body_bytes: 1024,
        ..AnalyzerConfig::default()
    })
    .unwrap();

    let err = analyzer
        .analyze(&format!("http://{addr}/huge"))
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::BodyTooLarge { limit: 1024 }));
    assert!(!err.is_client_error());

    // The same page fits under the default cap
    let result = test_analyzer()
        .analyze(&format!("http://{addr}/huge"))
        .await
        .unwrap();
    assert_eq!(result.title, TITLE_NOT_FOUND);
}

#[tokio::test]
async fn test_insecure_tls_client_follows_redirects_on_trusted_host() {
    let addr = spawn_redirecting_site().await;
    let analyzer = PageAnalyzer::new(AnalyzerConfig {
        insecure_tls_hosts: vec!["127.0.0.1".to_string()],
        ..AnalyzerConfig::default()
    })
    .unwrap();

    let result = analyzer
        .analyze(&format!("http://{addr}/to-same-host"))
        .await
        .unwrap();

    assert_eq!(result.title, "Home");
}

#[tokio::test]
async fn test_insecure_tls_client_refuses_redirect_to_untrusted_host() {
    let addr = spawn_redirecting_site().await;
    let analyzer = PageAnalyzer::new(AnalyzerConfig {
        insecure_tls_hosts: vec!["127.0.0.1".to_string()],
        ..AnalyzerConfig::default()
    })
    .unwrap();

    let err = analyzer
        .analyze(&format!("http://{addr}/to-other-host"))
        .await
        .unwrap_err();

    match &err {
        AnalysisError::Fetch(source) => assert!(source.is_redirect()),
        other => panic!("expected refused redirect, got {other:?}"),
    }
    assert!(err.details().contains("refusing redirect to localhost"));
}

#[tokio::test]
async fn test_validating_client_follows_redirect_to_other_host() {
    let addr = spawn_redirecting_site().await;

    let result = test_analyzer()
        .analyze(&format!("http://{addr}/to-other-host"))
        .await
        .unwrap();

    assert_eq!(result.title, "Home");
}
