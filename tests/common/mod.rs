//! Shared utilities for integration tests: mock mirrors on ephemeral ports.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::header::LAST_MODIFIED;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use tokio::net::TcpListener;
use url::Url;

pub const BACKEND_OVERRIDE: &str = "backend-override";

/// 2006-01-02T15:04:05Z
pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap()
}

pub fn http_date(time: DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

pub fn url_for(addr: SocketAddr) -> Url {
    Url::parse(&format!("http://{}/", addr)).unwrap()
}

/// HTTP client that ignores proxy settings from the environment.
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Address nothing is listening on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Start a programmable mirror.
///
/// `f` receives the `Backend-Override` header (if any) and returns the status
/// code plus an optional raw `Last-Modified` value.
pub async fn start_programmable_mirror<F>(f: F) -> SocketAddr
where
    F: Fn(Option<&str>) -> (u16, Option<String>) + Send + Sync + 'static,
{
    let f = Arc::new(f);
    let app = Router::new().fallback(move |headers: HeaderMap| {
        let f = f.clone();
        async move {
            let backend = headers.get(BACKEND_OVERRIDE).and_then(|v| v.to_str().ok());
            let (status, last_modified) = f(backend);

            let mut response: Response = StatusCode::from_u16(status).unwrap().into_response();
            if let Some(value) = last_modified {
                response
                    .headers_mut()
                    .insert(LAST_MODIFIED, HeaderValue::from_str(&value).unwrap());
            }
            response
        }
    });
    serve(app).await
}

/// Mirror that knows `backend1` and `backend2`; `backend2` was updated one
/// day before `last_modified`. Unknown or missing backends get a 400.
pub async fn start_mock_mirror(last_modified: DateTime<Utc>, status: u16) -> SocketAddr {
    start_programmable_mirror(move |backend| match backend {
        Some("backend1") => (status, Some(http_date(last_modified))),
        Some("backend2") => (status, Some(http_date(last_modified - chrono::Duration::days(1)))),
        _ => (400, None),
    })
    .await
}

/// Mirror that answers 200 only after `delay`.
pub async fn start_slow_mirror(delay: Duration) -> SocketAddr {
    let app = Router::new().fallback(move || async move {
        tokio::time::sleep(delay).await;
        StatusCode::OK
    });
    serve(app).await
}
