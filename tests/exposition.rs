//! End-to-end scrape of the exposition server.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use mirror_monitor::http::{ExpositionServer, EXPOSITION_CONTENT_TYPE};
use mirror_monitor::lifecycle::Shutdown;
use mirror_monitor::observability::GaugeStore;
use mirror_monitor::probe::Prober;
use mirror_monitor::refresh::{ProbeTargets, RefreshTask};
use tokio::net::TcpListener;

mod common;

#[tokio::test]
async fn test_scrape_after_refresh_cycle() {
    let mirror = common::url_for(common::start_mock_mirror(common::reference_time(), 200).await);
    let store = GaugeStore::new();
    let task = RefreshTask::new(
        Prober::new(common::test_client()),
        store.clone(),
        ProbeTargets {
            freshness_url: mirror.clone(),
            availability_url: mirror,
            backends: vec!["backend1".into(), "backend2".into()],
        },
        Duration::from_secs(3600),
    );
    task.refresh_once().await;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = tokio::spawn(ExpositionServer::new(store).run(listener, shutdown.subscribe()));

    let response = common::test_client()
        .get(format!("http://{}/metrics", addr))
        .send()
        .await
        .expect("exposition server unreachable");

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()[reqwest::header::CONTENT_TYPE],
        EXPOSITION_CONTENT_TYPE
    );

    let body = response.text().await.unwrap();
    assert!(body.contains("# HELP govuk_mirror_last_updated_time Last time the mirror was updated"));
    assert!(body.contains("# TYPE govuk_mirror_response_status_code gauge"));
    assert!(body.contains("govuk_mirror_last_updated_time{backend=\"backend1\"} 1136214245"));
    assert!(body.contains("govuk_mirror_last_updated_time{backend=\"backend2\"} 1136127845"));
    assert!(body.contains("govuk_mirror_response_status_code{backend=\"backend2\"} 200"));

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("exposition server did not stop")
        .unwrap()
        .unwrap();
}

/// Every non-comment line must be a whole `series value` sample.
fn assert_complete_samples(body: &str, freshness_values: &[f64]) {
    for line in body.lines().filter(|l| !l.is_empty() && !l.starts_with('#')) {
        let (series, value) = line
            .rsplit_once(' ')
            .unwrap_or_else(|| panic!("incomplete sample line {line:?}"));
        let value: f64 = value
            .parse()
            .unwrap_or_else(|_| panic!("unparseable value in {line:?}"));
        assert!(series.ends_with("\"}"), "truncated labels in {line:?}");

        if series.starts_with("govuk_mirror_last_updated_time{") {
            assert!(freshness_values.contains(&value), "unexpected freshness in {line:?}");
        } else if series.starts_with("govuk_mirror_response_status_code{") {
            assert_eq!(value, 200.0, "unexpected status in {line:?}");
        } else {
            panic!("unexpected series {line:?}");
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_scrapes_during_refresh_cycles_see_whole_samples() {
    let newer = common::reference_time();
    let older = newer - chrono::Duration::hours(1);
    let serve_newer = Arc::new(AtomicBool::new(true));
    let flag = serve_newer.clone();
    let mirror = common::url_for(
        common::start_programmable_mirror(move |_| {
            let time = if flag.load(Ordering::SeqCst) { newer } else { older };
            (200, Some(common::http_date(time)))
        })
        .await,
    );

    let store = GaugeStore::new();
    let task = RefreshTask::new(
        Prober::new(common::test_client()),
        store.clone(),
        ProbeTargets {
            freshness_url: mirror.clone(),
            availability_url: mirror,
            backends: (1..=4).map(|i| format!("backend{i}")).collect(),
        },
        Duration::from_secs(3600),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let metrics_url = format!("http://{}/metrics", listener.local_addr().unwrap());
    let shutdown = Shutdown::new();
    let server = tokio::spawn(ExpositionServer::new(store.clone()).run(listener, shutdown.subscribe()));

    let allowed = [newer.timestamp() as f64, older.timestamp() as f64];
    let done = Arc::new(AtomicBool::new(false));
    let scraper = {
        let done = done.clone();
        let metrics_url = metrics_url.clone();
        tokio::spawn(async move {
            let client = common::test_client();
            let mut scrapes = 0usize;
            loop {
                let body = client.get(&metrics_url).send().await.unwrap().text().await.unwrap();
                assert_complete_samples(&body, &allowed);
                scrapes += 1;
                if done.load(Ordering::SeqCst) {
                    break;
                }
            }
            scrapes
        })
    };

    for cycle in 0..10 {
        serve_newer.store(cycle % 2 == 0, Ordering::SeqCst);
        let report = task.refresh_once().await;
        assert_eq!(report.failures(), 0);
    }

    done.store(true, Ordering::SeqCst);
    let scrapes = scraper.await.unwrap();

    let body = common::test_client()
        .get(&metrics_url)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_complete_samples(&body, &allowed);
    assert!(scrapes >= 1);
    assert_eq!(store.series_count("govuk_mirror_last_updated_time"), 4);
    assert_eq!(store.freshness("backend4"), Some(older.timestamp() as f64));

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("exposition server did not stop")
        .unwrap()
        .unwrap();
}
