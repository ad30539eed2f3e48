//! Live listener tests: bind, scrape over TCP, cancel, shut down.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;

use bpfstats_core::LabelSet;
use bpfstats_exporter::config::ExporterConfig;
use bpfstats_exporter::{IncrementInstrument, MetricsProvider, PrometheusProvider, SetInstrument};

fn local_config() -> ExporterConfig {
    ExporterConfig {
        listen_host: "127.0.0.1".into(),
        port: 0,
        shutdown_timeout_ms: 500,
        ..ExporterConfig::default()
    }
}

async fn scrape(addr: SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let req = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(req.as_bytes()).await.unwrap();
    let mut buf = String::new();
    stream.read_to_string(&mut buf).await.unwrap();
    buf
}

#[tokio::test]
async fn serves_instrument_state_on_configured_path() {
    let token = CancellationToken::new();
    let cfg = ExporterConfig {
        path: "/stats".into(),
        ..local_config()
    };
    let provider = PrometheusProvider::start(cfg, token.clone()).await.unwrap();
    let addr = provider.local_addr().unwrap();

    let status = provider.new_set_counter("push_bytes").unwrap();
    let ok = LabelSet::new().with("status", "ok");
    status.set(10, &ok).unwrap();
    status.set(10, &ok).unwrap();
    status.set(15, &ok).unwrap();

    let pushes = provider.new_increment_counter("pushes").unwrap();
    let push = LabelSet::new().with("op", "push");
    for _ in 0..3 {
        pushes.increment(&push).unwrap();
    }

    let resp = scrape(addr, "/stats").await;
    assert!(resp.starts_with("HTTP/1.1 200"), "{resp}");
    assert!(resp.contains("push_bytes{status=\"ok\"} 15\n"), "{resp}");
    assert!(resp.contains("pushes{op=\"push\"} 3\n"), "{resp}");

    let resp = scrape(addr, "/metrics").await;
    assert!(resp.starts_with("HTTP/1.1 404"), "{resp}");

    provider.shutdown().await;
}

#[tokio::test]
async fn already_bound_port_is_an_error() {
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port();

    let cfg = ExporterConfig {
        port,
        ..local_config()
    };
    let err = PrometheusProvider::start(cfg, CancellationToken::new())
        .await
        .err()
        .expect("bind must fail");
    assert_eq!(err.kind().as_str(), "BIND");
}

#[tokio::test]
async fn invalid_config_is_rejected_before_binding() {
    let cfg = ExporterConfig {
        path: "metrics".into(),
        ..local_config()
    };
    let err = PrometheusProvider::start(cfg, CancellationToken::new())
        .await
        .err()
        .expect("must fail");
    assert_eq!(err.kind().as_str(), "CONFIG");
}

#[tokio::test]
async fn cancellation_stops_the_listener() {
    let token = CancellationToken::new();
    let provider = PrometheusProvider::start(local_config(), token.clone()).await.unwrap();
    let addr = provider.local_addr().unwrap();
    assert!(provider.is_running());

    token.cancel();
    token.cancel();

    tokio::time::timeout(Duration::from_secs(2), async {
        while provider.is_running() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("listener must stop after cancellation");

    assert!(TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn shutdown_is_idempotent_and_bounded() {
    let token = CancellationToken::new();
    let provider = PrometheusProvider::start(local_config(), token.clone()).await.unwrap();

    // A client that connects and never sends a request must not hold
    // shutdown past the timeout.
    let _idle = TcpStream::connect(provider.local_addr().unwrap()).await.unwrap();

    tokio::time::timeout(Duration::from_secs(2), provider.shutdown())
        .await
        .expect("first shutdown must finish within the timeout");
    tokio::time::timeout(Duration::from_millis(100), provider.shutdown())
        .await
        .expect("second shutdown is a no-op");

    assert!(token.is_cancelled());
    assert!(!provider.is_running());
}

#[tokio::test]
async fn detached_provider_has_no_listener() {
    let provider = PrometheusProvider::detached(None);
    assert!(provider.local_addr().is_none());
    assert!(!provider.is_running());
    provider.shutdown().await;
}
