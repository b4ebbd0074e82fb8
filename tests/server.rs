//! End-to-end tests over a real TCP socket.
//!
//! Each test binds the service on an ephemeral loopback port, serves it on a
//! background task and talks to it with reqwest.

use std::net::SocketAddr;

use aks_demo::{create_router, http, AppState, Metrics};

async fn spawn_server() -> SocketAddr {
    let metrics = Metrics::new().unwrap();
    let app = create_router(AppState::new(metrics));

    let listener = http::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        http::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn serves_all_three_routes() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();
    let base = format!("http://{addr}");

    let greeting = client.get(format!("{base}/")).send().await.unwrap();
    assert_eq!(greeting.status(), 200);
    assert_eq!(
        greeting.text().await.unwrap(),
        "Hello from Azure AKS DevOps demo!\n"
    );

    let health = client.get(format!("{base}/healthz")).send().await.unwrap();
    assert_eq!(health.status(), 200);
    assert_eq!(health.text().await.unwrap(), "ok");

    let metrics = client.get(format!("{base}/metrics")).send().await.unwrap();
    assert_eq!(metrics.status(), 200);
    assert_eq!(
        metrics.headers()["content-type"],
        "text/plain; version=0.0.4; charset=utf-8"
    );
    let body = metrics.text().await.unwrap();
    assert!(body.contains("request_count{endpoint=\"/\"} 1"), "{body}");
}

#[tokio::test]
async fn concurrent_clients_do_not_lose_updates() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();
    let n = 50;

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..n {
        let client = client.clone();
        let url = format!("http://{addr}/");
        tasks.spawn(async move { client.get(url).send().await.unwrap().status() });
    }
    while let Some(status) = tasks.join_next().await {
        assert_eq!(status.unwrap(), 200);
    }

    let body = client
        .get(format!("http://{addr}/metrics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains(&format!("request_count{{endpoint=\"/\"}} {n}")), "{body}");
}
