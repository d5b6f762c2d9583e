//! Local HTTP stub for exercising the NewsAPI client without the network.

#![allow(dead_code)]

use std::time::Duration;

use newsearch::api::NewsApiClient;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Answers one request with `status` and `body`, then closes. The receiver
/// yields the request head.
pub async fn serve_once(
    status: &'static str,
    body: &'static str,
) -> (String, oneshot::Receiver<String>) {
    serve_after(Duration::ZERO, status, body).await
}

/// Like [`serve_once`], but waits `delay` after reading the request before
/// replying.
pub async fn serve_after(
    delay: Duration,
    status: &'static str,
    body: &'static str,
) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }
        let _ = tx.send(String::from_utf8_lossy(&head).into_owned());

        tokio::time::sleep(delay).await;
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        // The client may have given up already.
        let _ = stream.write_all(response.as_bytes()).await;
        stream.shutdown().await.ok();
    });

    (format!("http://{addr}/v2/everything"), rx)
}

/// An endpoint nothing listens on.
pub async fn dead_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/v2/everything")
}

pub fn client(endpoint: &str, api_key: &str) -> NewsApiClient {
    let http = reqwest::Client::builder().no_proxy().build().unwrap();
    NewsApiClient::with_client(http, endpoint, api_key)
}
