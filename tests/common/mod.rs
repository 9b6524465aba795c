//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use legacy_gateway::codec::charset;
use legacy_gateway::codec::fixed::pad_or_truncate;
use legacy_gateway::codec::HEADER_LEN;
use legacy_gateway::config::{DestinationConfig, GatewayConfig, RouteConfig};

/// What the stub backend does with one request.
pub enum Script {
    /// Send this line (LF appended).
    Reply(String),
    /// Keep the connection open without answering.
    Hang,
}

type Handler = dyn Fn(&str) -> Script + Send + Sync;

/// A legacy backend stub: reads one framed request per connection and
/// answers according to its script.
pub struct LegacyBackend {
    pub addr: SocketAddr,
    accepts: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl LegacyBackend {
    pub async fn start<F>(script: F) -> Self
    where
        F: Fn(&str) -> Script + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let accepts = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let script: Arc<Handler> = Arc::new(script);

        let (a, r) = (accepts.clone(), requests.clone());
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                a.fetch_add(1, Ordering::SeqCst);
                let (script, requests) = (script.clone(), r.clone());
                tokio::spawn(async move {
                    let _ = serve(socket, script, requests).await;
                });
            }
        });

        Self {
            addr,
            accepts,
            requests,
        }
    }

    pub fn accepts(&self) -> usize {
        self.accepts.load(Ordering::SeqCst)
    }

    /// Decoded requests received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn serve(
    mut socket: TcpStream,
    script: Arc<Handler>,
    requests: Arc<Mutex<Vec<String>>>,
) -> std::io::Result<()> {
    let mut frame = vec![0u8; HEADER_LEN];
    socket.read_exact(&mut frame).await?;
    let declared: usize = String::from_utf8_lossy(&frame[62..67])
        .trim()
        .parse()
        .unwrap_or(0);
    let mut body = vec![0u8; declared];
    socket.read_exact(&mut body).await?;
    frame.extend_from_slice(&body);

    let request = charset::decode(&frame);
    requests.lock().unwrap().push(request.clone());

    match script(&request) {
        Script::Reply(line) => {
            let mut bytes = charset::encode(&line).unwrap();
            bytes.push(b'\n');
            socket.write_all(&bytes).await?;
        }
        Script::Hang => tokio::time::sleep(Duration::from_secs(30)).await,
    }
    Ok(())
}

/// Echo of the request, then the business window, then `data`.
pub fn reply_line(request: &str, code: &str, message: &str, data: &str) -> String {
    let mut line = request.to_string();
    line.push_str(&pad_or_truncate(code, 2));
    line.push_str(&pad_or_truncate(message, 50));
    line.push_str(data);
    line
}

/// Echo of the request with the header error window filled in.
pub fn header_error_line(request: &str, code: &str, message: &str) -> String {
    let runes: Vec<char> = request.chars().collect();
    let mut line: String = runes[..67].iter().collect();
    line.push_str(&pad_or_truncate(code, 6));
    line.push_str(&pad_or_truncate(message, 50));
    line.extend(runes[HEADER_LEN..].iter());
    line.push_str(&pad_or_truncate("", 52));
    line
}

fn route(service: &str, request_length: &str) -> RouteConfig {
    RouteConfig {
        system: "CRS".into(),
        service: service.into(),
        format: "01".into(),
        request_length: request_length.into(),
    }
}

/// A configuration routing every operation to `backend` on destination `crs`.
pub fn config_for(backend: SocketAddr) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.timeouts.dial_ms = 1_000;
    config.timeouts.read_write_ms = 500;
    config.routes = HashMap::from([
        ("POST /v1/cards/inquiry".to_string(), route("INQUIRY", "00123")),
        ("POST /v1/cards/spending".to_string(), route("SPEND", "00123")),
        ("POST /v1/cards/payments".to_string(), route("PAYPOST", "00080")),
    ]);

    let port = vec![backend.port().to_string()];
    config.destinations = HashMap::from([(
        "crs".to_string(),
        DestinationConfig {
            kind: "tcp".into(),
            ip: backend.ip().to_string(),
            ports: HashMap::from([
                ("card_inquiry".to_string(), port.clone()),
                ("spending_history".to_string(), port.clone()),
                ("payment_posting".to_string(), port),
            ]),
        },
    )]);
    config
}

/// Reply data for a spending history page with the given blocks.
pub fn spending_data(card_no: &str, total: &str, more: bool, blocks: &[String]) -> String {
    let mut data = pad_or_truncate(card_no, 16);
    data.push_str(total);
    data.push(if more { 'Y' } else { 'N' });
    data.push_str(&format!("{:03}", blocks.len()));
    for block in blocks {
        data.push_str(block);
    }
    data
}

/// One 84-rune transaction block.
pub fn transaction_block(date: &str, time: &str, merchant: &str, amount: &str, auth: &str) -> String {
    let mut block = String::new();
    block.push_str(date);
    block.push_str(time);
    block.push_str(date);
    block.push_str(&pad_or_truncate(merchant, 40));
    block.push_str(amount);
    block.push_str("THB");
    block.push_str(&pad_or_truncate(auth, 6));
    block
}
