//! One-shot TCP exchange with the legacy backend.
//!
//! # Responsibilities
//! - Open a fresh connection per call under the dial timeout
//! - Write the whole frame once under the read/write timeout
//! - Read exactly one line, up to and including LF, under the same timeout
//!   and a maximum reply size
//!
//! The stream is owned by the call and dropped on every exit path.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::config::GatewayConfig;

const DEFAULT_MAX_REPLY_BYTES: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to connect to {addr}: {source}")]
    Dial {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("connect to {addr} timed out after {after:?}")]
    DialTimeout { addr: SocketAddr, after: Duration },

    #[error("write failed: {0}")]
    Write(#[source] io::Error),

    #[error("write timed out after {0:?}")]
    WriteTimeout(Duration),

    #[error("read timed out after {0:?}")]
    ReadTimeout(Duration),

    #[error("read failed: {0}")]
    Read(#[source] io::Error),

    #[error("call cancelled")]
    Cancelled,
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            TransportError::DialTimeout { .. }
                | TransportError::WriteTimeout(_)
                | TransportError::ReadTimeout(_)
        )
    }

    /// Stable label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            TransportError::Dial { .. } => "dial",
            TransportError::DialTimeout { .. } => "dial_timeout",
            TransportError::Write(_) => "write",
            TransportError::WriteTimeout(_) => "write_timeout",
            TransportError::ReadTimeout(_) => "read_timeout",
            TransportError::Read(_) => "read",
            TransportError::Cancelled => "cancelled",
        }
    }
}

/// Dial/write/read settings for backend calls.
#[derive(Debug, Clone)]
pub struct Transport {
    dial_timeout: Duration,
    rw_timeout: Duration,
    max_reply_bytes: usize,
}

impl Transport {
    pub fn new(dial_timeout: Duration, rw_timeout: Duration) -> Self {
        Self {
            dial_timeout,
            rw_timeout,
            max_reply_bytes: DEFAULT_MAX_REPLY_BYTES,
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(config.timeouts.dial(), config.timeouts.read_write())
            .with_max_reply_bytes(config.transport.max_reply_bytes)
    }

    /// Longest accepted reply, LF included.
    pub fn with_max_reply_bytes(mut self, max: usize) -> Self {
        self.max_reply_bytes = max;
        self
    }

    /// Send one frame and return the reply line without its terminator.
    pub async fn send_and_receive(
        &self,
        addr: SocketAddr,
        payload: &[u8],
    ) -> Result<Vec<u8>, TransportError> {
        self.send_and_receive_until(addr, payload, std::future::pending())
            .await
    }

    /// Like [`send_and_receive`](Self::send_and_receive), but gives up with
    /// [`TransportError::Cancelled`] as soon as `cancel` resolves.
    pub async fn send_and_receive_until<F>(
        &self,
        addr: SocketAddr,
        payload: &[u8],
        cancel: F,
    ) -> Result<Vec<u8>, TransportError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            _ = cancel => {
                tracing::debug!(addr = %addr, "Backend call cancelled");
                Err(TransportError::Cancelled)
            }
            result = self.exchange(addr, payload) => result,
        }
    }

    async fn exchange(&self, addr: SocketAddr, payload: &[u8]) -> Result<Vec<u8>, TransportError> {
        let mut stream = match timeout(self.dial_timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => return Err(TransportError::Dial { addr, source }),
            Err(_) => {
                return Err(TransportError::DialTimeout {
                    addr,
                    after: self.dial_timeout,
                })
            }
        };

        match timeout(self.rw_timeout, stream.write_all(payload)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(TransportError::Write(e)),
            Err(_) => return Err(TransportError::WriteTimeout(self.rw_timeout)),
        }

        let limit = self.max_reply_bytes as u64;
        let mut reader = BufReader::new(stream.take(limit));
        let mut line = Vec::new();
        match timeout(self.rw_timeout, reader.read_until(b'\n', &mut line)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(TransportError::Read(e)),
            Err(_) => return Err(TransportError::ReadTimeout(self.rw_timeout)),
        }

        if line.last() != Some(&b'\n') {
            let error = if line.len() as u64 >= limit {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("reply exceeds {} bytes", self.max_reply_bytes),
                )
            } else {
                io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("connection closed after {} bytes without a line end", line.len()),
                )
            };
            return Err(TransportError::Read(error));
        }

        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }

        tracing::trace!(addr = %addr, sent = payload.len(), received = line.len(), "Backend exchange complete");
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    const SHORT: Duration = Duration::from_millis(150);

    fn transport() -> Transport {
        Transport::new(Duration::from_secs(2), Duration::from_secs(2))
    }

    /// Accept one connection, read `expect` bytes, write `reply`, then either
    /// close or hold the socket open for `hold`.
    async fn backend(expect: usize, reply: &'static [u8], hold: Duration) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; expect];
            socket.read_exact(&mut buf).await.unwrap();
            socket.write_all(reply).await.unwrap();
            tokio::time::sleep(hold).await;
        });
        addr
    }

    #[tokio::test]
    async fn reads_one_line_and_strips_terminator() {
        let addr = backend(4, b"REPLY\r\nTRAILING", Duration::from_millis(200)).await;
        let reply = transport().send_and_receive(addr, b"PING").await.unwrap();
        assert_eq!(reply, b"REPLY");
    }

    #[tokio::test]
    async fn silent_backend_is_a_read_timeout() {
        let addr = backend(4, b"", Duration::from_secs(5)).await;
        let err = Transport::new(Duration::from_secs(2), SHORT)
            .send_and_receive(addr, b"PING")
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::ReadTimeout(_)));
        assert!(err.is_timeout());
        assert_eq!(err.kind(), "read_timeout");
    }

    #[tokio::test]
    async fn refused_connection_is_a_dial_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = transport().send_and_receive(addr, b"PING").await.unwrap_err();
        assert!(matches!(err, TransportError::Dial { .. }));
        assert!(!err.is_timeout());
    }

    #[tokio::test]
    async fn eof_before_line_end_is_a_read_error() {
        let addr = backend(4, b"PARTIAL", Duration::ZERO).await;
        let err = transport().send_and_receive(addr, b"PING").await.unwrap_err();
        let TransportError::Read(io) = err else {
            panic!("expected read error");
        };
        assert_eq!(io.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[tokio::test]
    async fn oversize_reply_is_a_read_error() {
        let addr = backend(4, b"0123456789ABCDEF\n", Duration::from_millis(200)).await;
        let err = transport()
            .with_max_reply_bytes(8)
            .send_and_receive(addr, b"PING")
            .await
            .unwrap_err();
        let TransportError::Read(io) = err else {
            panic!("expected read error");
        };
        assert_eq!(io.kind(), io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn cancel_hook_ends_the_call() {
        let addr = backend(4, b"", Duration::from_secs(5)).await;
        let err = transport()
            .send_and_receive_until(addr, b"PING", tokio::time::sleep(SHORT))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Cancelled));
        assert!(!err.is_timeout());
    }
}
