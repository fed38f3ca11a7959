use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use super::{SendAck, Transport, TransportError};
use crate::config::TargetConfig;

/// Batch delivery as a hand-written HTTP/1.1 POST over a raw socket.
///
/// Mirrors what the most constrained firmware clients do: write the request,
/// read whatever the device answers until it closes the connection, and call
/// it a success if the status line contains "200".
pub struct TcpTransport {
    host: String,
    port: u16,
    path: String,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl TcpTransport {
    pub fn new(target: &TargetConfig, connect_timeout: Duration, read_timeout: Duration) -> Self {
        Self {
            host: target.host.clone(),
            port: target.port,
            path: target.path.clone(),
            connect_timeout,
            read_timeout,
        }
    }

    fn request_head(&self, body_len: usize) -> String {
        format!(
            "POST {} HTTP/1.1\r\n\
             Host: {}:{}\r\n\
             Content-Type: application/octet-stream\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\
             \r\n",
            self.path, self.host, self.port, body_len
        )
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn send(&self, payload: Vec<u8>) -> Result<SendAck, TransportError> {
        let mut stream = timeout(
            self.connect_timeout,
            TcpStream::connect((self.host.as_str(), self.port)),
        )
        .await
        .map_err(|_| TransportError::Timeout(self.connect_timeout))??;

        stream
            .write_all(self.request_head(payload.len()).as_bytes())
            .await?;
        stream.write_all(&payload).await?;

        // the device answers and closes (Connection: close), so read to EOF
        let mut response = Vec::new();
        timeout(self.read_timeout, stream.read_to_end(&mut response))
            .await
            .map_err(|_| TransportError::Timeout(self.read_timeout))??;

        let response = String::from_utf8_lossy(&response);
        let status_line = response
            .lines()
            .next()
            .filter(|line| !line.is_empty())
            .ok_or_else(|| TransportError::BadResponse("empty response".to_string()))?;

        let status = status_line
            .split_whitespace()
            .nth(1)
            .and_then(|token| token.parse::<u16>().ok());

        if status_line.contains("200") {
            Ok(SendAck {
                status: status.unwrap_or(200),
            })
        } else {
            match status {
                Some(code) => Err(TransportError::Status(code)),
                None => Err(TransportError::BadResponse(status_line.to_string())),
            }
        }
    }
}
