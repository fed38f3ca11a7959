use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{CONNECTION, CONTENT_TYPE};

use super::{SendAck, Transport, TransportError};
use crate::config::TargetConfig;

/// Batch delivery over a pooled HTTP client.
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    read_timeout: Duration,
}

impl HttpTransport {
    pub fn new(
        target: &TargetConfig,
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(read_timeout)
            .build()?;

        Ok(Self {
            client,
            url: format!("http://{}:{}{}", target.host, target.port, target.path),
            read_timeout,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, payload: Vec<u8>) -> Result<SendAck, TransportError> {
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .header(CONNECTION, "close")
            .body(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout(self.read_timeout)
                } else {
                    TransportError::Http(e)
                }
            })?;

        let status = response.status();
        if status == StatusCode::OK {
            Ok(SendAck {
                status: status.as_u16(),
            })
        } else {
            Err(TransportError::Status(status.as_u16()))
        }
    }
}
