//! 校验服务的 HTTP 传输层
//!
//! 每次提交发出一个 POST `{ "text": ... }`，失败时归类为三种错误之一。

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde_json::Value;

use crate::config::Config;
use crate::models::ValidationRequest;

const CLIENT_FALLBACK_MESSAGE: &str = "Failed to validate news. Please try again.";

/// 请求已发出但没有拿到响应
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkFailure {
    TimedOut(Duration),
    NoResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// 服务端返回非 2xx
    #[error("Server error: {status} - {}", .message.as_deref().unwrap_or("Unknown error"))]
    Server { status: u16, message: Option<String> },
    #[error("{}", network_message(.0))]
    Network(NetworkFailure),
    /// 请求无法构造或发送
    #[error("{}", client_message(.0))]
    Client(String),
}

fn network_message(failure: &NetworkFailure) -> String {
    match failure {
        NetworkFailure::TimedOut(after) => format!(
            "Network error: request timed out after {} seconds.",
            after.as_secs()
        ),
        NetworkFailure::NoResponse => {
            "Network error: Please check your connection and try again.".to_string()
        }
    }
}

fn client_message(reason: &str) -> &str {
    if reason.is_empty() {
        CLIENT_FALLBACK_MESSAGE
    } else {
        reason
    }
}

/// 校验服务客户端
#[derive(Debug, Clone)]
pub struct ValidationClient {
    http: reqwest::Client,
    endpoint: reqwest::Url,
    timeout: Duration,
}

impl ValidationClient {
    pub fn new(config: &Config) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            timeout: config.timeout,
        })
    }

    /// 提交文本，返回原始响应体
    pub async fn validate(&self, text: &str) -> Result<Value, TransportError> {
        let request = ValidationRequest {
            text: text.to_string(),
        };

        tracing::debug!(endpoint = %self.endpoint, chars = text.chars().count(), "POST validation request");

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(&e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.classify(&e))?;
        let payload = decode_body(&body);

        if !status.is_success() {
            let message = payload
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .map(str::to_string);
            tracing::warn!(status = status.as_u16(), ?message, "validation endpoint returned error status");
            return Err(TransportError::Server {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "validation response received");
        Ok(payload)
    }

    fn classify(&self, err: &reqwest::Error) -> TransportError {
        let classified = if err.is_timeout() {
            TransportError::Network(NetworkFailure::TimedOut(self.timeout))
        } else if err.is_builder() {
            TransportError::Client(err.to_string())
        } else if err.is_connect() || err.is_request() || err.is_body() || err.is_decode() {
            TransportError::Network(NetworkFailure::NoResponse)
        } else {
            TransportError::Client(err.to_string())
        };
        tracing::warn!(error = %err, ?classified, "validation request failed");
        classified
    }
}

/// 非 JSON 的响应体按字符串处理
fn decode_body(body: &[u8]) -> Value {
    match serde_json::from_slice::<Value>(body) {
        Ok(value) => value,
        Err(_) if body.is_empty() => Value::Null,
        Err(_) => Value::String(String::from_utf8_lossy(body).into_owned()),
    }
}
