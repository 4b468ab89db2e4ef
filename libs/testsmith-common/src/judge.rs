use crate::config::JudgeSettings;
use crate::types::{JudgeRequest, JudgeResponse};
use std::time::Duration;
use thiserror::Error;

/// Judge HTTP semantics - the only blocking hop in a run.
/// The judge enforces its own sandbox limits; this client only bounds
/// how long the caller is willing to wait.

pub const EXECUTE_PATH: &str = "/execute";

#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("judge request timed out after {0}ms")]
    Timeout(u128),
    #[error("judge request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("judge returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("judge response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Build the execute URL for a judge base address
pub fn execute_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), EXECUTE_PATH)
}

#[derive(Debug, Clone)]
pub struct JudgeClient {
    http: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl JudgeClient {
    pub fn new(settings: &JudgeSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: execute_url(&settings.base_url),
            timeout: settings.timeout,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit a program and wait for its raw output
    pub async fn execute(&self, request: &JudgeRequest) -> Result<JudgeResponse, JudgeError> {
        let send = async {
            let response = self.http.post(&self.endpoint).json(request).send().await?;
            let status = response.status();
            let body = response.text().await?;
            if !status.is_success() {
                return Err(JudgeError::Status {
                    status: status.as_u16(),
                    body,
                });
            }
            Ok(serde_json::from_str::<JudgeResponse>(&body)?)
        };

        match tokio::time::timeout(self.timeout, send).await {
            Ok(result) => result,
            Err(_) => Err(JudgeError::Timeout(self.timeout.as_millis())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_url_trailing_slash() {
        assert_eq!(execute_url("http://judge:2358/"), "http://judge:2358/execute");
        assert_eq!(execute_url("http://judge:2358"), "http://judge:2358/execute");
    }

    #[test]
    fn test_request_wire_format() {
        let request = JudgeRequest {
            language_id: 71,
            source_code: "print(1)".to_string(),
            stdin: String::new(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["language_id"], 71);
        assert_eq!(json["source_code"], "print(1)");
    }

    #[tokio::test]
    async fn test_unreachable_judge_is_an_error() {
        let client = JudgeClient::new(&JudgeSettings {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_millis(500),
        });
        let request = JudgeRequest {
            language_id: 71,
            source_code: String::new(),
            stdin: String::new(),
        };
        assert!(client.execute(&request).await.is_err());
    }
}
