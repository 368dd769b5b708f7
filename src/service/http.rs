use super::AnalysisClient;
use crate::error::{BasmiError, Result, SubmitError};
use basmi_common::UploadPayload;
use serde_json::Value;
use std::time::Duration;

/// エラーメッセージに含めるレスポンス本文の上限
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    client: reqwest::Client,
    timeout_seconds: u64,
}

impl HttpAnalysisClient {
    pub fn new(timeout_seconds: u64) -> Result<Self> {
        // 解析サービスはLAN内にあるためプロキシを通さない
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| BasmiError::Config(format!("HTTPクライアントを作成できません: {}", e)))?;
        Ok(Self {
            client,
            timeout_seconds,
        })
    }

    fn transport_error(&self, error: reqwest::Error) -> SubmitError {
        if error.is_timeout() {
            SubmitError::Timeout(self.timeout_seconds)
        } else {
            SubmitError::Transport(error.to_string())
        }
    }
}

impl AnalysisClient for HttpAnalysisClient {
    async fn analyze(&self, url: &str, payload: &UploadPayload) -> std::result::Result<Value, SubmitError> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(SubmitError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| SubmitError::Decode(e.to_string()))
    }
}
