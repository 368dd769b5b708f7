//! 解析サービス
//!
//! 測定種別ごとのエンドポイントへJSONをPOSTし、レスポンスJSONを返す。

mod http;

pub use http::HttpAnalysisClient;

use crate::error::SubmitError;
use basmi_common::UploadPayload;
use serde_json::Value;

#[allow(async_fn_in_trait)]
pub trait AnalysisClient {
    async fn analyze(&self, url: &str, payload: &UploadPayload) -> Result<Value, SubmitError>;
}
