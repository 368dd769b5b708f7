//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown measurement type: {0} (expected 0-12)")]
    InvalidMeasurementType(String),

    #[error("Unexpected response shape: {0}")]
    ResponseShape(String),

    #[error("Analysis service reported an error: {0}")]
    Service(String),

    #[error("Capture session already finished")]
    SessionFinished,
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
