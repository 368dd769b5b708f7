use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BasmiError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("撮影できません: {0}")]
    DeviceUnavailable(String),

    #[error("結果の保存に失敗: {0}")]
    Store(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("送信エラー: {0}")]
    Submit(#[from] SubmitError),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] basmi_common::Error),
}

pub type Result<T> = std::result::Result<T, BasmiError>;

/// 送信失敗の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 通信障害・タイムアウト・サーバ過負荷など。再撮影・再送で回復しうる
    Transient,
    /// 不正なレスポンス・サービス側の拒否。再送しても同じ結果になる
    Permanent,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Transient => write!(f, "transient"),
            FailureKind::Permanent => write!(f, "permanent"),
        }
    }
}

/// 解析サービスへの送信エラー
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("解析サービスに接続できません: {0}")]
    Transport(String),

    #[error("解析サービスが{0}秒以内に応答しませんでした")]
    Timeout(u64),

    #[error("解析サービスがHTTP {status}を返しました: {body}")]
    Status { status: u16, body: String },

    #[error("レスポンスがJSONではありません: {0}")]
    Decode(String),

    #[error(transparent)]
    Response(#[from] basmi_common::Error),
}

impl SubmitError {
    pub fn kind(&self) -> FailureKind {
        match self {
            SubmitError::Transport(_) | SubmitError::Timeout(_) => FailureKind::Transient,
            SubmitError::Status { status, .. } => match status {
                408 | 429 | 500..=599 => FailureKind::Transient,
                _ => FailureKind::Permanent,
            },
            SubmitError::Decode(_) | SubmitError::Response(_) => FailureKind::Permanent,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind() == FailureKind::Transient
    }
}
