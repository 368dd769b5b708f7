//! テスト用の撮影デバイス・解析サービス・ストア

#![allow(dead_code)]

use basmi_common::UploadPayload;
use basmi_measure::camera::{CaptureOptions, CapturedImage, ImageSource};
use basmi_measure::error::{BasmiError, Result, SubmitError};
use basmi_measure::service::AnalysisClient;
use basmi_measure::store::{KeyValueStore, MemoryStore};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

pub const SERVICE_URL: &str = "http://analysis.test:8000";

/// 送信内容を記録し、用意したレスポンスを順に返す
#[derive(Default)]
pub struct FakeClient {
    responses: Mutex<VecDeque<std::result::Result<Value, SubmitError>>>,
    calls: Mutex<Vec<(String, UploadPayload)>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, body: Value) -> Self {
        self.responses.lock().unwrap().push_back(Ok(body));
        self
    }

    /// JSON文字列そのままのレスポンス（数値表現を保つ）
    pub fn respond_raw(self, body: &str) -> Self {
        self.respond(serde_json::from_str(body).unwrap())
    }

    pub fn fail(self, error: SubmitError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn calls(&self) -> Vec<(String, UploadPayload)> {
        self.calls.lock().unwrap().clone()
    }
}

impl AnalysisClient for FakeClient {
    async fn analyze(&self, url: &str, payload: &UploadPayload) -> std::result::Result<Value, SubmitError> {
        self.calls.lock().unwrap().push((url.to_string(), payload.clone()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SubmitError::Transport("no response queued".into())))
    }
}

/// 用意した画像を順に返す撮影デバイス
#[derive(Default)]
pub struct FakeCamera {
    images: VecDeque<CapturedImage>,
    pub acquired: usize,
}

impl FakeCamera {
    pub fn with_images(names: &[&str]) -> Self {
        Self {
            images: names.iter().map(|n| image(n)).collect(),
            acquired: 0,
        }
    }
}

impl ImageSource for FakeCamera {
    async fn acquire(&mut self, _options: &CaptureOptions) -> Result<CapturedImage> {
        let image = self
            .images
            .pop_front()
            .ok_or_else(|| BasmiError::DeviceUnavailable("camera empty".into()))?;
        self.acquired += 1;
        Ok(image)
    }
}

/// 名前をそのまま中身にした画像
pub fn image(name: &str) -> CapturedImage {
    CapturedImage::from_jpeg(name.as_bytes().to_vec(), format!("{name}.jpg"))
}

/// `image(name)` のBase64
pub fn b64(name: &str) -> String {
    image(name).to_base64()
}

/// 書き込みが必ず失敗するストア
#[derive(Default)]
pub struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&mut self, key: &str, _value: &str) -> Result<()> {
        Err(BasmiError::Store(format!("read-only: {key}")))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        Err(BasmiError::Store(format!("read-only: {key}")))
    }
}

/// 指定回目の書き込みだけ失敗するストア
pub struct FailingStore {
    pub inner: MemoryStore,
    sets: usize,
    fail_on: usize,
}

impl FailingStore {
    pub fn new(inner: MemoryStore, fail_on: usize) -> Self {
        Self {
            inner,
            sets: 0,
            fail_on,
        }
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.sets += 1;
        if self.sets == self.fail_on {
            return Err(BasmiError::Store("disk full".into()));
        }
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }
}
