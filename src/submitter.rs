//! 結果送信
//!
//! 撮影画像を解析サービスへ送り、返ってきた測定値を保存キーへ書き込む。
//! 送信に失敗した場合ストアには何も書かない。

use crate::camera::CapturedImage;
use crate::error::SubmitError;
use crate::service::AnalysisClient;
use crate::store::KeyValueStore;
use basmi_common::{
    assign_result_keys, parse_analysis_response, MeasurementType, ResultValue, UploadPayload,
};
use tracing::{debug, info, warn};

/// 送信結果
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub measurement: MeasurementType,
    /// サービスが返した値（表示用）
    pub value: ResultValue,
    /// 保存先キーと書き込む値
    pub writes: Vec<(&'static str, String)>,
    /// 保存に失敗した場合のエラー内容（このときどのキーも更新されていない）
    pub persist_error: Option<String>,
}

impl Submission {
    pub fn persisted(&self) -> bool {
        self.persist_error.is_none()
    }
}

pub struct ResultSubmitter<C, S> {
    client: C,
    store: S,
    service_url: String,
}

impl<C: AnalysisClient, S: KeyValueStore> ResultSubmitter<C, S> {
    pub fn new(client: C, store: S, service_url: impl Into<String>) -> Self {
        Self {
            client,
            store,
            service_url: service_url.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// 1枚で送信（`{"image": ...}`）
    pub async fn submit_single(
        &mut self,
        measurement: MeasurementType,
        image: CapturedImage,
    ) -> Result<Submission, SubmitError> {
        debug!(
            measurement = measurement.index(),
            file = %image.file_name,
            digest = %image.digest(),
            "submitting single image"
        );
        let payload = UploadPayload::Single {
            image: image.to_base64(),
        };
        drop(image);
        self.submit(measurement, payload).await
    }

    /// 2枚で送信（`{"image1": ..., "image2": ...}`）
    pub async fn submit_pair(
        &mut self,
        measurement: MeasurementType,
        first: CapturedImage,
        second: CapturedImage,
    ) -> Result<Submission, SubmitError> {
        debug!(
            measurement = measurement.index(),
            first = %first.file_name,
            second = %second.file_name,
            "submitting image pair"
        );
        let payload = UploadPayload::Pair {
            image1: first.to_base64(),
            image2: second.to_base64(),
        };
        drop((first, second));
        self.submit(measurement, payload).await
    }

    async fn submit(
        &mut self,
        measurement: MeasurementType,
        payload: UploadPayload,
    ) -> Result<Submission, SubmitError> {
        let descriptor = measurement.descriptor();
        let url = descriptor.endpoint_url(&self.service_url);

        let body = self.client.analyze(&url, &payload).await.map_err(|e| {
            warn!(
                measurement = measurement.index(),
                %url,
                kind = %e.kind(),
                error = %e,
                "analysis request failed"
            );
            e
        })?;

        let (value, writes) = parse_analysis_response(&body)
            .and_then(|value| assign_result_keys(descriptor, &value).map(|writes| (value, writes)))
            .map_err(|e| {
                warn!(measurement = measurement.index(), %url, error = %e, "unusable analysis response");
                SubmitError::from(e)
            })?;

        // 2キーの結果は両方書くか、どちらも書かない
        let entries: Vec<(&str, &str)> = writes
            .iter()
            .map(|(key, text)| (*key, text.as_str()))
            .collect();
        let persist_error = match self.store.set_many(&entries) {
            Ok(()) => {
                info!(measurement = measurement.index(), value = %value, "measurement stored");
                None
            }
            Err(e) => {
                warn!(measurement = measurement.index(), error = %e, "failed to persist measurement");
                Some(e.to_string())
            }
        };

        Ok(Submission {
            measurement,
            value,
            writes,
            persist_error,
        })
    }
}
