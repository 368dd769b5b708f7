//! 撮影シーケンス
//!
//! 撮影デバイスから1枚ずつ取得して撮影セッションへ渡し、
//! 必要な枚数が揃ったら結果送信を呼ぶ。
//!
//! `capture` はセッションを `&mut` で借用するため、同じセッションで
//! 送信中に次の撮影が始まることはない。

use crate::camera::{CaptureOptions, CapturedImage, ImageSource};
use crate::error::{Result, SubmitError};
use crate::service::AnalysisClient;
use crate::store::KeyValueStore;
use crate::submitter::{ResultSubmitter, Submission};
use basmi_common::{CaptureSession, CaptureStep, MeasurementType};
use tracing::debug;

pub type Session = CaptureSession<CapturedImage>;

/// 1回の撮影の結果
#[derive(Debug)]
pub enum CaptureOutcome {
    /// 1枚目を保持した。次の指示を表示する
    Pending { instruction: &'static str },
    /// 測定値を受信した
    Measured(Submission),
    /// 送信に失敗した（ストアは変更なし）
    Failed(SubmitError),
}

impl CaptureOutcome {
    /// 送信まで進んだか（成功・失敗を問わない）
    pub fn is_resolved(&self) -> bool {
        !matches!(self, CaptureOutcome::Pending { .. })
    }
}

pub struct Sequencer<D, C, S> {
    device: D,
    submitter: ResultSubmitter<C, S>,
    options: CaptureOptions,
}

impl<D, C, S> Sequencer<D, C, S>
where
    D: ImageSource,
    C: AnalysisClient,
    S: KeyValueStore,
{
    pub fn new(device: D, submitter: ResultSubmitter<C, S>, options: CaptureOptions) -> Self {
        Self {
            device,
            submitter,
            options,
        }
    }

    pub fn begin(&self, measurement: MeasurementType) -> Session {
        debug!(measurement = measurement.index(), "capture session started");
        CaptureSession::begin(measurement)
    }

    pub fn submitter(&self) -> &ResultSubmitter<C, S> {
        &self.submitter
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// 撮影して次へ進める
    pub async fn capture(&mut self, session: &mut Session) -> Result<CaptureOutcome> {
        let image = self.acquire(session).await?;
        self.advance(session, image).await
    }

    /// 撮影のみ行う。デバイスのエラー時はセッションを変更しない
    pub async fn acquire(&mut self, session: &Session) -> Result<CapturedImage> {
        if session.is_finished() {
            return Err(basmi_common::Error::SessionFinished.into());
        }
        let image = self.device.acquire(&self.options).await?;
        debug!(
            measurement = session.measurement().index(),
            phase = ?session.phase(),
            file = %image.file_name,
            taken_at = ?image.taken_at,
            bytes = image.bytes().len(),
            "image acquired"
        );
        Ok(image)
    }

    /// 撮影済みの1枚をセッションへ渡し、必要なら送信する
    pub async fn advance(
        &mut self,
        session: &mut Session,
        image: CapturedImage,
    ) -> Result<CaptureOutcome> {
        let measurement = session.measurement();

        let submitted = match session.accept(image)? {
            CaptureStep::Pending { instruction } => {
                return Ok(CaptureOutcome::Pending { instruction });
            }
            CaptureStep::SubmitSingle(image) => {
                self.submitter.submit_single(measurement, image).await
            }
            CaptureStep::SubmitPair { first, second } => {
                self.submitter.submit_pair(measurement, first, second).await
            }
        };

        Ok(match submitted {
            Ok(submission) => CaptureOutcome::Measured(submission),
            Err(error) => CaptureOutcome::Failed(error),
        })
    }
}
