//! 撮影セッション（状態遷移）
//!
//! 1枚撮影: AwaitingSinglePhoto → Finished
//! 2枚撮影: AwaitingFirstPhoto → AwaitingSecondPhoto → AwaitingFirstPhoto（繰り返し可）
//!
//! 1枚目の画像はセッションが所有し、送信時またはリセット時に一度だけ手放す。
//! 画像型はジェネリックにしてあり、このクレートはI/Oを持たない。

use crate::error::{Error, Result};
use crate::measurement::{MeasurementType, PhotoCount};

/// 外部から見える状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePhase {
    AwaitingSinglePhoto,
    AwaitingFirstPhoto,
    AwaitingSecondPhoto,
    Finished,
}

enum Phase<I> {
    AwaitingSinglePhoto,
    AwaitingFirstPhoto,
    AwaitingSecondPhoto { first: I },
    Finished,
}

/// 1枚受け取った後に呼び出し側が行うこと
#[derive(Debug, PartialEq, Eq)]
pub enum CaptureStep<I> {
    /// 1枚目を保持した。次の指示を表示して2枚目を待つ
    Pending { instruction: &'static str },
    /// 1枚で送信
    SubmitSingle(I),
    /// 2枚で送信
    SubmitPair { first: I, second: I },
}

pub struct CaptureSession<I> {
    measurement: MeasurementType,
    phase: Phase<I>,
    instruction: &'static str,
}

impl<I> CaptureSession<I> {
    /// 測定種別から初期状態を決める
    pub fn begin(measurement: MeasurementType) -> Self {
        let phase = match measurement.descriptor().photos {
            PhotoCount::Single => Phase::AwaitingSinglePhoto,
            PhotoCount::Pair => Phase::AwaitingFirstPhoto,
        };
        Self {
            measurement,
            phase,
            instruction: measurement.descriptor().instruction,
        }
    }

    pub fn measurement(&self) -> MeasurementType {
        self.measurement
    }

    pub fn phase(&self) -> CapturePhase {
        match self.phase {
            Phase::AwaitingSinglePhoto => CapturePhase::AwaitingSinglePhoto,
            Phase::AwaitingFirstPhoto => CapturePhase::AwaitingFirstPhoto,
            Phase::AwaitingSecondPhoto { .. } => CapturePhase::AwaitingSecondPhoto,
            Phase::Finished => CapturePhase::Finished,
        }
    }

    /// 現在表示すべき撮影指示
    pub fn instruction(&self) -> &'static str {
        self.instruction
    }

    pub fn has_pending_image(&self) -> bool {
        matches!(self.phase, Phase::AwaitingSecondPhoto { .. })
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished)
    }

    /// 撮影した1枚を受け取り、次の動作を返す
    ///
    /// 2枚目を受け取った時点で状態は AwaitingFirstPhoto に戻り、
    /// 保持していた1枚目は戻り値へ移動する。
    pub fn accept(&mut self, image: I) -> Result<CaptureStep<I>> {
        let descriptor = self.measurement.descriptor();

        match std::mem::replace(&mut self.phase, Phase::Finished) {
            Phase::AwaitingSinglePhoto => Ok(CaptureStep::SubmitSingle(image)),
            Phase::AwaitingFirstPhoto => {
                let instruction = descriptor.follow_up.unwrap_or(descriptor.instruction);
                self.phase = Phase::AwaitingSecondPhoto { first: image };
                self.instruction = instruction;
                Ok(CaptureStep::Pending { instruction })
            }
            Phase::AwaitingSecondPhoto { first } => {
                self.phase = Phase::AwaitingFirstPhoto;
                self.instruction = descriptor.instruction;
                Ok(CaptureStep::SubmitPair { first, second: image })
            }
            Phase::Finished => Err(Error::SessionFinished),
        }
    }

    /// 保留中の1枚目を破棄して最初からやり直す
    ///
    /// 1枚撮影で送信済みのセッションは終了状態のまま。
    pub fn reset(&mut self) {
        if let Phase::AwaitingSecondPhoto { .. } = self.phase {
            self.phase = Phase::AwaitingFirstPhoto;
            self.instruction = self.measurement.descriptor().instruction;
        }
    }
}

impl<I> std::fmt::Debug for CaptureSession<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureSession")
            .field("measurement", &self.measurement.index())
            .field("phase", &self.phase())
            .finish()
    }
}
