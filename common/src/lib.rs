//! BASMI Measure Common Library
//!
//! 測定種別テーブル・撮影セッション・送受信データ・結果一覧など、
//! I/Oを持たない共通ロジック

pub mod board;
pub mod error;
pub mod measurement;
pub mod payload;
pub mod session;

pub use board::{render_board, slot_values, RenderedSection, PROCEDURE_GUIDES, RESULTS_BOARD};
pub use error::{Error, Result};
pub use measurement::{keys, MeasurementDescriptor, MeasurementType, PhotoCount, Unit};
pub use payload::{assign_result_keys, parse_analysis_response, ResultValue, UploadPayload};
pub use session::{CapturePhase, CaptureSession, CaptureStep};
