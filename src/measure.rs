//! 測定画面
//!
//! 指示文を表示しながら撮影を進め、測定値または失敗内容を表示する。

use crate::camera::ImageSource;
use crate::error::Result;
use crate::sequencer::{CaptureOutcome, Sequencer};
use crate::service::AnalysisClient;
use crate::store::KeyValueStore;
use basmi_common::{CapturePhase, MeasurementType};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// 1回の測定を実行する
///
/// 2枚撮影の種別は、送信後に `repeat` が true を返す限り同じセッションで撮り直す。
/// 最後に送信した結果を返す。
pub async fn run_measurement<D, C, S, F>(
    sequencer: &mut Sequencer<D, C, S>,
    measurement: MeasurementType,
    mut repeat: F,
) -> Result<CaptureOutcome>
where
    D: ImageSource,
    C: AnalysisClient,
    S: KeyValueStore,
    F: FnMut() -> Result<bool>,
{
    let descriptor = measurement.descriptor();
    let mut session = sequencer.begin(measurement);

    println!("📷 {} ({}枚撮影)\n", descriptor.label, descriptor.photos.count());
    println!("{}\n", session.instruction());

    loop {
        let image = sequencer.acquire(&session).await?;
        match image.taken_at {
            Some(taken_at) => {
                println!("✔ 撮影: {} ({})", image.file_name, taken_at.format("%Y-%m-%d %H:%M"))
            }
            None => println!("✔ 撮影: {}", image.file_name),
        }

        let spinner = match session.phase() {
            CapturePhase::AwaitingFirstPhoto => None,
            _ => Some(upload_spinner()),
        };
        let outcome = sequencer.advance(&mut session, image).await?;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        report(&outcome, measurement);

        if !outcome.is_resolved() {
            continue;
        }
        if session.is_finished() || !repeat()? {
            return Ok(outcome);
        }
        println!("\n{}\n", session.instruction());
    }
}

fn upload_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("解析中...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// 結果を表示
pub fn report(outcome: &CaptureOutcome, measurement: MeasurementType) {
    let unit = measurement.descriptor().unit.symbol();

    match outcome {
        CaptureOutcome::Pending { instruction } => {
            println!("\n{}\n", instruction);
        }
        CaptureOutcome::Measured(submission) => {
            println!("✔ 測定値: {} {}", submission.value, unit);
            match &submission.persist_error {
                None => {
                    for (key, value) in &submission.writes {
                        println!("  保存: {} = {}", key, value);
                    }
                }
                Some(e) => println!("⚠ 測定値を保存できませんでした: {}", e),
            }
        }
        CaptureOutcome::Failed(error) => {
            println!("✖ 測定に失敗しました ({}): {}", error.kind(), error);
            if error.is_transient() {
                println!("  通信状態を確認して撮り直してください");
            }
        }
    }
}
