//! 対話式撮影
//!
//! 撮影のたびに画像ファイルのパスを入力してもらう。

use super::{load_image_async, CaptureOptions, CapturedImage, ImageSource};
use crate::error::{BasmiError, Result};
use dialoguer::Input;
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct PromptCamera {
    taken: usize,
}

impl PromptCamera {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageSource for PromptCamera {
    async fn acquire(&mut self, options: &CaptureOptions) -> Result<CapturedImage> {
        let input: String = Input::new()
            .with_prompt(format!("写真{}のパス（空欄で中止）", self.taken + 1))
            .allow_empty(true)
            .interact_text()
            .map_err(|e| BasmiError::Prompt(e.to_string()))?;

        let input = input.trim().trim_matches('"');
        if input.is_empty() {
            return Err(BasmiError::DeviceUnavailable("撮影が中止されました".into()));
        }

        let image = load_image_async(PathBuf::from(input), *options).await?;
        self.taken += 1;
        Ok(image)
    }
}
