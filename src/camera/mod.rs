//! 撮影デバイス
//!
//! 画像ファイルを撮影画像として扱う。読み込んだ画像は品質係数に従って
//! JPEGに再エンコードし、Base64で送信できる形にする。

mod metadata;
mod prompt;

pub use prompt::PromptCamera;

use crate::error::{BasmiError, Result};
use base64::Engine;
use chrono::NaiveDateTime;
use image::codecs::jpeg::JpegEncoder;
use sha2::{Digest, Sha256};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "JPG", "JPEG", "PNG"];

/// 撮影オプション
#[derive(Debug, Clone, Copy)]
pub struct CaptureOptions {
    /// 画質係数 (0.0-1.0)
    pub quality: f32,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self { quality: 0.7 }
    }
}

impl CaptureOptions {
    /// JPEG品質 (1-100)
    pub fn jpeg_quality(&self) -> u8 {
        ((self.quality.clamp(0.0, 1.0) * 100.0).round() as u8).max(1)
    }
}

/// 撮影画像
///
/// 複製できない。送信に渡した時点で所有権ごと手放す。
#[derive(Debug)]
pub struct CapturedImage {
    jpeg: Vec<u8>,
    pub file_name: String,
    /// 撮影日時（EXIF）
    pub taken_at: Option<NaiveDateTime>,
}

impl CapturedImage {
    pub fn from_jpeg(jpeg: Vec<u8>, file_name: impl Into<String>) -> Self {
        Self {
            jpeg,
            file_name: file_name.into(),
            taken_at: None,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.jpeg
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.jpeg)
    }

    /// SHA-256（ログ用）
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.jpeg))
    }
}

/// 撮影デバイス
#[allow(async_fn_in_trait)]
pub trait ImageSource {
    async fn acquire(&mut self, options: &CaptureOptions) -> Result<CapturedImage>;
}

/// 画像ファイルを順番に返す撮影デバイス
#[derive(Debug, Default)]
pub struct FileCamera {
    queue: VecDeque<PathBuf>,
}

impl FileCamera {
    pub fn from_paths(paths: Vec<PathBuf>) -> Result<Self> {
        if let Some(missing) = paths.iter().find(|p| !p.is_file()) {
            return Err(BasmiError::FileNotFound(missing.display().to_string()));
        }
        Ok(Self { queue: paths.into() })
    }

    pub fn from_folder(folder: &Path) -> Result<Self> {
        let paths = scan_folder(folder)?;
        if paths.is_empty() {
            return Err(BasmiError::NoImagesFound(folder.display().to_string()));
        }
        Ok(Self { queue: paths.into() })
    }

    /// 残り枚数
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl ImageSource for FileCamera {
    async fn acquire(&mut self, options: &CaptureOptions) -> Result<CapturedImage> {
        let path = self
            .queue
            .pop_front()
            .ok_or_else(|| BasmiError::DeviceUnavailable("撮影する画像が残っていません".into()))?;
        load_image_async(path, *options).await
    }
}

/// 実行時に選ぶ撮影デバイス
#[derive(Debug)]
pub enum Camera {
    Files(FileCamera),
    Prompt(PromptCamera),
}

impl ImageSource for Camera {
    async fn acquire(&mut self, options: &CaptureOptions) -> Result<CapturedImage> {
        match self {
            Camera::Files(camera) => camera.acquire(options).await,
            Camera::Prompt(camera) => camera.acquire(options).await,
        }
    }
}

/// フォルダ直下の画像をファイル名順に列挙
pub fn scan_folder(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(BasmiError::FolderNotFound(folder.display().to_string()));
    }

    let mut images: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .map(|ext| IMAGE_EXTENSIONS.iter().any(|&e| e == ext.to_string_lossy()))
                .unwrap_or(false)
        })
        .collect();

    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(images)
}

/// 画像を読み込み、JPEGに再エンコードする
pub fn load_image(path: &Path, options: &CaptureOptions) -> Result<CapturedImage> {
    if !path.is_file() {
        return Err(BasmiError::FileNotFound(path.display().to_string()));
    }

    let raw = std::fs::read(path)
        .map_err(|e| BasmiError::ImageLoad(format!("{}: {}", path.display(), e)))?;
    let decoded = image::load_from_memory(&raw)
        .map_err(|e| BasmiError::ImageLoad(format!("{}: {}", path.display(), e)))?;

    let mut jpeg = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut jpeg, options.jpeg_quality());
    decoded
        .to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| BasmiError::ImageLoad(format!("{}: {}", path.display(), e)))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut captured = CapturedImage::from_jpeg(jpeg, file_name);
    captured.taken_at = metadata::capture_time(&raw);
    Ok(captured)
}

/// デコードはブロッキングスレッドで行う
pub(crate) async fn load_image_async(path: PathBuf, options: CaptureOptions) -> Result<CapturedImage> {
    tokio::task::spawn_blocking(move || load_image(&path, &options))
        .await
        .map_err(|e| BasmiError::ImageLoad(format!("読み込みタスクが中断されました: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jpeg_quality_from_factor() {
        assert_eq!(CaptureOptions::default().jpeg_quality(), 70);
        assert_eq!(CaptureOptions { quality: 1.0 }.jpeg_quality(), 100);
        assert_eq!(CaptureOptions { quality: 0.0 }.jpeg_quality(), 1);
        assert_eq!(CaptureOptions { quality: 5.0 }.jpeg_quality(), 100);
    }

    #[test]
    fn test_captured_image_encoding() {
        let image = CapturedImage::from_jpeg(b"hello".to_vec(), "a.jpg");
        assert_eq!(image.to_base64(), "aGVsbG8=");
        assert_eq!(
            image.digest(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_eq!(image.bytes(), b"hello");
    }

    #[test]
    fn test_scan_folder_not_found() {
        let result = scan_folder(Path::new("/nonexistent/folder"));
        assert!(matches!(result, Err(BasmiError::FolderNotFound(_))));
    }

    #[test]
    fn test_scan_folder_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c.jpg", "a.PNG", "b.jpeg", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"dummy").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.jpg")).unwrap();

        let names: Vec<String> = scan_folder(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.PNG", "b.jpeg", "c.jpg"]);
    }

    #[test]
    fn test_from_paths_rejects_missing_file() {
        let result = FileCamera::from_paths(vec![PathBuf::from("/nonexistent/a.jpg")]);
        assert!(matches!(result, Err(BasmiError::FileNotFound(_))));
    }

    #[test]
    fn test_load_image_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(matches!(
            load_image(&path, &CaptureOptions::default()),
            Err(BasmiError::ImageLoad(_))
        ));
    }
}
