//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use basmi_measure::camera::{self, FileCamera};
use basmi_measure::error::{BasmiError, FailureKind, SubmitError};
use std::path::Path;
use tempfile::tempdir;

/// 存在しないフォルダを指定した場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = camera::scan_folder(Path::new("/nonexistent/path/12345"));
    assert!(matches!(result, Err(BasmiError::FolderNotFound(_))));
}

/// 空のフォルダはエラーではなく空のVec
#[test]
fn test_scan_empty_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = camera::scan_folder(dir.path());
    assert!(result.unwrap().is_empty());
}

/// 画像のないフォルダから撮影デバイスは作れない
#[test]
fn test_camera_from_folder_without_images() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("test.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("data.json"), "{}").unwrap();

    let result = FileCamera::from_folder(dir.path());
    assert!(matches!(result, Err(BasmiError::NoImagesFound(_))));
}

/// BasmiErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        BasmiError::Config("テスト設定エラー".to_string()),
        BasmiError::FileNotFound("test.jpg".to_string()),
        BasmiError::FolderNotFound("/path/to/folder".to_string()),
        BasmiError::NoImagesFound("フォルダ".to_string()),
        BasmiError::ImageLoad("broken.jpg".to_string()),
        BasmiError::DeviceUnavailable("camera".to_string()),
        BasmiError::Store("results.json".to_string()),
        BasmiError::Prompt("interrupted".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// 送信エラーは送信エラーとして表示される
#[test]
fn test_submit_error_conversion() {
    let err: BasmiError = SubmitError::Timeout(120).into();

    assert!(matches!(err, BasmiError::Submit(SubmitError::Timeout(120))));
    let display = format!("{}", err);
    assert!(display.contains("送信エラー"));
    assert!(display.contains("120"));
}

/// サービスのエラー応答は恒久的な失敗で、メッセージをそのまま表示
#[test]
fn test_service_error_is_transparent() {
    let err: SubmitError = basmi_common::Error::Service("No image data received".to_string()).into();

    assert_eq!(err.kind(), FailureKind::Permanent);
    assert!(err.to_string().contains("No image data received"));
}

/// FailureKindの表示
#[test]
fn test_failure_kind_display() {
    assert_eq!(FailureKind::Transient.to_string(), "transient");
    assert_eq!(FailureKind::Permanent.to_string(), "permanent");
}

/// エラーのDebug実装確認
#[test]
fn test_error_debug() {
    let err = BasmiError::Config("テスト".to_string());
    let debug = format!("{:?}", err);

    assert!(debug.contains("Config"));
    assert!(debug.contains("テスト"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: BasmiError = io_err.into();

    assert!(matches!(err, BasmiError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: BasmiError = json_err.into();

    assert!(matches!(err, BasmiError::JsonParse(_)));
}

/// 共通エラーは透過的に表示される
#[test]
fn test_common_error_transparent() {
    let err: BasmiError = basmi_common::Error::InvalidMeasurementType("13".to_string()).into();

    assert!(matches!(err, BasmiError::Common(_)));
    assert!(format!("{}", err).contains("13"));
}
