//! 解析サービスとの送受信データ
//!
//! 送信: `{"image": ...}` または `{"image1": ..., "image2": ...}`（Base64）
//! 受信: `{"result": number | [number, number]}`
//!       失敗時は `{"status": "error", "message": ...}`

use crate::error::{Error, Result};
use crate::measurement::MeasurementDescriptor;
use serde::Serialize;
use serde_json::{Number, Value};
use std::fmt;

/// アップロード本文
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum UploadPayload {
    Single { image: String },
    Pair { image1: String, image2: String },
}

impl UploadPayload {
    pub fn image_count(&self) -> usize {
        match self {
            UploadPayload::Single { .. } => 1,
            UploadPayload::Pair { .. } => 2,
        }
    }
}

/// サービスが返した測定値
///
/// 数値は受信したJSON表現のまま保持する（`7.0` は `"7.0"`、`35` は `"35"` で保存）。
#[derive(Debug, Clone, PartialEq)]
pub enum ResultValue {
    Single(Number),
    Pair(Number, Number),
}

impl ResultValue {
    /// 値の個数
    pub fn count(&self) -> usize {
        match self {
            ResultValue::Single(_) => 1,
            ResultValue::Pair(..) => 2,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ResultValue::Single(n) => Value::Number(n.clone()),
            ResultValue::Pair(a, b) => Value::Array(vec![
                Value::Number(a.clone()),
                Value::Number(b.clone()),
            ]),
        }
    }
}

impl fmt::Display for ResultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultValue::Single(n) => write!(f, "{}", n),
            ResultValue::Pair(a, b) => write!(f, "{}, {}", a, b),
        }
    }
}

/// レスポンスJSONから測定値を取り出す
pub fn parse_analysis_response(body: &Value) -> Result<ResultValue> {
    let object = body
        .as_object()
        .ok_or_else(|| Error::ResponseShape(format!("expected a JSON object, got {}", body)))?;

    if object.get("status").and_then(Value::as_str) == Some("error") {
        let message = object
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(Error::Service(message.to_string()));
    }

    match object.get("result") {
        None | Some(Value::Null) => Err(Error::ResponseShape("missing `result` field".into())),
        Some(Value::Number(n)) => Ok(ResultValue::Single(n.clone())),
        Some(Value::Array(items)) => match items.as_slice() {
            [Value::Number(a), Value::Number(b)] => Ok(ResultValue::Pair(a.clone(), b.clone())),
            _ => Err(Error::ResponseShape(format!(
                "`result` must hold two numbers, got {}",
                Value::Array(items.clone())
            ))),
        },
        Some(other) => Err(Error::ResponseShape(format!(
            "`result` must be a number or a pair of numbers, got {}",
            other
        ))),
    }
}

/// 測定値を保存キーに割り当てる
///
/// 保存キーの数と測定値の数が一致しない場合はエラー。
pub fn assign_result_keys(
    descriptor: &MeasurementDescriptor,
    value: &ResultValue,
) -> Result<Vec<(&'static str, String)>> {
    match (descriptor.result_keys, value) {
        ([key], ResultValue::Single(n)) => Ok(vec![(*key, n.to_string())]),
        ([first, second], ResultValue::Pair(a, b)) => {
            Ok(vec![(*first, a.to_string()), (*second, b.to_string())])
        }
        (keys, value) => Err(Error::ResponseShape(format!(
            "{} expects {} value(s) but the service returned {}",
            descriptor.label,
            keys.len(),
            value.count()
        ))),
    }
}
