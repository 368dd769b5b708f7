//! 測定種別と記述子テーブル
//!
//! BASMI測定の13種別（index 0-12）を1つの不変テーブルで定義する。
//! 指示文・エンドポイント・保存キー・撮影枚数は記述子にまとめて持つため、
//! 種別ごとの対応がずれることはない。

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 保存キー
pub mod keys {
    pub const TRAGUS_LEFT: &str = "tragus-left";
    pub const TRAGUS_RIGHT: &str = "tragus-right";
    pub const SIDE_LEFT: &str = "side-left";
    pub const SIDE_RIGHT: &str = "side-right";
    pub const LUMBAR_LEFT: &str = "lumbar-left";
    pub const LUMBAR_RIGHT: &str = "lumbar-right";
    pub const CERVICAL_LEFT: &str = "cervical-left";
    pub const CERVICAL_RIGHT: &str = "cervical-right";
    pub const INTERMALLEOLAR: &str = "intermalleolar";

    /// 全キー（重複なし）
    pub const ALL: [&str; 9] = [
        TRAGUS_LEFT,
        TRAGUS_RIGHT,
        SIDE_LEFT,
        SIDE_RIGHT,
        LUMBAR_LEFT,
        LUMBAR_RIGHT,
        CERVICAL_LEFT,
        CERVICAL_RIGHT,
        INTERMALLEOLAR,
    ];
}

const TRAGUS_LEFT_TEXT: &str = "Patient stands with back to wall, their knees straight and shoulder blades, buttocks, and heels against the wall. Feet should be hip width apart and parallel. With head in neutral position, patient draws chin in as far as possible. Take a full body photo of the patient from their left side.";
const TRAGUS_RIGHT_TEXT: &str = "Patient stands with back to wall, their knees straight and shoulder blades, buttocks, and heels against the wall. Feet should be hip width apart and parallel. With head in neutral position, patient draws chin in as far as possible. Take a full body photo of the patient from their right side.";
const STANDING_BASELINE_TEXT: &str = "Patient stands with back to wall, their knees straight and shoulder blades, buttocks, and heels against the wall. Feet should be hip width apart and parallel, and hands to their side. Take a full body photo of the patient head on.";
const SIDE_LEFT_REACH_TEXT: &str = "Patient reaches towards the floor with their left hand relaxed by side flexing (sliding left hand down outside of leg as far as possible). Take a full body photo of the patient head on.";
const SIDE_RIGHT_REACH_TEXT: &str = "Patient reaches towards the floor with their right hand relaxed by side flexing (sliding right hand down outside of leg as far as possible). Take a full body photo of the patient head on.";
const LUMBAR_BEND_TEXT: &str = "Patient bends forward, keeping knees straight. Take a full body photo of the patient head on.";
const LYING_BASELINE_TEXT: &str = "Patient lies on the floor, on their back. Their forehead should be horizontal and head in neutral position. Take a full body photo of the patient head on.";
const CERVICAL_LEFT_TEXT: &str = "Patient rotates head as far as possible to the left, keeping shoulders still. Take a full body photo of the patient head on.";
const CERVICAL_RIGHT_TEXT: &str = "Patient rotates head as far as possible to the right, keeping shoulders still. Take a full body photo of the patient head on.";
const INTERMALLEOLAR_TEXT: &str = "Patient lies on the floor, on their back. Keeping knees straight and legs in contact with the floor, patient takes legs as far apart as possible. Take a full body photo of the patient head on.";

/// 撮影枚数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhotoCount {
    /// 1枚撮影で送信
    Single,
    /// 基準姿勢 + 動作後の2枚
    Pair,
}

impl PhotoCount {
    pub fn count(&self) -> usize {
        match self {
            PhotoCount::Single => 1,
            PhotoCount::Pair => 2,
        }
    }
}

/// 測定値の単位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    Centimeters,
    Degrees,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Centimeters => "cm",
            Unit::Degrees => "°",
        }
    }
}

/// 測定種別ごとの記述子
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementDescriptor {
    /// 表示名
    pub label: &'static str,
    /// 最初に表示する撮影指示
    pub instruction: &'static str,
    /// 2枚撮影時、1枚目の後に表示する指示
    ///
    /// 基準姿勢の種別（偶数index）は次のindexの指示文。動作後の種別（奇数index）は
    /// 次のindexが別の手順になるため、自身の指示文を繰り返す。
    pub follow_up: Option<&'static str>,
    /// 解析サービスのパス（例: "/tragusleft"）
    pub endpoint: &'static str,
    /// 結果の保存先キー（2つの場合はレスポンスも2要素）
    pub result_keys: &'static [&'static str],
    pub photos: PhotoCount,
    pub unit: Unit,
}

impl MeasurementDescriptor {
    /// ベースURLと結合したエンドポイントURL
    pub fn endpoint_url(&self, service_url: &str) -> String {
        format!("{}{}", service_url.trim_end_matches('/'), self.endpoint)
    }

    pub fn expects_pair_result(&self) -> bool {
        self.result_keys.len() == 2
    }
}

static DESCRIPTORS: [MeasurementDescriptor; MeasurementType::COUNT] = [
    MeasurementDescriptor {
        label: "Tragus to wall (left)",
        instruction: TRAGUS_LEFT_TEXT,
        follow_up: None,
        endpoint: "/tragusleft",
        result_keys: &[keys::TRAGUS_LEFT],
        photos: PhotoCount::Single,
        unit: Unit::Centimeters,
    },
    MeasurementDescriptor {
        label: "Tragus to wall (right)",
        instruction: TRAGUS_RIGHT_TEXT,
        follow_up: None,
        endpoint: "/tragusright",
        result_keys: &[keys::TRAGUS_RIGHT],
        photos: PhotoCount::Single,
        unit: Unit::Centimeters,
    },
    MeasurementDescriptor {
        label: "Side flexion left (baseline)",
        instruction: STANDING_BASELINE_TEXT,
        follow_up: Some(SIDE_LEFT_REACH_TEXT),
        endpoint: "/flexionleft",
        result_keys: &[keys::SIDE_LEFT],
        photos: PhotoCount::Pair,
        unit: Unit::Centimeters,
    },
    MeasurementDescriptor {
        label: "Side flexion left (reach)",
        instruction: SIDE_LEFT_REACH_TEXT,
        follow_up: Some(SIDE_LEFT_REACH_TEXT),
        endpoint: "/flexionleft",
        result_keys: &[keys::SIDE_LEFT],
        photos: PhotoCount::Pair,
        unit: Unit::Centimeters,
    },
    MeasurementDescriptor {
        label: "Side flexion right (baseline)",
        instruction: STANDING_BASELINE_TEXT,
        follow_up: Some(SIDE_RIGHT_REACH_TEXT),
        endpoint: "/rights",
        result_keys: &[keys::SIDE_RIGHT],
        photos: PhotoCount::Pair,
        unit: Unit::Centimeters,
    },
    MeasurementDescriptor {
        label: "Side flexion right (reach)",
        instruction: SIDE_RIGHT_REACH_TEXT,
        follow_up: Some(SIDE_RIGHT_REACH_TEXT),
        endpoint: "/rights",
        result_keys: &[keys::SIDE_RIGHT],
        photos: PhotoCount::Pair,
        unit: Unit::Centimeters,
    },
    MeasurementDescriptor {
        label: "Modified lumbar flexion (baseline)",
        instruction: STANDING_BASELINE_TEXT,
        follow_up: Some(LUMBAR_BEND_TEXT),
        endpoint: "/lumbar",
        result_keys: &[keys::LUMBAR_LEFT, keys::LUMBAR_RIGHT],
        photos: PhotoCount::Pair,
        unit: Unit::Centimeters,
    },
    MeasurementDescriptor {
        label: "Modified lumbar flexion (bend)",
        instruction: LUMBAR_BEND_TEXT,
        follow_up: Some(LUMBAR_BEND_TEXT),
        endpoint: "/lumbar",
        result_keys: &[keys::LUMBAR_RIGHT],
        photos: PhotoCount::Pair,
        unit: Unit::Centimeters,
    },
    MeasurementDescriptor {
        label: "Cervical rotation left (baseline)",
        instruction: LYING_BASELINE_TEXT,
        follow_up: Some(CERVICAL_LEFT_TEXT),
        endpoint: "/cervicalleft",
        result_keys: &[keys::CERVICAL_LEFT],
        photos: PhotoCount::Pair,
        unit: Unit::Degrees,
    },
    MeasurementDescriptor {
        label: "Cervical rotation left (rotated)",
        instruction: CERVICAL_LEFT_TEXT,
        follow_up: Some(CERVICAL_LEFT_TEXT),
        endpoint: "/cervicalleft",
        result_keys: &[keys::CERVICAL_LEFT],
        photos: PhotoCount::Pair,
        unit: Unit::Degrees,
    },
    MeasurementDescriptor {
        label: "Cervical rotation right (baseline)",
        instruction: LYING_BASELINE_TEXT,
        follow_up: Some(CERVICAL_RIGHT_TEXT),
        endpoint: "/cright",
        result_keys: &[keys::CERVICAL_RIGHT],
        photos: PhotoCount::Pair,
        unit: Unit::Degrees,
    },
    MeasurementDescriptor {
        label: "Cervical rotation right (rotated)",
        instruction: CERVICAL_RIGHT_TEXT,
        follow_up: Some(CERVICAL_RIGHT_TEXT),
        endpoint: "/cright",
        result_keys: &[keys::CERVICAL_RIGHT],
        photos: PhotoCount::Pair,
        unit: Unit::Degrees,
    },
    MeasurementDescriptor {
        label: "Intermalleolar distance",
        instruction: INTERMALLEOLAR_TEXT,
        follow_up: None,
        endpoint: "/intermalleolar",
        result_keys: &[keys::INTERMALLEOLAR],
        photos: PhotoCount::Single,
        unit: Unit::Centimeters,
    },
];

/// 測定種別（index 0-12）
///
/// 範囲外の値からは生成できない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct MeasurementType(u8);

impl MeasurementType {
    pub const COUNT: usize = 13;

    pub fn new(index: i64) -> Result<Self> {
        if (0..Self::COUNT as i64).contains(&index) {
            Ok(Self(index as u8))
        } else {
            Err(Error::InvalidMeasurementType(index.to_string()))
        }
    }

    /// 定数テーブル用の生成（範囲外は None）
    pub const fn from_index(index: u8) -> Option<Self> {
        if (index as usize) < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub fn descriptor(&self) -> &'static MeasurementDescriptor {
        &DESCRIPTORS[self.index()]
    }

    /// 全種別をindex順に列挙
    pub fn all() -> impl Iterator<Item = MeasurementType> {
        (0..Self::COUNT as u8).map(MeasurementType)
    }
}

impl TryFrom<i64> for MeasurementType {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<MeasurementType> for u8 {
    fn from(value: MeasurementType) -> Self {
        value.0
    }
}

impl FromStr for MeasurementType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let index: i64 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidMeasurementType(s.to_string()))?;
        Self::new(index)
    }
}

impl fmt::Display for MeasurementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.descriptor().label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mt(index: i64) -> MeasurementType {
        MeasurementType::new(index).unwrap()
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(MeasurementType::new(-1).is_err());
        assert!(MeasurementType::new(13).is_err());
        assert!(matches!(
            MeasurementType::new(42),
            Err(Error::InvalidMeasurementType(ref s)) if s == "42"
        ));
    }

    #[test]
    fn test_all_yields_thirteen_in_order() {
        let all: Vec<usize> = MeasurementType::all().map(|t| t.index()).collect();
        assert_eq!(all, (0..13).collect::<Vec<_>>());
    }

    #[test]
    fn test_single_photo_types() {
        for t in MeasurementType::all() {
            let expected = if matches!(t.index(), 0 | 1 | 12) {
                PhotoCount::Single
            } else {
                PhotoCount::Pair
            };
            assert_eq!(t.descriptor().photos, expected, "type {}", t.index());
        }
    }

    #[test]
    fn test_every_descriptor_is_complete() {
        for t in MeasurementType::all() {
            let d = t.descriptor();
            assert!(!d.instruction.is_empty());
            assert!(d.endpoint.starts_with('/'));
            assert!(!d.result_keys.is_empty() && d.result_keys.len() <= 2);
            // 2枚撮影の種別だけが追加指示を持つ
            assert_eq!(d.follow_up.is_some(), d.photos == PhotoCount::Pair);
        }
    }

    #[test]
    fn test_only_lumbar_baseline_has_two_keys() {
        let pairs: Vec<usize> = MeasurementType::all()
            .filter(|t| t.descriptor().expects_pair_result())
            .map(|t| t.index())
            .collect();
        assert_eq!(pairs, vec![6]);
        assert_eq!(
            mt(6).descriptor().result_keys,
            &[keys::LUMBAR_LEFT, keys::LUMBAR_RIGHT]
        );
    }

    #[test]
    fn test_shared_keys() {
        assert_eq!(mt(2).descriptor().result_keys, mt(3).descriptor().result_keys);
        assert_eq!(mt(8).descriptor().result_keys, &[keys::CERVICAL_LEFT]);
        assert_eq!(mt(9).descriptor().result_keys, &[keys::CERVICAL_LEFT]);
        assert_eq!(mt(2).descriptor().endpoint, mt(3).descriptor().endpoint);
    }

    #[test]
    fn test_baseline_follow_up_is_next_instruction() {
        for index in [2, 4, 6, 8, 10] {
            assert_eq!(
                mt(index).descriptor().follow_up,
                Some(mt(index + 1).descriptor().instruction),
                "type {}",
                index
            );
        }
    }

    #[test]
    fn test_endpoint_url_joins_base() {
        let d = mt(0).descriptor();
        assert_eq!(d.endpoint_url("http://localhost:8000"), "http://localhost:8000/tragusleft");
        assert_eq!(d.endpoint_url("http://localhost:8000/"), "http://localhost:8000/tragusleft");
    }

    #[test]
    fn test_second_step_follow_up_repeats_own_text() {
        for index in [3, 5, 7, 9, 11] {
            let descriptor = mt(index).descriptor();
            assert_eq!(descriptor.follow_up, Some(descriptor.instruction), "index {}", index);
        }
    }

    #[test]
    fn test_from_index() {
        assert_eq!(MeasurementType::from_index(12), Some(mt(12)));
        assert_eq!(MeasurementType::from_index(13), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("8".parse::<MeasurementType>().unwrap(), mt(8));
        assert_eq!(" 12 ".parse::<MeasurementType>().unwrap(), mt(12));
        assert!("abc".parse::<MeasurementType>().is_err());
        assert!("13".parse::<MeasurementType>().is_err());
    }

    #[test]
    fn test_serde_validates_range() {
        let t: MeasurementType = serde_json::from_str("6").unwrap();
        assert_eq!(t, mt(6));
        assert!(serde_json::from_str::<MeasurementType>("99").is_err());
        assert_eq!(serde_json::to_string(&mt(6)).unwrap(), "6");
    }

    #[test]
    fn test_unit_symbols() {
        assert_eq!(mt(0).descriptor().unit.symbol(), "cm");
        assert_eq!(mt(8).descriptor().unit.symbol(), "°");
    }
}
