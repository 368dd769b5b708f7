//! 結果一覧と手順ガイド
//!
//! 保存済みの値を5区分の一覧として表示する。左右で同じキーを共有する種別は、
//! 同じ値がそれぞれの表示枠に出る。

use crate::measurement::{keys, MeasurementType, Unit};

/// 一覧の表示枠
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultSlot {
    pub side: &'static str,
    pub key: &'static str,
    pub unit: Unit,
}

/// 一覧の区分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSection {
    pub title: &'static str,
    pub slots: &'static [ResultSlot],
}

pub static RESULTS_BOARD: [BoardSection; 5] = [
    BoardSection {
        title: "Tragus to Wall",
        slots: &[
            ResultSlot { side: "Left", key: keys::TRAGUS_LEFT, unit: Unit::Centimeters },
            ResultSlot { side: "Right", key: keys::TRAGUS_RIGHT, unit: Unit::Centimeters },
        ],
    },
    BoardSection {
        title: "Side Lumbar Flexion",
        slots: &[
            ResultSlot { side: "Left", key: keys::SIDE_LEFT, unit: Unit::Centimeters },
            ResultSlot { side: "Right", key: keys::SIDE_RIGHT, unit: Unit::Centimeters },
        ],
    },
    BoardSection {
        title: "Lumbar Flexion (Modified)",
        slots: &[
            ResultSlot { side: "Left", key: keys::LUMBAR_LEFT, unit: Unit::Centimeters },
            ResultSlot { side: "Right", key: keys::LUMBAR_RIGHT, unit: Unit::Centimeters },
        ],
    },
    BoardSection {
        title: "Cervical Rotation",
        slots: &[
            ResultSlot { side: "Left", key: keys::CERVICAL_LEFT, unit: Unit::Degrees },
            ResultSlot { side: "Right", key: keys::CERVICAL_RIGHT, unit: Unit::Degrees },
        ],
    },
    BoardSection {
        title: "Intermalleolar Distance",
        slots: &[ResultSlot { side: "Right", key: keys::INTERMALLEOLAR, unit: Unit::Centimeters }],
    },
];

/// 保存文字列を表示用の数値にする（未設定・数値以外は0）
pub fn display_value(raw: Option<&str>) -> f64 {
    let value = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0);
    // -0 は 0 と表示する
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

/// 表示枠1つ分の文字列（例: "Left: 4.2 cm"）
pub fn format_slot(slot: &ResultSlot, raw: Option<&str>) -> String {
    format!("{}: {} {}", slot.side, display_value(raw), slot.unit.symbol())
}

/// 描画済みの区分
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSection {
    pub title: &'static str,
    pub lines: Vec<String>,
}

/// 一覧を描画する。`lookup` はキーから保存文字列を返す
pub fn render_board<F>(lookup: F) -> Vec<RenderedSection>
where
    F: Fn(&str) -> Option<String>,
{
    RESULTS_BOARD
        .iter()
        .map(|section| RenderedSection {
            title: section.title,
            lines: section
                .slots
                .iter()
                .map(|slot| format_slot(slot, lookup(slot.key).as_deref()))
                .collect(),
        })
        .collect()
}

/// 測定種別ごと（index順13枠）の表示値
pub fn slot_values<F>(lookup: F) -> [f64; MeasurementType::COUNT]
where
    F: Fn(&str) -> Option<String>,
{
    let mut values = [0.0; MeasurementType::COUNT];
    for t in MeasurementType::all() {
        let key = t.descriptor().result_keys[0];
        values[t.index()] = display_value(lookup(key).as_deref());
    }
    values
}

/// 検査者向け手順ガイド
pub static PROCEDURE_GUIDES: [(&str, &[&str]); 5] = [
    (
        "Tragus to Wall",
        &["Patient stands with back to wall, their knees straight and shoulder blades, buttocks, and heels against the wall. \
Feet should be hip width apart and parallel. With head in neutral position, patient draws chin in as far as possible. \
Examiner measures tragus to wall. This is repeated on the left and right."],
    ),
    (
        "Lumbar Side Flexion",
        &[
            "Patient stands with back to wall, their knees straight and shoulder blades, buttocks, and heels against the wall. \
Feet should be hip width apart and parallel. Examiner measures the distance from tip of middle finger to floor.",
            "Patient reaches towards the floor by side flexing (sliding hand down outside of leg as far as possible). \
Examiner measures the tip of middle finger to floor again and calculates the difference. This is repeated on the left and right.",
        ],
    ),
    (
        "Lumbar Flexion (Modified)",
        &[
            "Patient stands with back to wall, their knees straight and shoulder blades, buttocks, and heels against the wall. \
Feet should be hip width apart and parallel. Examiner measures the distance from tip of middle finger to floor.",
            "Patient bends forward, keeping knees straight. Examiner measures the tip of middle finger to floor again and calculates the difference. \
This is repeated on the left and right.",
        ],
    ),
    (
        "Cervical Rotation",
        &["Patient lies on floor, with their forehead horizontal and head in neutral position. Examiner uses a goniometer or inclinometer to measure. \
Patient rotates head as far as possible, keeping shoulders still. Examiner measures the rotation. This is measured on both sides."],
    ),
    (
        "Intermalleolar Distance",
        &["Patient lies on the floor. Keeping knees straight and legs in contact with the floor, patient takes legs as far apart as possible. \
Examiner measures the distance between the medial malleoli (inner ankles)."],
    ),
];
