//! ホーム画面（測定項目の選択）

use crate::error::{BasmiError, Result};
use basmi_common::MeasurementType;
use dialoguer::Select;

/// 項目を選んだときの遷移先
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeTarget {
    /// 測定画面（開始する測定種別）
    Measure(MeasurementType),
    /// 結果一覧
    Results,
}

/// ホーム画面の項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HomeEntry {
    pub section: &'static str,
    pub label: &'static str,
    pub target: HomeTarget,
}

const fn measure(section: &'static str, label: &'static str, index: u8) -> HomeEntry {
    let target = match MeasurementType::from_index(index) {
        Some(measurement) => HomeTarget::Measure(measurement),
        None => panic!("home entry points at an unknown measurement type"),
    };
    HomeEntry {
        section,
        label,
        target,
    }
}

pub const HOME_ENTRIES: [HomeEntry; 9] = [
    measure("Tragus to Wall", "Left", 0),
    measure("Tragus to Wall", "Right", 1),
    measure("Side Lumbar Flexion", "Left", 2),
    measure("Side Lumbar Flexion", "Right", 4),
    measure("Lumbar Flexion (Modified)", "Measure", 6),
    measure("Cervical Rotation", "Left", 8),
    measure("Cervical Rotation", "Right", 10),
    measure("Intermalleolar Distance", "Measure", 12),
    HomeEntry {
        section: "Results",
        label: "Show",
        target: HomeTarget::Results,
    },
];

impl HomeEntry {
    pub fn title(&self) -> String {
        format!("{} - {}", self.section, self.label)
    }

    /// 測定種別（結果表示の項目は None）
    pub fn measurement(&self) -> Option<MeasurementType> {
        match self.target {
            HomeTarget::Measure(measurement) => Some(measurement),
            HomeTarget::Results => None,
        }
    }
}

/// 選択結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeChoice {
    Measure(MeasurementType),
    Results,
    Quit,
}

pub fn choice_for(entry: &HomeEntry) -> HomeChoice {
    match entry.target {
        HomeTarget::Measure(measurement) => HomeChoice::Measure(measurement),
        HomeTarget::Results => HomeChoice::Results,
    }
}

/// 対話式で項目を選択（Esc / q で終了）
pub fn select_interactive() -> Result<HomeChoice> {
    let titles: Vec<String> = HOME_ENTRIES.iter().map(HomeEntry::title).collect();

    let selected = Select::new()
        .with_prompt("測定項目を選択してください")
        .items(&titles)
        .default(0)
        .interact_opt()
        .map_err(|e| BasmiError::Prompt(e.to_string()))?;

    Ok(match selected {
        Some(i) => choice_for(&HOME_ENTRIES[i]),
        None => HomeChoice::Quit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use basmi_common::PhotoCount;

    #[test]
    fn test_home_links_start_each_procedure() {
        let indices: Vec<usize> = HOME_ENTRIES
            .iter()
            .filter_map(HomeEntry::measurement)
            .map(|m| m.index())
            .collect();
        assert_eq!(indices, vec![0, 1, 2, 4, 6, 8, 10, 12]);
    }

    #[test]
    fn test_two_photo_entries_start_at_baseline() {
        for entry in HOME_ENTRIES.iter() {
            if let Some(m) = entry.measurement() {
                if m.descriptor().photos == PhotoCount::Pair {
                    assert_eq!(m.index() % 2, 0, "{}", entry.title());
                }
            }
        }
    }

    #[test]
    fn test_results_entry() {
        let last = HOME_ENTRIES[HOME_ENTRIES.len() - 1];
        assert_eq!(choice_for(&last), HomeChoice::Results);
        assert_eq!(last.target, HomeTarget::Results);
        assert!(last.measurement().is_none());
        assert_eq!(last.title(), "Results - Show");
    }

    #[test]
    fn test_measure_entries_choose_measurement() {
        let first = HOME_ENTRIES[0];
        assert_eq!(first.target, HomeTarget::Measure(MeasurementType::new(0).unwrap()));
        assert_eq!(choice_for(&first), HomeChoice::Measure(MeasurementType::new(0).unwrap()));
    }
}
