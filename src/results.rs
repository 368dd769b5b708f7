//! 結果一覧の読み込みと表示

use crate::error::Result;
use crate::store::KeyValueStore;
use basmi_common::{keys, render_board, RenderedSection};
use std::collections::HashMap;

/// 全キーを読み込む
pub fn read_results<S>(store: &S) -> Result<HashMap<&'static str, String>>
where
    S: KeyValueStore + ?Sized,
{
    let mut values = HashMap::new();
    for key in keys::ALL {
        if let Some(value) = store.get(key)? {
            values.insert(key, value);
        }
    }
    Ok(values)
}

pub fn results_board<S: KeyValueStore + ?Sized>(store: &S) -> Result<Vec<RenderedSection>> {
    let values = read_results(store)?;
    Ok(render_board(|key| values.get(key).cloned()))
}

pub fn format_board(sections: &[RenderedSection]) -> String {
    let mut out = String::new();
    for section in sections {
        out.push_str(&format!("[{}]\n", section.title));
        for line in &section.lines {
            out.push_str(&format!("  {}\n", line));
        }
    }
    out
}
