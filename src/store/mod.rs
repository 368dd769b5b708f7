//! 結果の保存先（キー・値ストア）
//!
//! 値は文字列で保存し、同じキーへの書き込みは後勝ち。

mod file;

pub use file::{JsonFileStore, StoredEntry};

use crate::error::Result;
use std::collections::HashMap;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;

    /// 複数キーをまとめて書き込む
    ///
    /// 途中で失敗した場合は書き込み済みのキーを元の値に戻し、
    /// 全キーが書き込み前の状態のままエラーを返す。
    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        let mut written: Vec<(&str, Option<String>)> = Vec::with_capacity(entries.len());

        for &(key, value) in entries {
            let previous = self.get(key)?;
            if let Err(e) = self.set(key, value) {
                for (key, previous) in written.into_iter().rev() {
                    let restored = match previous {
                        Some(old) => self.set(key, &old),
                        None => self.remove(key),
                    };
                    if let Err(restore_error) = restored {
                        tracing::error!(key, error = %restore_error, "failed to restore previous value");
                    }
                }
                return Err(e);
            }
            written.push((key, previous));
        }
        Ok(())
    }
}

/// メモリ上のストア
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        (**self).set_many(entries)
    }
}
