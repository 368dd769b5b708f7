//! JSONファイルのストア
//!
//! 書き込みのたびにファイル全体を保存する。一時ファイルに書いてから
//! 置き換えるため、途中で失敗しても前の内容は残る。

use super::KeyValueStore;
use crate::error::{BasmiError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// ファイル構造
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreFile {
    /// バージョン（互換性チェック用）
    version: u32,
    entries: BTreeMap<String, StoredEntry>,
}

/// 保存エントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    pub value: String,
    /// 更新日時（RFC 3339）
    pub updated_at: String,
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            version: JsonFileStore::CURRENT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    file: StoreFile,
}

impl JsonFileStore {
    const CURRENT_VERSION: u32 = 1;

    /// ストアを開く（ファイルがなければ空）
    ///
    /// 読めないファイルやバージョン違いは空として扱い、次の書き込みで作り直す。
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file = Self::read_file(&path).unwrap_or_default();
        Self { path, file }
    }

    fn read_file(path: &Path) -> Option<StoreFile> {
        if !path.exists() {
            return None;
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot open result store");
                return None;
            }
        };

        match serde_json::from_reader::<_, StoreFile>(BufReader::new(file)) {
            Ok(store) if store.version == Self::CURRENT_VERSION => Some(store),
            Ok(store) => {
                tracing::warn!(
                    path = %path.display(),
                    version = store.version,
                    "result store version mismatch, starting empty"
                );
                None
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable result store, starting empty");
                None
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entry(&self, key: &str) -> Option<&StoredEntry> {
        self.file.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.file.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file.entries.is_empty()
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp_path)?);
            serde_json::to_writer_pretty(&mut writer, &self.file)?;
            writer.flush()?;
        }
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.file.entries.get(key).map(|e| e.value.clone()))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let previous = self.file.entries.insert(
            key.to_string(),
            StoredEntry {
                value: value.to_string(),
                updated_at: chrono::Local::now().to_rfc3339(),
            },
        );

        if let Err(e) = self.save() {
            // 保存に失敗したらメモリ上も元に戻す
            match previous {
                Some(entry) => self.file.entries.insert(key.to_string(), entry),
                None => self.file.entries.remove(key),
            };
            return Err(BasmiError::Store(format!("{}: {}", self.path.display(), e)));
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let Some(previous) = self.file.entries.remove(key) else {
            return Ok(());
        };

        if let Err(e) = self.save() {
            self.file.entries.insert(key.to_string(), previous);
            return Err(BasmiError::Store(format!("{}: {}", self.path.display(), e)));
        }
        Ok(())
    }

    /// 全キーを書き込んでから1回だけ保存する
    fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<()> {
        let snapshot = self.file.entries.clone();
        let updated_at = chrono::Local::now().to_rfc3339();

        for &(key, value) in entries {
            self.file.entries.insert(
                key.to_string(),
                StoredEntry {
                    value: value.to_string(),
                    updated_at: updated_at.clone(),
                },
            );
        }

        if let Err(e) = self.save() {
            self.file.entries = snapshot;
            return Err(BasmiError::Store(format!("{}: {}", self.path.display(), e)));
        }
        Ok(())
    }
}
