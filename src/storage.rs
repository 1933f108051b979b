#[cfg(test)]
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::StorageError;
use crate::models::{Nomination, NominationList};

/// 提名列表在存储中的键
pub const NOMINATIONS_KEY: &str = "nominationsInLocalStorage";

/// 字符串键值存储
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// 基于单个 JSON 文件的键值存储 (`{"key": "value"}`)
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(map)?;

        // 先写临时文件再重命名，避免中途失败留下半个文件
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_map()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // 文件损坏时从空表重建，而不是让每次写入都失败
        let mut map = match self.read_map() {
            Ok(map) => map,
            Err(StorageError::Json(err)) => {
                warn!(path = %self.path.display(), error = %err, "storage file is corrupt, rewriting");
                BTreeMap::new()
            }
            Err(err) => return Err(err),
        };
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }
}

/// 内存键值存储
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<BTreeMap<String, String>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// 加载提名列表；不存在或无法解析时返回空列表
pub fn load_nominations(store: &dyn KeyValueStore) -> NominationList {
    let raw = match store.get_item(NOMINATIONS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return NominationList::new(),
        Err(err) => {
            warn!(error = %err, "cannot read stored nominations, starting empty");
            return NominationList::new();
        }
    };

    match serde_json::from_str::<Option<Vec<Nomination>>>(&raw) {
        Ok(entries) => {
            let list = NominationList::from_entries(entries.unwrap_or_default());
            debug!(count = list.len(), "loaded nominations");
            list
        }
        Err(err) => {
            warn!(error = %err, "stored nominations are malformed, starting empty");
            NominationList::new()
        }
    }
}

/// 保存提名列表（整体序列化后写入）
pub fn save_nominations(
    store: &dyn KeyValueStore,
    nominations: &NominationList,
) -> Result<(), StorageError> {
    let content = serde_json::to_string(nominations.entries())?;
    store.set_item(NOMINATIONS_KEY, &content)?;
    debug!(count = nominations.len(), "saved nominations");
    Ok(())
}
