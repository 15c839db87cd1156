//! In-memory файловое хранилище / In-memory file store
//!
//! Имя файла → байты, без каталогов и прав.
//! File name → bytes, no directories, no permissions.

use std::collections::BTreeMap;

use log::info;

#[derive(Debug, Default)]
pub struct FileStore {
    files: BTreeMap<String, Vec<u8>>,
}

impl FileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Создать или перезаписать. Возвращает `true`, если файл уже был.
    /// Create or overwrite. Returns `true` if the file already existed.
    pub fn create(&mut self, name: &str, data: Vec<u8>) -> bool {
        let len = data.len();
        let existed = self.files.insert(name.to_owned(), data).is_some();
        info!("[fs] {} '{}' ({} bytes)", if existed { "overwrote" } else { "created" }, name, len);
        existed
    }

    pub fn read(&self, name: &str) -> Option<&[u8]> {
        self.files.get(name).map(Vec::as_slice)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
