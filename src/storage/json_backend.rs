use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing::{debug, warn};

use crate::{
    domain::{Owned, OwnerId},
    errors::{FinanceError, Result},
    utils::{app_data_dir, books_dir_in, canonical_name, ensure_dir, hex_name, write_atomic},
};

use super::{book::BOOK_SCHEMA_VERSION, BookBackend, OwnerBook};

/// On-disk store keeping one pretty-printed JSON document per owner.
#[derive(Debug)]
pub struct JsonStore {
    root: PathBuf,
    books_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStore {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = root.unwrap_or_else(app_data_dir);
        ensure_dir(&root)?;
        let books_dir = books_dir_in(&root);
        ensure_dir(&books_dir)?;
        Ok(Self {
            root,
            books_dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    /// `<slug>-<hex id>.json`: the slug is for people, the hex keeps owners apart.
    pub fn book_path(&self, owner: &OwnerId) -> PathBuf {
        self.books_dir.join(format!(
            "{}-{}.json",
            canonical_name(owner.as_str(), "owner"),
            hex_name(owner.as_str())
        ))
    }

    fn load(&self, owner: &OwnerId) -> Result<OwnerBook> {
        let path = self.book_path(owner);
        if !path.exists() {
            return Ok(OwnerBook::default());
        }
        load_book_from_path(&path)
    }
}

impl BookBackend for JsonStore {
    fn read_book<T>(
        &self,
        owner: &OwnerId,
        read: impl FnOnce(&OwnerBook) -> Result<T>,
    ) -> Result<T> {
        let book = self.load(owner)?;
        read(&book)
    }

    fn write_book<T>(
        &self,
        owner: &OwnerId,
        write: impl FnOnce(&mut OwnerBook) -> Result<T>,
    ) -> Result<T> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| FinanceError::Storage("json store lock poisoned".into()))?;
        let mut book = self.load(owner)?;
        let value = write(&mut book)?;
        let path = self.book_path(owner);
        save_book_to_path(&book, &path)?;
        debug!(owner = %owner, path = %path.display(), "book saved");
        Ok(value)
    }
}

pub fn save_book_to_path(book: &OwnerBook, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(book)?;
    write_atomic(path, &json)
}

pub fn load_book_from_path(path: &Path) -> Result<OwnerBook> {
    let data = fs::read_to_string(path)?;
    let book: OwnerBook = serde_json::from_str(&data)?;
    if book.schema_version > BOOK_SCHEMA_VERSION {
        return Err(FinanceError::Storage(format!(
            "book `{}` is from a newer schema version",
            path.display()
        )));
    }
    for warning in book_warnings(&book) {
        warn!(path = %path.display(), "{}", warning);
    }
    Ok(book)
}

/// Entries whose owner does not match the book's own records, which usually means the
/// file was copied between owners by hand.
pub fn book_warnings(book: &OwnerBook) -> Vec<String> {
    let mut owners = book
        .records
        .iter()
        .map(Owned::owner)
        .chain(book.categories.iter().map(Owned::owner))
        .chain(book.budgets.iter().map(Owned::owner))
        .chain(book.predictions.iter().map(Owned::owner))
        .chain(book.savings.iter().map(Owned::owner));
    let Some(first) = owners.next() else {
        return Vec::new();
    };
    owners
        .filter(|owner| *owner != first)
        .map(|owner| format!("entry owned by `{}` stored in book of `{}`", owner, first))
        .collect()
}
