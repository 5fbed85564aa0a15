//! The on-disk store file.
//!
//! The file is a YAML mapping of entry key -> encoded secret:
//!
//! ```text
//! github:alice: 9Xk1...
//! gitlab:bob: Qm3c...
//! ```
//!
//! Nothing is cached between operations.  Every operation opens the
//! file, reads the whole map, and (for updates) writes the whole map
//! back through a [`Transaction`].  The file handle lives only as long
//! as the transaction.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{KeyringError, Result};

/// Entry key -> encoded secret.
pub type Entries = BTreeMap<String, String>;

/// How a transaction writes the updated map back to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteMode {
    /// Write a sibling temp file, then rename it over the store.
    #[default]
    Atomic,
    /// Truncate the open handle and rewrite it in place.
    InPlace,
}

/// Resolve the directory the store path is relative to.
///
/// This is the user's home directory, except that a bare `/` home
/// (common for system accounts in containers) maps to `/root`.
pub fn home_root() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(KeyringError::HomeDirUnavailable)?;
    Ok(resolve_home(home))
}

fn resolve_home(home: PathBuf) -> PathBuf {
    if home == Path::new("/") {
        return PathBuf::from("/root");
    }
    home
}

/// Handle to a store file on disk.
#[derive(Debug, Clone)]
pub struct StoreFile {
    path: PathBuf,
    write_mode: WriteMode,
}

impl StoreFile {
    /// Open the store at `path`, creating it (and its parent
    /// directories) with an empty map if it does not exist yet.
    ///
    /// An existing file is left untouched, so this is safe to call
    /// on every start-up.
    pub fn open(path: &Path, write_mode: WriteMode) -> Result<Self> {
        let store = Self {
            path: path.to_path_buf(),
            write_mode,
        };

        if !path.exists() {
            store.initialize()?;
        }

        Ok(store)
    }

    fn initialize(&self) -> Result<()> {
        let init_err = |source| KeyringError::Init {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(init_err)?;
        }

        let mut file = match new_file_options().create_new(true).open(&self.path) {
            Ok(file) => file,
            // Someone else created it between the check and here.
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(()),
            Err(e) => return Err(init_err(e)),
        };

        let empty = serialize(&Entries::new())?;
        file.write_all(empty.as_bytes()).map_err(init_err)?;

        tracing::info!(path = %self.path.display(), "created empty store file");
        Ok(())
    }

    /// Returns the path to the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the configured write mode.
    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    /// Read the whole map.  The file is never modified.
    pub fn read(&self) -> Result<Entries> {
        let tx = self.open_transaction(false)?;
        Ok(tx.entries)
    }

    /// Run a read-modify-write cycle.
    ///
    /// `f` gets the decoded map; if it returns `Ok`, the whole map is
    /// written back.  If it returns `Err`, the file is left as it was.
    pub fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Entries) -> Result<T>,
    {
        let mut tx = self.begin()?;
        let value = f(tx.entries_mut())?;
        tx.commit()?;
        Ok(value)
    }

    /// Open the file read-write and decode it into a [`Transaction`].
    pub fn begin(&self) -> Result<Transaction<'_>> {
        self.open_transaction(true)
    }

    fn open_transaction(&self, writable: bool) -> Result<Transaction<'_>> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(writable)
            .open(&self.path)?;

        let mut raw = Vec::new();
        file.read_to_end(&mut raw)?;
        let entries = self.parse(&raw)?;

        tracing::debug!(
            path = %self.path.display(),
            entries = entries.len(),
            writable,
            "store read"
        );

        Ok(Transaction {
            store: self,
            file,
            entries,
        })
    }

    fn parse(&self, raw: &[u8]) -> Result<Entries> {
        // An initialized store always holds at least `{}`; an empty file
        // means an in-place write was cut short and entries were lost.
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Err(KeyringError::CorruptStore {
                path: self.path.clone(),
                reason: "file is empty".into(),
            });
        }

        serde_yaml::from_slice(raw).map_err(|e| KeyringError::CorruptStore {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }
}

/// An open store file plus its decoded contents.
///
/// Dropping a transaction without calling [`commit`](Self::commit)
/// closes the file and discards any changes.
pub struct Transaction<'a> {
    store: &'a StoreFile,
    file: File,
    entries: Entries,
}

impl Transaction<'_> {
    /// The decoded map.
    pub fn entries(&self) -> &Entries {
        &self.entries
    }

    /// Mutable access to the decoded map.
    pub fn entries_mut(&mut self) -> &mut Entries {
        &mut self.entries
    }

    /// Write the whole map back to disk and close the file.
    pub fn commit(self) -> Result<()> {
        let text = serialize(&self.entries)?;

        match self.store.write_mode {
            WriteMode::InPlace => {
                let mut file = self.file;
                file.set_len(0)?;
                file.seek(SeekFrom::Start(0))?;
                file.write_all(text.as_bytes())?;
                file.flush()?;
            }
            WriteMode::Atomic => {
                let path = &self.store.path;
                let parent = path.parent().unwrap_or(Path::new("."));
                let tmp_path = parent.join(format!(
                    ".{}.tmp",
                    path.file_name().unwrap_or_default().to_string_lossy()
                ));

                let mut tmp = new_file_options()
                    .create(true)
                    .truncate(true)
                    .open(&tmp_path)?;
                tmp.write_all(text.as_bytes())?;
                tmp.sync_all()?;
                drop(tmp);

                // Release the old handle before the rename replaces its file.
                drop(self.file);
                fs::rename(&tmp_path, path)?;
            }
        }

        tracing::debug!(
            path = %self.store.path.display(),
            entries = self.entries.len(),
            mode = ?self.store.write_mode,
            "store written"
        );
        Ok(())
    }
}

fn serialize(entries: &Entries) -> Result<String> {
    serde_yaml::to_string(entries).map_err(|e| KeyringError::Serialization(e.to_string()))
}

/// Options for files that hold secrets: owner-only on Unix.
fn new_file_options() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.write(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_path(dir: &TempDir) -> PathBuf {
        dir.path().join("share").join("app").join("keyring.yaml")
    }

    #[test]
    fn bare_slash_home_maps_to_root() {
        assert_eq!(resolve_home(PathBuf::from("/")), PathBuf::from("/root"));
    }

    #[test]
    fn regular_home_is_kept() {
        assert_eq!(
            resolve_home(PathBuf::from("/home/alice")),
            PathBuf::from("/home/alice")
        );
        assert_eq!(resolve_home(PathBuf::from("/root")), PathBuf::from("/root"));
    }

    #[test]
    fn open_creates_parents_and_empty_map() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);

        let store = StoreFile::open(&path, WriteMode::Atomic).unwrap();
        assert!(path.exists());
        assert!(store.read().unwrap().is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "{}");
    }

    #[test]
    fn open_leaves_existing_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keyring.yaml");
        fs::write(&path, "svc:user: abc\n").unwrap();

        StoreFile::open(&path, WriteMode::Atomic).unwrap();
        StoreFile::open(&path, WriteMode::Atomic).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "svc:user: abc\n");
    }

    #[test]
    fn open_fails_through_a_regular_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let err = StoreFile::open(&blocker.join("keyring.yaml"), WriteMode::Atomic).unwrap_err();
        assert!(matches!(err, KeyringError::Init { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn new_store_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        StoreFile::open(&path, WriteMode::Atomic).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0);
    }

    #[test]
    fn update_writes_whole_map_in_both_modes() {
        for mode in [WriteMode::Atomic, WriteMode::InPlace] {
            let dir = TempDir::new().unwrap();
            let store = StoreFile::open(&store_path(&dir), mode).unwrap();

            store
                .update(|e| {
                    e.insert("a:1".into(), "x".repeat(200));
                    e.insert("b:2".into(), "y".into());
                    Ok(())
                })
                .unwrap();
            // Shrinking the file must not leave stale bytes behind.
            store
                .update(|e| {
                    e.remove("a:1");
                    Ok(())
                })
                .unwrap();

            let entries = store.read().unwrap();
            assert_eq!(entries.len(), 1, "mode {mode:?}");
            assert_eq!(entries["b:2"], "y");
        }
    }

    #[test]
    fn atomic_commit_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keyring.yaml");
        let store = StoreFile::open(&path, WriteMode::Atomic).unwrap();

        store
            .update(|e| {
                e.insert("k".into(), "v".into());
                Ok(())
            })
            .unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("keyring.yaml")]);
    }

    #[test]
    fn failed_closure_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keyring.yaml");
        let store = StoreFile::open(&path, WriteMode::InPlace).unwrap();
        let before = fs::read(&path).unwrap();

        let result: Result<()> = store.update(|e| {
            e.insert("k".into(), "v".into());
            Err(KeyringError::CommandFailed("abort".into()))
        });
        assert!(result.is_err());
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn empty_file_is_corrupt() {
        for contents in ["", "  \n\n"] {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("keyring.yaml");
            fs::write(&path, contents).unwrap();

            let store = StoreFile::open(&path, WriteMode::Atomic).unwrap();
            let err = store.read().unwrap_err();
            assert!(matches!(err, KeyringError::CorruptStore { .. }), "got {err:?}");

            // Updates must not paper over the lost contents either.
            assert!(store.update(|_| Ok(())).is_err());
            assert_eq!(fs::read_to_string(&path).unwrap(), contents);
        }
    }

    #[test]
    fn garbage_file_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("keyring.yaml");
        fs::write(&path, "- just\n- a\n- list\n").unwrap();

        let store = StoreFile::open(&path, WriteMode::Atomic).unwrap();
        let err = store.read().unwrap_err();
        assert!(matches!(err, KeyringError::CorruptStore { .. }));
    }
}
