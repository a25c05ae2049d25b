use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use chronicle_types::ObjectId;

use crate::error::{RefError, RefResult};
use crate::traits::HeadStore;

/// File-backed head pointer: a `HEAD` file holding the hex id of the
/// current commit.
///
/// Updates write a temporary file next to `HEAD` and rename it into place,
/// so the pointer is replaced atomically and a crash mid-update leaves the
/// previous head intact.
pub struct FileHeadStore {
    path: PathBuf,
}

impl FileHeadStore {
    /// Open a head store inside the given vault directory.
    pub fn open(root: impl AsRef<Path>) -> RefResult<Self> {
        fs::create_dir_all(root.as_ref())?;
        Ok(Self {
            path: root.as_ref().join("HEAD"),
        })
    }
}

impl HeadStore for FileHeadStore {
    fn head(&self) -> RefResult<Option<ObjectId>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let id = ObjectId::from_hex(contents.trim())
            .map_err(|e| RefError::Malformed(e.to_string()))?;
        Ok(Some(id))
    }

    fn set_head(&self, id: ObjectId) -> RefResult<()> {
        let dir = self.path.parent().expect("HEAD path has a parent");
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        writeln!(tmp, "{}", id.to_hex())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| RefError::Io(e.error))?;
        debug!(head = %id.short_hex(), "head updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unset() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileHeadStore::open(dir.path()).unwrap();
        assert!(store.head().unwrap().is_none());
    }

    #[test]
    fn head_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let id = ObjectId::from_bytes(b"durable head");

        {
            let store = FileHeadStore::open(dir.path()).unwrap();
            store.set_head(id).unwrap();
        }

        let store = FileHeadStore::open(dir.path()).unwrap();
        assert_eq!(store.head().unwrap(), Some(id));
    }

    #[test]
    fn set_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileHeadStore::open(dir.path()).unwrap();
        store.set_head(ObjectId::from_bytes(b"first")).unwrap();
        let second = ObjectId::from_bytes(b"second");
        store.set_head(second).unwrap();
        assert_eq!(store.head().unwrap(), Some(second));
    }

    #[test]
    fn malformed_head_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileHeadStore::open(dir.path()).unwrap();
        fs::write(dir.path().join("HEAD"), "not hex at all").unwrap();
        let err = store.head().unwrap_err();
        assert!(matches!(err, RefError::Malformed(_)));
    }
}
