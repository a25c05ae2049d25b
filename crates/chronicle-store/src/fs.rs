use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use chronicle_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;
use crate::traits::ObjectStore;

/// Loose-object store on the local filesystem.
///
/// Each object lives in its own file under `<root>/objects/<aa>/<rest>`,
/// where `aa` is the first two hex characters of the object id. Writes go
/// through a temporary file in the same directory followed by an atomic
/// rename, so a crashed write never leaves a half-written object behind.
pub struct FileObjectStore {
    objects_dir: PathBuf,
}

impl FileObjectStore {
    /// Open (or create) a store rooted at the given vault directory.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let objects_dir = root.as_ref().join("objects");
        fs::create_dir_all(&objects_dir)?;
        Ok(Self { objects_dir })
    }

    fn object_path(&self, id: &ObjectId) -> PathBuf {
        let hex = id.to_hex();
        self.objects_dir.join(&hex[..2]).join(&hex[2..])
    }
}

impl ObjectStore for FileObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>> {
        let path = self.object_path(id);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let object: StoredObject =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::CorruptObject {
                id: *id,
                reason: format!("undecodable object file: {e}"),
            })?;
        Ok(Some(object))
    }

    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId> {
        let id = object.compute_id();
        if id.is_null() {
            return Err(StoreError::NullObjectId);
        }

        let path = self.object_path(&id);
        // Idempotent: an existing file already holds identical content.
        if path.exists() {
            return Ok(id);
        }

        let dir = path.parent().expect("object path has a parent");
        fs::create_dir_all(dir)?;

        let bytes =
            serde_json::to_vec(object).map_err(|e| StoreError::Serialization(e.to_string()))?;

        // Temp file in the target directory so the rename stays on one
        // filesystem and is atomic.
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;

        debug!(id = %id.short_hex(), kind = %object.kind, "object written");
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.object_path(id).exists())
    }
}

impl std::fmt::Debug for FileObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileObjectStore")
            .field("objects_dir", &self.objects_dir)
            .finish()
    }
}
