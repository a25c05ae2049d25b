use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use walkdir::WalkDir;

use chronicle_types::{ProviderDatum, ProviderFile};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{Provider, Session};

/// Imports an already-downloaded export directory as provider files.
///
/// Many providers hand the user a zip to unpack by hand; this provider
/// walks the unpacked directory and yields every file, with its path
/// relative to the export root prefixed by the provider key. There is
/// nothing to dispatch or poll: the data is already local.
pub struct DirectoryProvider {
    key: String,
    root: PathBuf,
}

impl DirectoryProvider {
    pub fn new(key: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            key: key.into(),
            root: root.into(),
        }
    }
}

#[async_trait]
impl Provider for DirectoryProvider {
    fn key(&self) -> &str {
        &self.key
    }

    async fn verify(&self) -> ProviderResult<Session> {
        if !self.root.is_dir() {
            return Err(ProviderError::Acquisition {
                provider: self.key.clone(),
                reason: format!("export directory {} does not exist", self.root.display()),
            });
        }
        Ok(Session::new(&self.key))
    }

    async fn dispatch(&self) -> ProviderResult<()> {
        Ok(())
    }

    async fn poll_completion(&self) -> ProviderResult<bool> {
        Ok(true)
    }

    async fn parse(&self) -> ProviderResult<Vec<ProviderFile>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|e| ProviderError::Acquisition {
                provider: self.key.clone(),
                reason: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .map_err(|e| ProviderError::Acquisition {
                    provider: self.key.clone(),
                    reason: e.to_string(),
                })?;
            // Forward slashes regardless of platform: tree paths are
            // logical, not filesystem paths.
            let logical: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            let filepath = format!("{}/{}", self.key, logical.join("/"));
            let data = std::fs::read(entry.path())?;
            let data = normalize(entry.path(), data);
            files.push(ProviderFile::new(filepath, data));
        }
        debug!(provider = self.key, files = files.len(), "export directory parsed");
        Ok(files)
    }
}

/// Turn a raw export file into a record list where possible.
///
/// Export files are rarely shaped as record lists already; a JSON array of
/// objects is converted by taking the file stem as the record type and a
/// well-known id field as the stable key. Records without a stable key
/// would degrade every change to a delete+add pair, so such arrays (and
/// everything non-JSON) are passed through untouched and diffed as
/// generic content.
fn normalize(path: &Path, data: Vec<u8>) -> Vec<u8> {
    // Already a record list: leave as-is.
    if serde_json::from_slice::<Vec<ProviderDatum>>(&data).is_ok() {
        return data;
    }
    let Ok(Value::Array(items)) = serde_json::from_slice::<Value>(&data) else {
        return data;
    };
    let Some(data_type) = path.file_stem().and_then(|s| s.to_str()) else {
        return data;
    };

    let mut records = Vec::with_capacity(items.len());
    for item in &items {
        let Some(key) = record_key(item) else {
            return data;
        };
        records.push(ProviderDatum::new(data_type, key, item.clone()));
    }
    match serde_json::to_vec(&records) {
        Ok(bytes) => bytes,
        Err(_) => data,
    }
}

/// Stable identity of one export object, from its well-known id fields.
fn record_key(item: &Value) -> Option<String> {
    let obj = item.as_object()?;
    for field in ["id", "uri", "key"] {
        match obj.get(field) {
            Some(Value::String(s)) => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn walks_export_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("playlists")).unwrap();
        fs::write(dir.path().join("playlists/mix.json"), b"[]").unwrap();
        fs::write(dir.path().join("profile.json"), b"{}").unwrap();

        let provider = DirectoryProvider::new("spotify", dir.path());
        provider.verify().await.unwrap();
        let files = provider.parse().await.unwrap();

        let paths: Vec<&str> = files.iter().map(|f| f.filepath.as_str()).collect();
        assert_eq!(paths, vec!["spotify/playlists/mix.json", "spotify/profile.json"]);
    }

    #[tokio::test]
    async fn missing_directory_fails_verify() {
        let provider = DirectoryProvider::new("spotify", "/nonexistent/export");
        assert!(matches!(
            provider.verify().await,
            Err(ProviderError::Acquisition { .. })
        ));
    }

    #[tokio::test]
    async fn raw_json_array_normalized_to_records() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("playlists.json"),
            br#"[{"id": "p1", "title": "Mix"}, {"id": "p2", "title": "Gym"}]"#,
        )
        .unwrap();

        let provider = DirectoryProvider::new("spotify", dir.path());
        let files = provider.parse().await.unwrap();
        let records: Vec<ProviderDatum> = serde_json::from_slice(&files[0].data).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].data_type, "playlists");
        assert_eq!(records[0].key, "p1");
        assert_eq!(records[0].payload["title"], "Mix");
    }

    #[tokio::test]
    async fn array_without_stable_keys_passes_through() {
        let dir = tempfile::tempdir().unwrap();
        let raw = br#"[{"title": "no id here"}]"#;
        fs::write(dir.path().join("history.json"), raw).unwrap();

        let provider = DirectoryProvider::new("spotify", dir.path());
        let files = provider.parse().await.unwrap();
        assert_eq!(files[0].data, raw);
    }

    #[tokio::test]
    async fn record_list_files_kept_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![ProviderDatum::new(
            "track",
            "1",
            serde_json::json!({"name": "X"}),
        )];
        let bytes = serde_json::to_vec(&records).unwrap();
        fs::write(dir.path().join("tracks.json"), &bytes).unwrap();

        let provider = DirectoryProvider::new("spotify", dir.path());
        let files = provider.parse().await.unwrap();
        assert_eq!(files[0].data, bytes);
    }

    #[tokio::test]
    async fn empty_directory_yields_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let provider = DirectoryProvider::new("spotify", dir.path());
        assert!(provider.parse().await.unwrap().is_empty());
    }
}
