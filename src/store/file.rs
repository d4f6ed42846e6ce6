//! File-backed key-value store

use crate::error::{BacklogError, BacklogResult};
use crate::store::KeyValueStore;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Stores each key as `<state_dir>/<key>.json`
pub struct FileStore {
    state_dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `state_dir`, creating the directory if needed
    pub async fn open(state_dir: impl Into<PathBuf>) -> BacklogResult<Self> {
        let state_dir = state_dir.into();
        fs::create_dir_all(&state_dir).await.map_err(|e| {
            BacklogError::io(format!("creating state directory {}", state_dir.display()), e)
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o700);
            std::fs::set_permissions(&state_dir, perms)
                .map_err(|e| BacklogError::io("setting state dir permissions", e))?;
        }

        Ok(Self { state_dir })
    }

    /// Directory holding the store files
    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.state_dir.join(format!("{}.json", key))
    }

    fn tmp_path(&self, key: &str) -> PathBuf {
        self.state_dir.join(format!(".{}.json.tmp", key))
    }
}

/// Write `value` to a fresh file that is owner-only from the moment it exists
async fn write_private(path: &Path, value: &str) -> std::io::Result<()> {
    // Leftover from an interrupted write
    match fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(value.as_bytes()).await?;
    file.sync_all().await
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> BacklogResult<Option<String>> {
        let path = self.key_path(key);

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| BacklogError::io(format!("reading store file {}", path.display()), e))?;

        Ok(Some(content))
    }

    async fn set(&self, key: &str, value: &str) -> BacklogResult<()> {
        let path = self.key_path(key);
        let tmp = self.tmp_path(key);

        let written = match write_private(&tmp, value).await {
            Ok(()) => fs::rename(&tmp, &path).await.map_err(|e| {
                BacklogError::io(format!("replacing store file {}", path.display()), e)
            }),
            Err(e) => Err(BacklogError::io(
                format!("writing store file {}", tmp.display()),
                e,
            )),
        };

        if written.is_err() {
            let _ = fs::remove_file(&tmp).await;
        }
        written?;

        debug!("Wrote {} ({} bytes)", key, value.len());
        Ok(())
    }

    async fn delete(&self, key: &str) -> BacklogResult<bool> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(false);
        }

        fs::remove_file(&path)
            .await
            .map_err(|e| BacklogError::io(format!("removing store file {}", path.display()), e))?;
        Ok(true)
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
