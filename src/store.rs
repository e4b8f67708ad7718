//! Persistence surface for `UserProgress`: `load(user)` / `save(user, progress)`.
//!
//! The aggregator never touches storage; `service::ProgressService` wires the two.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::domain::UserProgress;
use crate::error::{CareerError, Result};

#[async_trait]
pub trait ProgressStore: Send + Sync {
  async fn load(&self, user_key: &str) -> Result<Option<UserProgress>>;
  async fn save(&self, user_key: &str, progress: &UserProgress) -> Result<()>;
}

/// In-process store. Cloning shares the same map.
#[derive(Clone, Default)]
pub struct MemoryStore {
  by_user: Arc<RwLock<HashMap<String, UserProgress>>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub async fn len(&self) -> usize {
    self.by_user.read().await.len()
  }
}

#[async_trait]
impl ProgressStore for MemoryStore {
  #[instrument(level = "debug", skip(self))]
  async fn load(&self, user_key: &str) -> Result<Option<UserProgress>> {
    Ok(self.by_user.read().await.get(user_key).cloned())
  }

  #[instrument(level = "debug", skip(self, progress), fields(total_points = progress.total_points))]
  async fn save(&self, user_key: &str, progress: &UserProgress) -> Result<()> {
    self.by_user
      .write()
      .await
      .insert(user_key.to_string(), progress.clone());
    Ok(())
  }
}

/// One pretty-printed JSON file per user under `dir`.
#[derive(Clone, Debug)]
pub struct FileStore {
  dir: PathBuf,
}

impl FileStore {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  fn path_for(&self, user_key: &str) -> Result<PathBuf> {
    if user_key.is_empty() {
      return Err(CareerError::Store("empty user key".into()));
    }
    Ok(self.dir.join(format!("{}.json", file_stem(user_key))))
  }
}

/// Escapes every byte outside `[A-Za-z0-9-]` as `_XX`, so distinct keys never share a file.
pub fn file_stem(user_key: &str) -> String {
  let mut out = String::with_capacity(user_key.len());
  for b in user_key.bytes() {
    if b.is_ascii_alphanumeric() || b == b'-' {
      out.push(char::from(b));
    } else {
      out.push_str(&format!("_{:02X}", b));
    }
  }
  out
}

#[async_trait]
impl ProgressStore for FileStore {
  #[instrument(level = "debug", skip(self))]
  async fn load(&self, user_key: &str) -> Result<Option<UserProgress>> {
    let path = self.path_for(user_key)?;
    let contents = match tokio::fs::read_to_string(&path).await {
      Ok(s) => s,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
      Err(e) => return Err(e.into()),
    };
    let progress = serde_json::from_str(&contents)
      .map_err(|e| CareerError::Store(format!("corrupt progress file {:?}: {}", path, e)))?;
    Ok(Some(progress))
  }

  #[instrument(level = "debug", skip(self, progress), fields(total_points = progress.total_points))]
  async fn save(&self, user_key: &str, progress: &UserProgress) -> Result<()> {
    let path = self.path_for(user_key)?;
    tokio::fs::create_dir_all(&self.dir).await?;
    let contents = serde_json::to_string_pretty(progress)?;

    // Write then rename so readers never see a half-written file.
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, contents).await?;
    tokio::fs::rename(&tmp, &path).await?;
    debug!(target: "career_progress", ?path, "Progress saved");
    Ok(())
  }
}
