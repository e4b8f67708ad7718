//! Orchestration: load, apply, save, with updates for one user serialized.
//!
//! `ProgressService` owns the catalog and a `ProgressStore`. Within a process,
//! two `record` calls for the same user never interleave; across processes the
//! store decides (last write wins for the bundled stores).

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::catalog::Catalog;
use crate::domain::{CareerRoadmap, ProgressUpdate, UserProgress};
use crate::error::Result;
use crate::progress::{apply_at, initialize_user_progress, ProgressOutcome};
use crate::store::ProgressStore;

pub struct ProgressService<S: ProgressStore> {
  store: S,
  catalog: Arc<Catalog>,
  user_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S: ProgressStore> ProgressService<S> {
  pub fn new(store: S, catalog: Catalog) -> Self {
    Self { store, catalog: Arc::new(catalog), user_locks: Mutex::new(HashMap::new()) }
  }

  pub fn catalog(&self) -> &Catalog {
    &self.catalog
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  async fn lock_for(&self, user_key: &str) -> Arc<Mutex<()>> {
    let mut locks = self.user_locks.lock().await;
    locks.entry(user_key.to_string()).or_default().clone()
  }

  /// Drops the user's lock entry once no other caller holds or awaits it.
  async fn release(&self, user_key: &str, lock: Arc<Mutex<()>>) {
    let mut locks = self.user_locks.lock().await;
    // Clones are only handed out under `user_locks`, so the count is stable here.
    if Arc::strong_count(&lock) == 2 {
      locks.remove(user_key);
    }
  }

  /// Users with an update in flight.
  pub async fn tracked_users(&self) -> usize {
    self.user_locks.lock().await.len()
  }

  /// Stored snapshot, or a fresh one (not persisted) for a new user.
  #[instrument(level = "debug", skip(self))]
  pub async fn progress_for(&self, user_key: &str, domain: &str) -> Result<UserProgress> {
    match self.store.load(user_key).await? {
      Some(p) => Ok(p),
      None => {
        info!(target: "career_progress", %user_key, %domain, "Initializing progress for new user");
        Ok(initialize_user_progress(domain, &self.catalog, Utc::now()))
      }
    }
  }

  pub async fn record(
    &self,
    user_key: &str,
    domain: &str,
    update: &ProgressUpdate,
    roadmap: &CareerRoadmap,
  ) -> Result<ProgressOutcome> {
    self.record_at(user_key, domain, update, roadmap, Utc::now()).await
  }

  /// Read-modify-write under the user's lock. Nothing is saved if the update is rejected.
  #[instrument(level = "info", skip(self, update, roadmap), fields(kind = ?update.kind()))]
  pub async fn record_at(
    &self,
    user_key: &str,
    domain: &str,
    update: &ProgressUpdate,
    roadmap: &CareerRoadmap,
    now: DateTime<Utc>,
  ) -> Result<ProgressOutcome> {
    let lock = self.lock_for(user_key).await;
    let result = {
      let _guard = lock.lock().await;
      self.record_locked(user_key, domain, update, roadmap, now).await
    };
    self.release(user_key, lock).await;
    result
  }

  async fn record_locked(
    &self,
    user_key: &str,
    domain: &str,
    update: &ProgressUpdate,
    roadmap: &CareerRoadmap,
    now: DateTime<Utc>,
  ) -> Result<ProgressOutcome> {
    let current = match self.store.load(user_key).await? {
      Some(p) => p,
      None => initialize_user_progress(domain, &self.catalog, now),
    };
    let outcome = apply_at(&current, update, roadmap, &self.catalog, now)?;
    self.store.save(user_key, &outcome.progress).await?;

    if outcome.leveled_up {
      info!(
        target: "progress",
        %user_key,
        level = outcome.progress.current_level.level,
        title = %outcome.progress.current_level.title,
        "Level up"
      );
    }
    for badge in &outcome.new_badges {
      info!(target: "progress", %user_key, badge = %badge.id, "Badge unlocked");
    }
    Ok(outcome)
  }
}
