//! Boundary to the generative-text service.
//!
//! The service itself is a collaborator (`TextGenerator`) owned by the host
//! application and passed in explicitly. Every call here runs under a deadline
//! and can be cancelled. Output always goes through the sanitizer before it is
//! trusted, and a malformed answer is re-requested at most `max_attempts - 1`
//! times.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{error, info, instrument, warn};

use crate::config::GenerationCfg;
use crate::error::{CareerError, Result};
use crate::sanitize::sanitize_into;
use crate::util::trunc_for_log;

/// Prompt in, free text out. Implementations map transport failures to
/// `CareerError::UpstreamGeneration`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
  async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Cancels every `CancelToken` cloned from its pair.
#[derive(Debug)]
pub struct CancelHandle {
  tx: watch::Sender<bool>,
}

impl CancelHandle {
  pub fn cancel(&self) {
    let _ = self.tx.send(true);
  }
}

#[derive(Clone, Debug)]
pub struct CancelToken {
  rx: watch::Receiver<bool>,
}

impl CancelToken {
  /// A token nobody can cancel.
  pub fn never() -> Self {
    let (_tx, rx) = watch::channel(false);
    Self { rx }
  }

  pub fn is_cancelled(&self) -> bool {
    *self.rx.borrow()
  }

  /// Resolves once cancelled. Pends forever if the handle is gone without cancelling.
  pub async fn cancelled(&self) {
    let mut rx = self.rx.clone();
    if rx.wait_for(|c| *c).await.is_err() {
      std::future::pending::<()>().await;
    }
  }
}

pub fn cancel_pair() -> (CancelHandle, CancelToken) {
  let (tx, rx) = watch::channel(false);
  (CancelHandle { tx }, CancelToken { rx })
}

#[derive(Clone, Debug)]
pub struct GenerationPolicy {
  pub timeout: Duration,
  /// Total tries for malformed output. Upstream failures are never retried here.
  pub max_attempts: u32,
}

impl Default for GenerationPolicy {
  fn default() -> Self {
    Self { timeout: Duration::from_secs(30), max_attempts: 2 }
  }
}

impl From<&GenerationCfg> for GenerationPolicy {
  fn from(cfg: &GenerationCfg) -> Self {
    Self {
      timeout: Duration::from_secs(cfg.timeout_secs.max(1)),
      max_attempts: cfg.max_attempts.max(1),
    }
  }
}

/// A value that is always structurally valid, plus whether it is a fallback.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Generated<T> {
  pub value: T,
  pub fallback_used: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub notice: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl<T> Generated<T> {
  pub fn fresh(value: T) -> Self {
    Self { value, fallback_used: false, notice: None, error: None }
  }

  pub fn degraded(value: T, cause: &CareerError) -> Self {
    let notice = if cause.is_upstream() {
      "AI service unavailable, showing default content"
    } else {
      "AI response could not be read, showing default content"
    };
    Self { value, fallback_used: true, notice: Some(notice.into()), error: Some(cause.to_string()) }
  }
}

/// Substitute `fallback` for any failure except cancellation.
pub fn with_fallback<T>(result: Result<T>, fallback: impl FnOnce() -> T) -> Result<Generated<T>> {
  match result {
    Ok(v) => Ok(Generated::fresh(v)),
    Err(CareerError::Cancelled) => Err(CareerError::Cancelled),
    Err(e) => {
      warn!(target: "generation", error = %e, "Using fallback payload");
      Ok(Generated::degraded(fallback(), &e))
    }
  }
}

async fn generate_once(
  generator: &dyn TextGenerator,
  prompt: &str,
  timeout: Duration,
  cancel: &CancelToken,
) -> Result<String> {
  if cancel.is_cancelled() {
    return Err(CareerError::Cancelled);
  }
  let start = Instant::now();
  tokio::select! {
    _ = cancel.cancelled() => {
      warn!(target: "generation", elapsed = ?start.elapsed(), "Generation cancelled by caller");
      Err(CareerError::Cancelled)
    }
    res = tokio::time::timeout(timeout, generator.generate(prompt)) => match res {
      Ok(Ok(text)) => {
        info!(target: "generation", elapsed = ?start.elapsed(), response_len = text.len(), "Model response received");
        Ok(text)
      }
      Ok(Err(e)) => {
        error!(target: "generation", elapsed = ?start.elapsed(), error = %e, "Model call failed");
        Err(e)
      }
      Err(_) => {
        error!(target: "generation", ?timeout, "Model call timed out");
        Err(CareerError::Timeout(timeout))
      }
    }
  }
}

/// Ask for JSON and parse it into `T`, re-asking on malformed output within the policy.
pub async fn generate_json<T: DeserializeOwned>(
  generator: &dyn TextGenerator,
  prompt: &str,
  policy: &GenerationPolicy,
  cancel: &CancelToken,
) -> Result<T> {
  generate_validated(generator, prompt, policy, cancel, Ok).await
}

/// `generate_json` plus a post-parse check; a rejected value counts as malformed
/// and uses up an attempt like a parse failure does.
#[instrument(level = "info", skip(generator, prompt, policy, cancel, validate), fields(prompt_len = prompt.len(), max_attempts = policy.max_attempts))]
pub async fn generate_validated<T, F>(
  generator: &dyn TextGenerator,
  prompt: &str,
  policy: &GenerationPolicy,
  cancel: &CancelToken,
  validate: F,
) -> Result<T>
where
  T: DeserializeOwned,
  F: Fn(T) -> Result<T>,
{
  let attempts = policy.max_attempts.max(1);
  let mut last_err = None;

  for attempt in 1..=attempts {
    let text = generate_once(generator, prompt, policy.timeout, cancel).await?;
    match sanitize_into::<T>(&text).and_then(&validate) {
      Ok(v) => return Ok(v),
      Err(e) => {
        warn!(
          target: "generation",
          attempt,
          error = %e,
          preview = %trunc_for_log(&text, 120),
          "Malformed model output"
        );
        last_err = Some(e);
      }
    }
  }

  Err(last_err.unwrap_or_else(|| CareerError::MalformedResponse("no attempts made".into())))
}

/// Plain-text call (advice, explanations): same deadline and cancellation, no parsing.
#[instrument(level = "info", skip(generator, prompt, policy, cancel), fields(prompt_len = prompt.len()))]
pub async fn generate_text(
  generator: &dyn TextGenerator,
  prompt: &str,
  policy: &GenerationPolicy,
  cancel: &CancelToken,
) -> Result<String> {
  let text = generate_once(generator, prompt, policy.timeout, cancel).await?;
  Ok(text.trim().to_string())
}
