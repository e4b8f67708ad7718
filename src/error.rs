//! Crate-wide error type.
//!
//! Generation failures split into "the collaborator failed" and "the collaborator
//! answered but we could not make sense of it"; callers treat them differently
//! (the first is surfaced, the second may be retried once).

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CareerError {
  #[error("Upstream generation failed: {0}")]
  UpstreamGeneration(String),

  #[error("Upstream generation timed out after {0:?}")]
  Timeout(Duration),

  #[error("Generation cancelled")]
  Cancelled,

  #[error("Malformed response: {0}")]
  MalformedResponse(String),

  #[error("Contract violation: {0}")]
  ContractViolation(String),

  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Store error: {0}")]
  Store(String),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),
}

impl CareerError {
  /// True for failures of the generative-text collaborator itself.
  pub fn is_upstream(&self) -> bool {
    matches!(self, CareerError::UpstreamGeneration(_) | CareerError::Timeout(_))
  }
}

pub type Result<T, E = CareerError> = std::result::Result<T, E>;
