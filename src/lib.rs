//! Career Progress · gamified learning progress engine
//!
//! - Points, levels, badges, achievements, streaks and goals from user activity
//! - AI-assisted assessment and roadmap generation behind a `TextGenerator` seam
//! - Tolerant JSON recovery for model output, with bounded retry and fallbacks
//! - Pluggable persistence (`ProgressStore`) with per-user serialized updates
//!
//! Important env variables:
//!   CAREER_CONFIG_PATH : path to TOML config (prompts, generation limits, catalog overrides)
//!   LOG_LEVEL          : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT         : "pretty" (default) or "json"

pub mod telemetry;
pub mod util;
pub mod error;
pub mod domain;
pub mod catalog;
pub mod config;
pub mod levels;
pub mod badges;
pub mod streak;
pub mod goals;
pub mod achievements;
pub mod progress;
pub mod challenges;
pub mod stats;
pub mod sanitize;
pub mod generation;
pub mod assessment;
pub mod store;
pub mod service;

pub use catalog::Catalog;
pub use config::{load_config_from_env, AppConfig};
pub use domain::{CareerRoadmap, ProgressUpdate, UserProgress};
pub use error::{CareerError, Result};
pub use generation::{cancel_pair, CancelHandle, CancelToken, Generated, GenerationPolicy, TextGenerator};
pub use progress::{apply, apply_at, initialize_user_progress, ProgressOutcome};
pub use service::ProgressService;
pub use store::{FileStore, MemoryStore, ProgressStore};
