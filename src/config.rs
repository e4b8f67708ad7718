//! Loading configuration (prompts, generation limits, catalog overrides) from TOML.
//!
//! See `AppConfig` and `Prompts` for expected schema. Every section is optional.

use serde::Deserialize;
use tracing::{error, info};

use crate::catalog::Catalog;
use crate::error::{CareerError, Result};

/// Top-level `levels`, `badges` and `achievements` tables land in `catalog`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AppConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub generation: GenerationCfg,
  #[serde(flatten)]
  pub catalog: Catalog,
}

impl AppConfig {
  /// Parse and validate. Catalog problems surface as `Config` errors.
  pub fn from_toml_str(s: &str) -> Result<Self> {
    let cfg: AppConfig = toml::from_str(s).map_err(|e| CareerError::Config(e.to_string()))?;
    cfg.catalog.validate().map_err(|e| CareerError::Config(e.to_string()))?;
    Ok(cfg)
  }
}

/// Limits applied to every generative-text call.
#[derive(Clone, Debug, Deserialize)]
pub struct GenerationCfg {
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
  /// Total tries when the answer is malformed (2 = one retry).
  #[serde(default = "default_max_attempts")]
  pub max_attempts: u32,
  #[serde(default = "default_question_count")]
  pub question_count: u32,
}

fn default_timeout_secs() -> u64 { 30 }
fn default_max_attempts() -> u32 { 2 }
fn default_question_count() -> u32 { 10 }

impl Default for GenerationCfg {
  fn default() -> Self {
    Self {
      timeout_secs: default_timeout_secs(),
      max_attempts: default_max_attempts(),
      question_count: default_question_count(),
    }
  }
}

/// Prompt templates. `{key}` placeholders are filled by `util::fill_template`.
/// Override them in TOML to tune tone/structure.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  /// Prepended to every JSON-producing prompt.
  pub json_system: String,
  pub questions_template: String,
  pub analysis_template: String,
  pub roadmap_template: String,
  pub advice_template: String,
  pub resources_template: String,
  pub engagement_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      json_system: "Return ONLY valid JSON: no comments, no explanations, no trailing commas, double quotes for all strings.".into(),
      questions_template: "You are an expert career assessment designer. Generate {count} assessment questions for this profile.\nDomain: {domain}\nSkill level: {skill_level}\nEducation: {education}\nExperience: {experience}\nInterests: {interests}\nGoals: {goals}\n\nMix question types: about 60% multiple-choice (4 options), 25% scale (1-5), 15% open-ended. Cover technical skills, problem solving, communication, leadership, industry knowledge and motivation.\nReturn a JSON array of objects with fields: id, question, type (\"multiple-choice\" | \"scale\" | \"open-ended\"), options, category, difficulty (\"easy\" | \"medium\" | \"hard\"), explanation, skillArea.".into(),
      analysis_template: "You are an expert career analyst. Analyze these assessment answers.\nDomain: {domain}\nSkill level: {skill_level}\nEducation: {education}\nExperience: {experience}\n\n{answers}\n\nReturn a JSON object with fields: totalScore, maxScore, percentage (0-100), skillBreakdown (object of category -> 0-100), recommendedLevel, strengthAreas, improvementAreas, detailedAnalysis.".into(),
      roadmap_template: "You are an expert career strategist. Create a gamified learning roadmap.\nDomain: {domain}\nCurrent level: {level}\nGoals: {goals}\nAssessment score: {percentage}%\nStrengths: {strengths}\nAreas for improvement: {improvements}\n\nReturn a JSON object with fields: title, description, estimatedDuration, skills, careerPaths, stages. Provide 8-12 stages; each stage has id, title, description, category, difficulty (\"beginner\" | \"intermediate\" | \"advanced\"), estimatedTime, points (50-300), prerequisites (stage ids), skills, order.".into(),
      advice_template: "You are an AI career coach. Domain: {domain}. Assessment score: {percentage}%. Strengths: {strengths}. Areas for improvement: {improvements}.\n{question}\nGive encouraging, actionable advice in 2-3 short paragraphs.".into(),
      resources_template: "You are an expert learning curator. Recommend 8-12 learning resources.\nDomain: {domain}\nSkill level: {skill_level}\nExperience: {experience}\nInterests: {interests}\nGoals: {goals}\nAssessment score: {percentage}%\nStrengths: {strengths}\nAreas for improvement: {improvements}\n{focus}\n\nMix free and paid options and prioritize the improvement areas.\nReturn a JSON array of objects with fields: id, title, description, type (\"video\" | \"article\" | \"course\" | \"tutorial\" | \"book\" | \"certification\" | \"project\" | \"practice\"), provider, url, duration, difficulty (\"beginner\" | \"intermediate\" | \"advanced\"), skills, rating (0-5), price (\"free\" | \"paid\" | \"freemium\"), relevanceScore (0-100), category.".into(),
      engagement_template: "You are a motivating learning coach. Prepare today's engagement for this learner.\nDomain: {domain}\nSkill level: {skill_level}\nGoals: {goals}\nLevel: {level} ({level_title})\nTotal points: {points}\nCurrent streak: {streak} days (longest {longest_streak})\nStages completed: {completed}\nWeekly goal: {weekly}\n\nReturn a JSON object with fields: dailyMotivation (quote, tip, challenge, goalReminder), reminders (id, type (\"goal\" | \"milestone\" | \"practice\" | \"review\"), title, message, scheduledTime (\"HH:MM\"), frequency (\"daily\" | \"weekly\" | \"monthly\"), isActive), progressInsights (metric, currentValue, previousValue, trend (\"up\" | \"down\" | \"stable\"), insight).".into(),
    }
  }
}

/// Attempt to load `AppConfig` from CAREER_CONFIG_PATH. On any IO/parse/validation error, returns None.
pub fn load_config_from_env() -> Option<AppConfig> {
  let path = std::env::var("CAREER_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match AppConfig::from_toml_str(&s) {
      Ok(cfg) => {
        info!(target: "career_progress", %path, "Loaded config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "career_progress", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "career_progress", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
