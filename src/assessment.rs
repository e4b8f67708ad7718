//! Typed AI payloads (questions, assessment result, roadmap, resources, daily
//! engagement) and the helpers that build prompts, call the generator and
//! validate what comes back.
//!
//! Every public helper returns a `Generated<T>`: either the model's answer or a
//! fallback with the same shape. Only cancellation is reported as an error.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::{AppConfig, Prompts};
use crate::domain::{CareerRoadmap, Difficulty, Streak, UserProgress};
use crate::error::{CareerError, Result};
use crate::generation::{
  generate_text, generate_validated, with_fallback, CancelToken, Generated, GenerationPolicy, TextGenerator,
};
use crate::util::{fill_template, join_or_none};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
  pub selected_domain: String,
  #[serde(default)]
  pub skill_level: Difficulty,
  #[serde(default)]
  pub education_level: String,
  #[serde(default)]
  pub experience: String,
  #[serde(default)]
  pub interests: Vec<String>,
  #[serde(default)]
  pub goals: Vec<String>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
  MultipleChoice,
  Scale,
  OpenEnded,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestionDifficulty {
  Easy,
  #[default]
  Medium,
  Hard,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentQuestion {
  #[serde(default)]
  pub id: String,
  pub question: String,
  #[serde(rename = "type")]
  pub kind: QuestionType,
  #[serde(default)]
  pub options: Vec<String>,
  #[serde(default)]
  pub category: String,
  #[serde(default)]
  pub difficulty: QuestionDifficulty,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub explanation: Option<String>,
  #[serde(default)]
  pub skill_area: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
  #[serde(default)]
  pub total_score: f64,
  #[serde(default)]
  pub max_score: f64,
  #[serde(default)]
  pub percentage: f64,
  #[serde(default)]
  pub skill_breakdown: BTreeMap<String, f64>,
  #[serde(default)]
  pub recommended_level: String,
  #[serde(default)]
  pub strength_areas: Vec<String>,
  #[serde(default)]
  pub improvement_areas: Vec<String>,
  #[serde(default)]
  pub detailed_analysis: String,
}

impl AssessmentResult {
  /// Whole-number percentage suitable for `ProgressUpdate::AssessmentCompleted`.
  pub fn score(&self) -> u32 {
    self.percentage.round().clamp(0.0, 100.0) as u32
  }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
  Video,
  #[default]
  Article,
  Course,
  Tutorial,
  Book,
  Certification,
  Project,
  Practice,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PriceModel {
  #[default]
  Free,
  Paid,
  Freemium,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LearningResource {
  #[serde(default)]
  pub id: String,
  pub title: String,
  #[serde(default)]
  pub description: String,
  #[serde(rename = "type", default)]
  pub kind: ResourceKind,
  #[serde(default)]
  pub provider: String,
  #[serde(default)]
  pub url: String,
  #[serde(default)]
  pub duration: String,
  #[serde(default)]
  pub difficulty: Difficulty,
  #[serde(default)]
  pub skills: Vec<String>,
  /// 0..=5.
  #[serde(default)]
  pub rating: f64,
  #[serde(default)]
  pub price: PriceModel,
  /// 0..=100.
  #[serde(default)]
  pub relevance_score: f64,
  #[serde(default)]
  pub category: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyMotivation {
  #[serde(default)]
  pub quote: String,
  #[serde(default)]
  pub tip: String,
  #[serde(default)]
  pub challenge: String,
  #[serde(default)]
  pub goal_reminder: String,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
  Goal,
  Milestone,
  #[default]
  Practice,
  Review,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReminderFrequency {
  #[default]
  Daily,
  Weekly,
  Monthly,
}

fn default_true() -> bool {
  true
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
  #[serde(default)]
  pub id: String,
  #[serde(rename = "type", default)]
  pub kind: ReminderKind,
  #[serde(default)]
  pub title: String,
  pub message: String,
  /// Local time of day, "HH:MM".
  #[serde(default)]
  pub scheduled_time: String,
  #[serde(default)]
  pub frequency: ReminderFrequency,
  #[serde(default = "default_true")]
  pub is_active: bool,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
  Up,
  Down,
  #[default]
  Stable,
}

impl Trend {
  pub fn between(current: f64, previous: f64) -> Self {
    if current > previous {
      Trend::Up
    } else if current < previous {
      Trend::Down
    } else {
      Trend::Stable
    }
  }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressInsight {
  pub metric: String,
  #[serde(default)]
  pub current_value: f64,
  #[serde(default)]
  pub previous_value: f64,
  #[serde(default)]
  pub trend: Trend,
  #[serde(default)]
  pub insight: String,
}

/// Today's nudges for one learner. `streak` always mirrors the stored snapshot.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyEngagement {
  pub daily_motivation: DailyMotivation,
  #[serde(default)]
  pub reminders: Vec<Reminder>,
  #[serde(default)]
  pub progress_insights: Vec<ProgressInsight>,
  #[serde(default)]
  pub streak: Streak,
}

fn difficulty_label(d: Difficulty) -> &'static str {
  match d {
    Difficulty::Beginner => "beginner",
    Difficulty::Intermediate => "intermediate",
    Difficulty::Advanced => "advanced",
  }
}

// --- Validation (runs on every parsed answer; failures count as malformed) ---

/// Fill missing ids, drop unusable questions, reject an empty set.
pub fn normalize_questions(questions: Vec<AssessmentQuestion>) -> Result<Vec<AssessmentQuestion>> {
  let total = questions.len();
  let mut out = Vec::with_capacity(total);
  for (i, mut q) in questions.into_iter().enumerate() {
    if q.question.trim().is_empty() {
      continue;
    }
    if q.kind == QuestionType::MultipleChoice && q.options.len() < 2 {
      continue;
    }
    if q.id.trim().is_empty() {
      q.id = format!("q{}", i + 1);
    }
    out.push(q);
  }
  if out.len() < total {
    warn!(target: "generation", dropped = total - out.len(), "Dropped unusable questions");
  }
  if out.is_empty() {
    return Err(CareerError::MalformedResponse("no usable questions".into()));
  }
  Ok(out)
}

/// Derive a missing percentage from the totals and clamp scores to 0..=100.
pub fn normalize_result(mut r: AssessmentResult) -> Result<AssessmentResult> {
  if r.percentage <= 0.0 && r.max_score > 0.0 {
    r.percentage = r.total_score / r.max_score * 100.0;
  }
  if !r.percentage.is_finite() {
    return Err(CareerError::MalformedResponse("percentage is not a number".into()));
  }
  r.percentage = r.percentage.clamp(0.0, 100.0);
  for v in r.skill_breakdown.values_mut() {
    *v = v.clamp(0.0, 100.0);
  }
  Ok(r)
}

/// Stamp ids/order, pin the domain, and drop prerequisites that point nowhere.
pub fn normalize_roadmap(mut roadmap: CareerRoadmap, domain: &str) -> Result<CareerRoadmap> {
  if roadmap.stages.is_empty() {
    return Err(CareerError::MalformedResponse("roadmap has no stages".into()));
  }
  if roadmap.id.is_empty() {
    roadmap.id = Uuid::new_v4().to_string();
  }
  roadmap.domain = domain.to_string();

  let mut seen = HashSet::new();
  for (i, stage) in roadmap.stages.iter_mut().enumerate() {
    if stage.id.trim().is_empty() || seen.contains(&stage.id) {
      stage.id = format!("stage-{}", i + 1);
    }
    seen.insert(stage.id.clone());
    if stage.order == 0 {
      stage.order = i as u32 + 1;
    }
  }
  for stage in roadmap.stages.iter_mut() {
    let before = stage.prerequisites.len();
    let own_id = stage.id.clone();
    stage.prerequisites.retain(|p| seen.contains(p) && *p != own_id);
    if stage.prerequisites.len() < before {
      warn!(target: "generation", stage = %stage.id, "Dropped unknown prerequisites");
    }
  }
  roadmap.stages.sort_by_key(|s| s.order);
  roadmap.total_stages = roadmap.stages.len() as u32;
  Ok(roadmap)
}

pub const MAX_RESOURCES: usize = 12;
pub const DEFAULT_REMINDER_TIME: &str = "09:00";

/// Drop untitled entries, fill ids, clamp scores, most relevant first.
pub fn normalize_resources(resources: Vec<LearningResource>) -> Result<Vec<LearningResource>> {
  let total = resources.len();
  let mut seen = HashSet::new();
  let mut out = Vec::with_capacity(total);
  for (i, mut r) in resources.into_iter().enumerate() {
    if r.title.trim().is_empty() {
      continue;
    }
    if r.id.trim().is_empty() || seen.contains(&r.id) {
      r.id = format!("resource-{}", i + 1);
    }
    seen.insert(r.id.clone());
    r.rating = if r.rating.is_finite() { r.rating.clamp(0.0, 5.0) } else { 0.0 };
    r.relevance_score = if r.relevance_score.is_finite() { r.relevance_score.clamp(0.0, 100.0) } else { 0.0 };
    out.push(r);
  }
  if out.len() < total {
    warn!(target: "generation", dropped = total - out.len(), "Dropped untitled resources");
  }
  if out.is_empty() {
    return Err(CareerError::MalformedResponse("no usable resources".into()));
  }
  out.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
  out.truncate(MAX_RESOURCES);
  Ok(out)
}

/// Require some motivation, clean up reminders, recompute trends from the values.
pub fn normalize_engagement(mut e: DailyEngagement) -> Result<DailyEngagement> {
  let m = &e.daily_motivation;
  if m.quote.trim().is_empty() && m.tip.trim().is_empty() {
    return Err(CareerError::MalformedResponse("engagement has no motivation".into()));
  }

  e.reminders.retain(|r| !r.message.trim().is_empty());
  for (i, r) in e.reminders.iter_mut().enumerate() {
    if r.id.trim().is_empty() {
      r.id = format!("r{}", i + 1);
    }
    if NaiveTime::parse_from_str(&r.scheduled_time, "%H:%M").is_err() {
      r.scheduled_time = DEFAULT_REMINDER_TIME.into();
    }
  }

  e.progress_insights
    .retain(|p| !p.metric.trim().is_empty() && p.current_value.is_finite() && p.previous_value.is_finite());
  for p in e.progress_insights.iter_mut() {
    p.trend = Trend::between(p.current_value, p.previous_value);
  }
  Ok(e)
}

// --- Fallbacks (same shape as a successful answer) ---

pub fn fallback_questions(profile: &UserProfile) -> Vec<AssessmentQuestion> {
  vec![AssessmentQuestion {
    id: "q1".into(),
    question: format!("How confident are you in your core {} skills?", profile.selected_domain),
    kind: QuestionType::Scale,
    options: (1..=5).map(|n| n.to_string()).collect(),
    category: "Self Assessment".into(),
    difficulty: QuestionDifficulty::Easy,
    explanation: None,
    skill_area: profile.selected_domain.clone(),
  }]
}

pub fn fallback_result(profile: &UserProfile) -> AssessmentResult {
  AssessmentResult {
    total_score: 50.0,
    max_score: 100.0,
    percentage: 50.0,
    skill_breakdown: BTreeMap::new(),
    recommended_level: difficulty_label(profile.skill_level).into(),
    strength_areas: Vec::new(),
    improvement_areas: Vec::new(),
    detailed_analysis: "Detailed analysis is unavailable right now. Your roadmap starts from your self-reported level.".into(),
  }
}

pub fn fallback_roadmap(profile: &UserProfile) -> CareerRoadmap {
  CareerRoadmap {
    id: Uuid::new_v4().to_string(),
    domain: profile.selected_domain.clone(),
    title: format!("{} roadmap", profile.selected_domain),
    description: "A personalized roadmap could not be generated. Check back soon.".into(),
    ..Default::default()
  }
}

#[allow(clippy::too_many_arguments)]
fn resource(
  id: &str,
  title: String,
  description: String,
  kind: ResourceKind,
  provider: &str,
  url: &str,
  duration: &str,
  difficulty: Difficulty,
  skills: &[&str],
  rating: f64,
  relevance_score: f64,
  category: &str,
) -> LearningResource {
  LearningResource {
    id: id.into(),
    title,
    description,
    kind,
    provider: provider.into(),
    url: url.into(),
    duration: duration.into(),
    difficulty,
    skills: skills.iter().map(|s| s.to_string()).collect(),
    rating,
    price: PriceModel::Free,
    relevance_score,
    category: category.into(),
  }
}

pub fn fallback_resources(profile: &UserProfile) -> Vec<LearningResource> {
  let domain = &profile.selected_domain;
  vec![
    resource(
      "fallback-1",
      format!("{} Fundamentals Course", domain),
      format!("Comprehensive introduction to {} concepts and practices", domain),
      ResourceKind::Course,
      "FreeCodeCamp",
      "https://freecodecamp.org",
      "40 hours",
      Difficulty::Beginner,
      &["fundamentals", "basics"],
      4.5,
      90.0,
      "fundamentals",
    ),
    resource(
      "fallback-2",
      format!("Advanced {} Techniques", domain),
      format!("Deep dive into advanced {} methodologies", domain),
      ResourceKind::Tutorial,
      "YouTube",
      "https://youtube.com",
      "10 hours",
      Difficulty::Advanced,
      &["advanced techniques", "best practices"],
      4.3,
      85.0,
      "advanced",
    ),
  ]
}

/// Generic nudges around the learner's real streak.
pub fn fallback_engagement(progress: &UserProgress) -> DailyEngagement {
  let streak = f64::from(progress.streak.current_streak);
  DailyEngagement {
    daily_motivation: DailyMotivation {
      quote: "The only way to do great work is to love what you do. - Steve Jobs".into(),
      tip: "Spend 30 minutes today learning something new in your field".into(),
      challenge: "Complete one coding exercise or read one technical article".into(),
      goal_reminder: "Remember your goal to advance your career - every step counts!".into(),
    },
    reminders: vec![Reminder {
      id: "r1".into(),
      kind: ReminderKind::Practice,
      title: "Daily Practice".into(),
      message: "Time for your daily skill practice session!".into(),
      scheduled_time: DEFAULT_REMINDER_TIME.into(),
      frequency: ReminderFrequency::Daily,
      is_active: true,
    }],
    progress_insights: vec![ProgressInsight {
      metric: "Learning Streak".into(),
      current_value: streak,
      previous_value: 0.0,
      trend: Trend::between(streak, 0.0),
      insight: if streak > 0.0 {
        "Great start on your learning journey!".into()
      } else {
        "Start a streak today with one short session.".into()
      },
    }],
    streak: progress.streak.clone(),
  }
}

fn fallback_advice() -> String {
  "Focus on consistent daily practice, build one small project per stage, and revisit your weakest skill each week.".into()
}

fn render_answers(questions: &[AssessmentQuestion], answers: &BTreeMap<String, Value>) -> String {
  questions
    .iter()
    .enumerate()
    .map(|(i, q)| {
      let answer = match answers.get(&q.id) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "Not answered".into(),
      };
      format!("Question {} ({}): {}\nAnswer: {}\nSkill area: {}", i + 1, q.category, q.question, answer, q.skill_area)
    })
    .collect::<Vec<_>>()
    .join("\n\n")
}

/// Prompt-construction + generation helpers. Constructed once and shared.
#[derive(Clone)]
pub struct AssessmentAdvisor {
  generator: Arc<dyn TextGenerator>,
  prompts: Prompts,
  policy: GenerationPolicy,
  question_count: u32,
}

impl AssessmentAdvisor {
  pub fn new(generator: Arc<dyn TextGenerator>, cfg: &AppConfig) -> Self {
    Self {
      generator,
      prompts: cfg.prompts.clone(),
      policy: GenerationPolicy::from(&cfg.generation),
      question_count: cfg.generation.question_count,
    }
  }

  pub fn with_policy(mut self, policy: GenerationPolicy) -> Self {
    self.policy = policy;
    self
  }

  fn json_prompt(&self, body: String) -> String {
    format!("{}\n\n{}", self.prompts.json_system, body)
  }

  #[instrument(level = "info", skip(self, profile, cancel), fields(domain = %profile.selected_domain, count = self.question_count))]
  pub async fn generate_questions(
    &self,
    profile: &UserProfile,
    cancel: &CancelToken,
  ) -> Result<Generated<Vec<AssessmentQuestion>>> {
    let count = self.question_count.to_string();
    let prompt = self.json_prompt(fill_template(
      &self.prompts.questions_template,
      &[
        ("count", count.as_str()),
        ("domain", profile.selected_domain.as_str()),
        ("skill_level", difficulty_label(profile.skill_level)),
        ("education", profile.education_level.as_str()),
        ("experience", profile.experience.as_str()),
        ("interests", join_or_none(&profile.interests).as_str()),
        ("goals", join_or_none(&profile.goals).as_str()),
      ],
    ));

    let result = generate_validated(self.generator.as_ref(), &prompt, &self.policy, cancel, normalize_questions).await;
    let out = with_fallback(result, || fallback_questions(profile))?;
    info!(target: "generation", questions = out.value.len(), fallback = out.fallback_used, "Assessment questions ready");
    Ok(out)
  }

  #[instrument(level = "info", skip(self, profile, questions, answers, cancel), fields(domain = %profile.selected_domain, questions = questions.len(), answers = answers.len()))]
  pub async fn analyze_results(
    &self,
    profile: &UserProfile,
    questions: &[AssessmentQuestion],
    answers: &BTreeMap<String, Value>,
    cancel: &CancelToken,
  ) -> Result<Generated<AssessmentResult>> {
    let rendered = render_answers(questions, answers);
    let prompt = self.json_prompt(fill_template(
      &self.prompts.analysis_template,
      &[
        ("domain", profile.selected_domain.as_str()),
        ("skill_level", difficulty_label(profile.skill_level)),
        ("education", profile.education_level.as_str()),
        ("experience", profile.experience.as_str()),
        ("answers", rendered.as_str()),
      ],
    ));

    let result = generate_validated(self.generator.as_ref(), &prompt, &self.policy, cancel, normalize_result).await;
    let out = with_fallback(result, || fallback_result(profile))?;
    info!(target: "generation", percentage = out.value.percentage, fallback = out.fallback_used, "Assessment analyzed");
    Ok(out)
  }

  #[instrument(level = "info", skip(self, profile, assessment, cancel), fields(domain = %profile.selected_domain))]
  pub async fn generate_roadmap(
    &self,
    profile: &UserProfile,
    assessment: &AssessmentResult,
    cancel: &CancelToken,
  ) -> Result<Generated<CareerRoadmap>> {
    let level = if assessment.recommended_level.is_empty() {
      difficulty_label(profile.skill_level).to_string()
    } else {
      assessment.recommended_level.clone()
    };
    let percentage = format!("{:.0}", assessment.percentage);
    let prompt = self.json_prompt(fill_template(
      &self.prompts.roadmap_template,
      &[
        ("domain", profile.selected_domain.as_str()),
        ("level", level.as_str()),
        ("goals", join_or_none(&profile.goals).as_str()),
        ("percentage", percentage.as_str()),
        ("strengths", join_or_none(&assessment.strength_areas).as_str()),
        ("improvements", join_or_none(&assessment.improvement_areas).as_str()),
      ],
    ));

    let domain = profile.selected_domain.clone();
    let result = generate_validated(self.generator.as_ref(), &prompt, &self.policy, cancel, move |r| {
      normalize_roadmap(r, &domain)
    })
    .await;
    let out = with_fallback(result, || fallback_roadmap(profile))?;
    info!(target: "generation", stages = out.value.stages.len(), fallback = out.fallback_used, "Roadmap ready");
    Ok(out)
  }

  /// Learning resources for the learner's gaps; `skills` narrows the focus.
  #[instrument(level = "info", skip(self, profile, assessment, skills, cancel), fields(domain = %profile.selected_domain))]
  pub async fn recommend_resources(
    &self,
    profile: &UserProfile,
    assessment: &AssessmentResult,
    skills: Option<&[String]>,
    cancel: &CancelToken,
  ) -> Result<Generated<Vec<LearningResource>>> {
    let percentage = format!("{:.0}", assessment.percentage);
    let focus = match skills {
      Some(list) if !list.is_empty() => format!("Focus on these skills: {}", list.join(", ")),
      _ => String::new(),
    };
    let prompt = self.json_prompt(fill_template(
      &self.prompts.resources_template,
      &[
        ("domain", profile.selected_domain.as_str()),
        ("skill_level", difficulty_label(profile.skill_level)),
        ("experience", profile.experience.as_str()),
        ("interests", join_or_none(&profile.interests).as_str()),
        ("goals", join_or_none(&profile.goals).as_str()),
        ("percentage", percentage.as_str()),
        ("strengths", join_or_none(&assessment.strength_areas).as_str()),
        ("improvements", join_or_none(&assessment.improvement_areas).as_str()),
        ("focus", focus.as_str()),
      ],
    ));

    let result = generate_validated(self.generator.as_ref(), &prompt, &self.policy, cancel, normalize_resources).await;
    let out = with_fallback(result, || fallback_resources(profile))?;
    info!(target: "generation", resources = out.value.len(), fallback = out.fallback_used, "Resources ready");
    Ok(out)
  }

  /// Motivation, reminders and insights for today. The streak comes from `progress`, never the model.
  #[instrument(level = "info", skip(self, profile, progress, cancel), fields(domain = %profile.selected_domain, streak = progress.streak.current_streak))]
  pub async fn daily_engagement(
    &self,
    profile: &UserProfile,
    progress: &UserProgress,
    cancel: &CancelToken,
  ) -> Result<Generated<DailyEngagement>> {
    let level = progress.current_level.level.to_string();
    let points = progress.total_points.to_string();
    let streak = progress.streak.current_streak.to_string();
    let longest = progress.streak.longest_streak.to_string();
    let completed = progress.completed_stages.len().to_string();
    let weekly = format!("{}/{}", progress.weekly_goals.current, progress.weekly_goals.target);
    let prompt = self.json_prompt(fill_template(
      &self.prompts.engagement_template,
      &[
        ("domain", profile.selected_domain.as_str()),
        ("skill_level", difficulty_label(profile.skill_level)),
        ("goals", join_or_none(&profile.goals).as_str()),
        ("level", level.as_str()),
        ("level_title", progress.current_level.title.as_str()),
        ("points", points.as_str()),
        ("streak", streak.as_str()),
        ("longest_streak", longest.as_str()),
        ("completed", completed.as_str()),
        ("weekly", weekly.as_str()),
      ],
    ));

    let actual = progress.streak.clone();
    let result = generate_validated(self.generator.as_ref(), &prompt, &self.policy, cancel, move |e| {
      normalize_engagement(e).map(|mut e| {
        e.streak = actual.clone();
        e
      })
    })
    .await;
    let out = with_fallback(result, || fallback_engagement(progress))?;
    info!(
      target: "generation",
      reminders = out.value.reminders.len(),
      insights = out.value.progress_insights.len(),
      fallback = out.fallback_used,
      "Daily engagement ready"
    );
    Ok(out)
  }

  /// Free-text coaching advice; never parsed as JSON.
  #[instrument(level = "info", skip(self, profile, assessment, question, cancel), fields(domain = %profile.selected_domain, has_question = question.is_some()))]
  pub async fn personalized_advice(
    &self,
    profile: &UserProfile,
    assessment: &AssessmentResult,
    question: Option<&str>,
    cancel: &CancelToken,
  ) -> Result<Generated<String>> {
    let percentage = format!("{:.0}", assessment.percentage);
    let question = question.map(|q| format!("Specific question: {}", q)).unwrap_or_default();
    let prompt = fill_template(
      &self.prompts.advice_template,
      &[
        ("domain", profile.selected_domain.as_str()),
        ("percentage", percentage.as_str()),
        ("strengths", join_or_none(&assessment.strength_areas).as_str()),
        ("improvements", join_or_none(&assessment.improvement_areas).as_str()),
        ("question", question.as_str()),
      ],
    );

    let result = match generate_text(self.generator.as_ref(), &prompt, &self.policy, cancel).await {
      Ok(t) if t.is_empty() => Err(CareerError::MalformedResponse("empty advice".into())),
      other => other,
    };
    with_fallback(result, fallback_advice)
  }
}
