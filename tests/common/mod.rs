//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use career_progress::catalog::Catalog;
use career_progress::error::{CareerError, Result};
use career_progress::generation::TextGenerator;
use career_progress::domain::{CareerRoadmap, Difficulty, RoadmapStage, UserProgress};
use career_progress::progress::initialize_user_progress;

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

pub fn stage(id: &str, order: u32, points: u32, difficulty: Difficulty, skills: &[&str], prereqs: &[&str]) -> RoadmapStage {
    RoadmapStage {
        id: id.into(),
        title: format!("Stage {}", id),
        description: format!("Work through {}", id),
        category: "core".into(),
        difficulty,
        estimated_time: "2 hours".into(),
        points,
        prerequisites: prereqs.iter().map(|s| s.to_string()).collect(),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        order,
    }
}

/// Four stages: two beginner, one intermediate, one advanced gated on the first two.
pub fn roadmap() -> CareerRoadmap {
    CareerRoadmap {
        id: "rm-1".into(),
        domain: "Data Science".into(),
        title: "Data Science roadmap".into(),
        total_stages: 4,
        stages: vec![
            stage("basics", 1, 100, Difficulty::Beginner, &["Python"], &[]),
            stage("stats", 2, 100, Difficulty::Beginner, &["Statistics"], &[]),
            stage("ml", 3, 100, Difficulty::Intermediate, &["Python", "Machine Learning"], &["basics", "stats"]),
            stage("deep", 4, 150, Difficulty::Advanced, &["Deep Learning"], &["ml"]),
        ],
        ..Default::default()
    }
}

pub fn fresh(now: DateTime<Utc>) -> UserProgress {
    initialize_user_progress("Data Science", &Catalog::default(), now)
}

/// Replays canned answers in order; records prompts.
pub struct Scripted {
    replies: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl Scripted {
    pub fn new(replies: Vec<Result<String>>) -> Self {
        Self { replies: Mutex::new(replies.into()), prompts: Mutex::new(Vec::new()), calls: AtomicUsize::new(0) }
    }

    pub fn answering(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for Scripted {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CareerError::UpstreamGeneration("script exhausted".into())))
    }
}
