//! Tests for [`career_progress::generation`] using scripted generators.

mod common;

use std::time::Duration;

use async_trait::async_trait;
use career_progress::error::{CareerError, Result};
use career_progress::generation::{
    cancel_pair, generate_json, generate_text, with_fallback, CancelToken, GenerationPolicy, TextGenerator,
};
use common::Scripted;
use serde_json::{json, Value};

/// Never answers.
struct Stalled;

#[async_trait]
impl TextGenerator for Stalled {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        std::future::pending::<Result<String>>().await
    }
}

fn policy() -> GenerationPolicy {
    GenerationPolicy { timeout: Duration::from_millis(200), max_attempts: 2 }
}

#[tokio::test]
async fn test_valid_answer_first_try() {
    let gen = Scripted::new(vec![Ok("```json\n{\"ok\": true,}\n```".into())]);
    let v: Value = generate_json(&gen, "p", &policy(), &CancelToken::never()).await.unwrap();
    assert_eq!(v, json!({"ok": true}));
    assert_eq!(gen.calls(), 1);
}

/// One malformed answer is re-requested once.
#[tokio::test]
async fn test_malformed_answer_retried_once() {
    let gen = Scripted::new(vec![Ok("sorry, no JSON today".into()), Ok("{\"ok\": 1}".into())]);
    let v: Value = generate_json(&gen, "p", &policy(), &CancelToken::never()).await.unwrap();
    assert_eq!(v, json!({"ok": 1}));
    assert_eq!(gen.calls(), 2);
}

#[tokio::test]
async fn test_malformed_twice_gives_up() {
    let gen = Scripted::new(vec![Ok("nope".into()), Ok("still nope".into()), Ok("{}".into())]);
    let err = generate_json::<Value>(&gen, "p", &policy(), &CancelToken::never()).await.unwrap_err();
    assert!(matches!(err, CareerError::MalformedResponse(_)));
    assert_eq!(gen.calls(), 2);
}

#[tokio::test]
async fn test_upstream_failure_not_retried() {
    let gen = Scripted::new(vec![Err(CareerError::UpstreamGeneration("503".into())), Ok("{}".into())]);
    let err = generate_json::<Value>(&gen, "p", &policy(), &CancelToken::never()).await.unwrap_err();
    assert!(err.is_upstream());
    assert_eq!(gen.calls(), 1);
}

#[tokio::test]
async fn test_timeout() {
    let err = generate_json::<Value>(&Stalled, "p", &policy(), &CancelToken::never()).await.unwrap_err();
    assert!(matches!(err, CareerError::Timeout(_)));
    assert!(err.is_upstream());
}

#[tokio::test]
async fn test_cancel_interrupts_call() {
    let (handle, token) = cancel_pair();
    let long = GenerationPolicy { timeout: Duration::from_secs(30), max_attempts: 2 };
    let task = tokio::spawn(async move { generate_json::<Value>(&Stalled, "p", &long, &token).await });
    tokio::time::sleep(Duration::from_millis(20)).await;
    handle.cancel();
    let err = task.await.unwrap().unwrap_err();
    assert!(matches!(err, CareerError::Cancelled));
}

#[tokio::test]
async fn test_already_cancelled_skips_call() {
    let gen = Scripted::new(vec![Ok("{}".into())]);
    let (handle, token) = cancel_pair();
    handle.cancel();
    let err = generate_json::<Value>(&gen, "p", &policy(), &token).await.unwrap_err();
    assert!(matches!(err, CareerError::Cancelled));
    assert_eq!(gen.calls(), 0);
}

#[tokio::test]
async fn test_generate_text_trims() {
    let gen = Scripted::new(vec![Ok("  keep going  \n".into())]);
    let text = generate_text(&gen, "p", &policy(), &CancelToken::never()).await.unwrap();
    assert_eq!(text, "keep going");
}

#[test]
fn test_with_fallback_marks_degraded() {
    let failed: Result<u32> = Err(CareerError::UpstreamGeneration("down".into()));
    let out = with_fallback(failed, || 7).unwrap();
    assert_eq!(out.value, 7);
    assert!(out.fallback_used);
    assert!(out.notice.is_some());
    assert!(out.error.unwrap().contains("down"));

    let ok = with_fallback(Ok(3u32), || 7).unwrap();
    assert!(!ok.fallback_used);
    assert_eq!(ok.value, 3);

    let cancelled: Result<u32> = Err(CareerError::Cancelled);
    assert!(matches!(with_fallback(cancelled, || 7), Err(CareerError::Cancelled)));
}
