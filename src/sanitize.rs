//! Repairs loosely formatted model output into JSON.
//!
//! Bounded effort: a handful of textual fixes, then one parse. If that parse
//! fails the caller should re-ask the model (see `generation`) instead of
//! piling on more heuristics here.

use std::sync::OnceLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{CareerError, Result};
use crate::util::trunc_for_log;

fn fence_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"```[A-Za-z0-9_-]*[ \t]*\r?\n?([\s\S]*?)\s*```").expect("valid regex"))
}

/// Content of the first fenced block. An unterminated fence yields everything after it.
fn extract_fenced(s: &str) -> Option<&str> {
  if let Some(caps) = fence_re().captures(s) {
    return caps.get(1).map(|m| m.as_str());
  }
  let start = s.find("```")?;
  let rest = &s[start + 3..];
  let body_start = rest.find('\n').map(|i| i + 1).unwrap_or(0);
  Some(&rest[body_start..])
}

/// From the first `{` or `[` (whichever comes first) to the last matching closer.
fn locate_span(s: &str) -> Option<&str> {
  let open = s.find(|c| c == '{' || c == '[')?;
  let closer = if s[open..].starts_with('{') { '}' } else { ']' };
  let close = s.rfind(closer)?;
  if close < open {
    return None;
  }
  Some(&s[open..=close])
}

/// Index of the next char after any whitespace and comments starting at `i`.
fn skip_trivia(chars: &[char], mut i: usize) -> usize {
  loop {
    match (chars.get(i), chars.get(i + 1)) {
      (Some(c), _) if c.is_whitespace() => i += 1,
      (Some('/'), Some('/')) => {
        while i < chars.len() && chars[i] != '\n' { i += 1; }
      }
      (Some('/'), Some('*')) => {
        i += 2;
        while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) { i += 1; }
        i = (i + 2).min(chars.len());
      }
      _ => return i,
    }
  }
}

/// Copy a double-quoted literal untouched. Returns the index after its closing quote.
fn copy_string(chars: &[char], start: usize, out: &mut String) -> usize {
  out.push('"');
  let mut i = start + 1;
  while i < chars.len() {
    let c = chars[i];
    out.push(c);
    match c {
      '\\' if i + 1 < chars.len() => {
        out.push(chars[i + 1]);
        i += 2;
      }
      '"' => return i + 1,
      _ => i += 1,
    }
  }
  i
}

/// Rewrite a single-quoted literal as a double-quoted one.
fn convert_single_quoted(chars: &[char], start: usize, out: &mut String) -> usize {
  out.push('"');
  let mut i = start + 1;
  while i < chars.len() {
    match chars[i] {
      '\\' if i + 1 < chars.len() => {
        if chars[i + 1] != '\'' {
          out.push('\\');
        }
        out.push(chars[i + 1]);
        i += 2;
      }
      '\'' => {
        out.push('"');
        return i + 1;
      }
      '"' => {
        out.push_str("\\\"");
        i += 1;
      }
      c => {
        out.push(c);
        i += 1;
      }
    }
  }
  out.push('"');
  i
}

fn is_ident_start(c: char) -> bool {
  c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
  c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// One left-to-right pass that only edits text outside string literals:
/// comments and trailing commas go, single quotes become double quotes and
/// bare object keys get quoted.
fn repair(span: &str) -> String {
  let chars: Vec<char> = span.chars().collect();
  let mut out = String::with_capacity(span.len() + 16);
  let mut i = 0;

  while i < chars.len() {
    let c = chars[i];
    match c {
      '"' => i = copy_string(&chars, i, &mut out),
      '\'' => i = convert_single_quoted(&chars, i, &mut out),
      '/' if matches!(chars.get(i + 1), Some('/') | Some('*')) => i = skip_trivia(&chars, i),
      ',' => {
        let next = skip_trivia(&chars, i + 1);
        if !matches!(chars.get(next), Some('}') | Some(']')) {
          out.push(',');
        }
        i += 1;
      }
      c if is_ident_start(c) && out.trim_end().ends_with(|p| p == '{' || p == ',') => {
        let mut end = i;
        while end < chars.len() && is_ident_char(chars[end]) { end += 1; }
        let ident: String = chars[i..end].iter().collect();
        if chars.get(skip_trivia(&chars, end)) == Some(&':') {
          out.push('"');
          out.push_str(&ident);
          out.push('"');
        } else {
          out.push_str(&ident);
        }
        i = end;
      }
      _ => {
        out.push(c);
        i += 1;
      }
    }
  }
  out.trim().to_string()
}

/// Coerce raw model text into a JSON value.
pub fn sanitize(raw: &str) -> Result<Value> {
  let trimmed = raw.trim();

  // Already valid: leave it alone.
  if let Ok(v) = serde_json::from_str::<Value>(trimmed) {
    return Ok(v);
  }

  let body = extract_fenced(trimmed).unwrap_or(trimmed);
  let span = locate_span(body).ok_or_else(|| {
    CareerError::MalformedResponse(format!("no JSON object or array in: {}", trunc_for_log(trimmed, 80)))
  })?;

  let cleaned = repair(span);
  debug!(target: "generation", raw_len = raw.len(), cleaned_len = cleaned.len(), "Sanitized model output");
  serde_json::from_str::<Value>(&cleaned)
    .map_err(|e| CareerError::MalformedResponse(format!("still invalid after cleanup: {}", e)))
}

/// `sanitize`, then deserialize into `T`. A shape mismatch is also malformed.
pub fn sanitize_into<T: DeserializeOwned>(raw: &str) -> Result<T> {
  let value = sanitize(raw)?;
  serde_json::from_value(value)
    .map_err(|e| CareerError::MalformedResponse(format!("unexpected shape: {}", e)))
}
