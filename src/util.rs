//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// This is intentionally simple (no nested/conditional logic).
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Log-safe truncation for large strings.
/// Cuts on a char boundary so multi-byte text (emoji icons) never panics.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) { cut -= 1; }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}

/// Lowercase, hyphen-separated slug ("Data Analysis" -> "data-analysis").
pub fn slugify(s: &str) -> String {
  s.split_whitespace()
    .map(|w| w.to_lowercase())
    .collect::<Vec<_>>()
    .join("-")
}

/// Join a list for prompt interpolation, with a placeholder for empty lists.
pub fn join_or_none(items: &[String]) -> String {
  if items.is_empty() { "none".into() } else { items.join(", ") }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fill_template_replaces_every_occurrence() {
    let out = fill_template("{a} and {a} then {b}", &[("a", "x"), ("b", "y")]);
    assert_eq!(out, "x and x then y");
  }

  #[test]
  fn trunc_respects_char_boundaries() {
    let s = "🔥🔥🔥";
    let out = trunc_for_log(s, 5);
    assert!(out.starts_with("🔥"));
    assert!(out.ends_with("(12 bytes total)"));
  }

  #[test]
  fn slugify_collapses_whitespace() {
    assert_eq!(slugify("  Data   Analysis "), "data-analysis");
  }
}
