//! Path segment conventions.
//!
//! File names use brackets (`[id]`, `[...rest]`, `[[lang]]`) or braces
//! (`{id}`, `{...rest}`, `{{lang}}`). Both normalize to the brace form,
//! which is what [`RouteMeta`](super::RouteMeta) stores. The route module
//! and the runtime use URL-pattern tokens instead: `:id`, `*` and `:lang?`.

use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static ORDER_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)[-_.](.+)$").expect("order prefix regex should be valid")
});

static OPTIONAL_BRACKETS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\[([^\[\]]+)\]\]").expect("optional brackets regex should be valid")
});
static CATCH_ALL_BRACKETS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\.\.\.([^\[\]]+)\]").expect("catch all brackets regex should be valid")
});
static DYNAMIC_BRACKETS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\[\]]+)\]").expect("dynamic brackets regex should be valid")
});

static OPTIONAL_BRACES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{([^{}]+)\}\}").expect("optional braces regex should be valid")
});
static CATCH_ALL_BRACES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\.\.\.([^{}]+)\}").expect("catch all braces regex should be valid")
});
static DYNAMIC_BRACES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([^{}]+)\}").expect("dynamic braces regex should be valid")
});

/// Split an explicit ordering prefix (`01-`, `2_`, `10.`) off a name.
///
/// ```rust
/// use clientgen::routes::strip_order_prefix;
///
/// assert_eq!(strip_order_prefix("02-settings"), (Some(2), "settings"));
/// assert_eq!(strip_order_prefix("settings"), (None, "settings"));
/// ```
pub fn strip_order_prefix(name: &str) -> (Option<u32>, &str) {
    match ORDER_PREFIX.captures(name) {
        Some(caps) => match (caps.get(1), caps.get(2)) {
            (Some(order), Some(rest)) => match order.as_str().parse() {
                Ok(order) => (Some(order), rest.as_str()),
                Err(_) => (None, name),
            },
            _ => (None, name),
        },
        None => (None, name),
    }
}

/// Rewrite bracket conventions into the normalized brace form.
pub fn normalize_segment(name: &str) -> String {
    let name = OPTIONAL_BRACKETS.replace_all(name, "{{$1}}");
    let name = CATCH_ALL_BRACKETS.replace_all(&name, "{...$1}");
    DYNAMIC_BRACKETS.replace_all(&name, "{$1}").into_owned()
}

/// Rewrite a normalized segment into URL-pattern tokens.
pub fn to_url_pattern(segment: &str) -> String {
    let segment = OPTIONAL_BRACES.replace_all(segment, ":$1?");
    let segment = CATCH_ALL_BRACES.replace_all(&segment, "*");
    DYNAMIC_BRACES.replace_all(&segment, ":$1").into_owned()
}

/// Append a URL-pattern segment to a parent pattern.
///
/// An empty segment (index route) keeps the parent pattern.
pub fn join_pattern(parent: &str, segment: &str) -> String {
    let parent = parent.trim_end_matches('/');
    if segment.is_empty() {
        if parent.is_empty() {
            "/".to_string()
        } else {
            parent.to_string()
        }
    } else {
        format!("{parent}/{segment}")
    }
}

/// How a route parameter is captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParamKind {
    #[serde(rename = "req")]
    Required,
    #[serde(rename = "opt")]
    Optional,
    #[serde(rename = "*")]
    Wildcard,
}

/// Parameters declared by a URL pattern, in order.
///
/// The catch-all parameter is named `*`.
pub fn pattern_params(pattern: &str) -> Vec<(String, ParamKind)> {
    pattern
        .split('/')
        .filter_map(|segment| {
            if segment == "*" {
                Some(("*".to_string(), ParamKind::Wildcard))
            } else if let Some(name) = segment.strip_prefix(':') {
                match name.strip_suffix('?') {
                    Some(name) => Some((name.to_string(), ParamKind::Optional)),
                    None => Some((name.to_string(), ParamKind::Required)),
                }
            } else {
                None
            }
        })
        .collect()
}

/// Compile a URL pattern (`/blog/:slug`) into an anchored regex and the
/// ordered parameter names.
///
/// Optional parameters and the catch-all may be absent from a matching
/// path; their capture groups are then empty.
pub fn pattern_to_regex(pattern: &str) -> anyhow::Result<(Regex, Vec<String>)> {
    let segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return Ok((Regex::new(r"^/$")?, Vec::new()));
    }

    let mut regex = String::with_capacity(pattern.len() + 16);
    regex.push('^');
    let mut param_names = Vec::new();

    for segment in segments {
        if segment == "*" {
            regex.push_str("(?:/(.*))?");
            param_names.push("*".to_string());
        } else if let Some(name) = segment.strip_prefix(':') {
            match name.strip_suffix('?') {
                Some(name) => {
                    regex.push_str("(?:/([^/]+))?");
                    param_names.push(name.to_string());
                }
                None => {
                    regex.push_str("/([^/]+)");
                    param_names.push(name.to_string());
                }
            }
        } else {
            regex.push('/');
            regex.push_str(&regex::escape(segment));
        }
    }

    regex.push('$');
    let compiled = Regex::new(&regex)
        .with_context(|| format!("Failed to compile route pattern `{pattern}`"))?;
    Ok((compiled, param_names))
}
