//! Expansion of mock templates into representative instances.
//!
//! Templates annotate keys with generation rules (`"list|1-10"`, `"id|+1"`, `"ok|1"`) and
//! use `@placeholder` strings as value generators. Expansion strips the rules and replaces
//! placeholders with a sample of the type they generate, so the result can be fed to the
//! same induction as a raw JSON example.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

static RULE_KEY: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(?P<name>[^|]+)\|(?P<rule>.+)$").ok());

static PLACEHOLDER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^@(?P<name>[A-Za-z_]+)").ok());

/// Expand a parsed template into an instance.
pub fn expand_template(template: &Value) -> Value {
    expand(template, None)
}

fn expand(value: &Value, rule: Option<&str>) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, v) in map {
                let (name, rule) = split_rule(key);
                out.insert(name.to_string(), expand(v, rule));
            }
            Value::Object(out)
        }
        Value::Array(items) => match rule {
            // `|1` and `|+1` pick a single element out of the array.
            Some("1" | "+1") => items.first().map_or(Value::Null, |item| expand(item, None)),
            _ => Value::Array(items.iter().map(|item| expand(item, None)).collect()),
        },
        Value::String(s) => expand_placeholder(s),
        other => other.clone(),
    }
}

fn split_rule(key: &str) -> (&str, Option<&str>) {
    let captures = RULE_KEY.as_ref().and_then(|re| re.captures(key));
    match captures {
        Some(caps) => match (caps.name("name"), caps.name("rule")) {
            (Some(name), Some(rule)) => (name.as_str().trim(), Some(rule.as_str().trim())),
            _ => (key, None),
        },
        None => (key, None),
    }
}

fn expand_placeholder(s: &str) -> Value {
    let name = PLACEHOLDER
        .as_ref()
        .and_then(|re| re.captures(s.trim()))
        .and_then(|caps| caps.name("name"))
        .map(|m| m.as_str().to_ascii_lowercase());

    match name.as_deref() {
        Some("integer" | "int" | "natural" | "float" | "increment" | "number") => Value::from(0),
        Some("boolean" | "bool") => Value::Bool(true),
        _ => Value::String(s.to_string()),
    }
}
