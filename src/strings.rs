use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{\{(\w+)\}\}").expect("placeholder pattern is valid"))
}

/// Localized UI text keyed by dotted paths such as `summary.scoreText`.
///
/// Constructed once by the host from `strings.<locale>.json` and passed by
/// reference to whatever renders text. `Strings::default()` is empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Strings {
    table: Map<String, Value>,
}

impl Strings {
    pub fn new(table: Map<String, Value>) -> Self {
        Self { table }
    }

    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(table) => Some(Self::new(table)),
            _ => None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        !self.table.is_empty()
    }

    fn lookup(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        parts.try_fold(self.table.get(first)?, |current, key| match current {
            Value::Object(map) => map.get(key),
            _ => None,
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        matches!(self.lookup(key), Some(Value::String(_)))
    }

    /// Text for `key`, or `[key]` when there is no such string
    pub fn get(&self, key: &str) -> String {
        self.get_with(key, &[])
    }

    /// Text for `key` with `{{name}}` placeholders filled from `params`.
    /// Placeholders without a matching param are left untouched.
    pub fn get_with(&self, key: &str, params: &[(&str, String)]) -> String {
        let Some(Value::String(template)) = self.lookup(key) else {
            log::warn!("string not found for key: {key}");
            return format!("[{key}]");
        };

        if params.is_empty() {
            return template.clone();
        }

        placeholder()
            .replace_all(template, |caps: &Captures| {
                params
                    .iter()
                    .find(|(name, _)| *name == &caps[1])
                    .map(|(_, value)| value.clone())
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    /// The sub-table under `path`; empty when missing or not a table
    pub fn section(&self, path: &str) -> Map<String, Value> {
        match self.lookup(path) {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strings() -> Strings {
        Strings::from_value(json!({
            "ui": {
                "title": "Gjett ordet",
                "correctOfTotal": "{{correct}} av {{total}}",
                "timeLeft": "Tid igjen: {{time}}"
            },
            "summary": {
                "title": "Ferdig!",
                "scoreText": "Du fikk {{correct}} av {{total}} riktige"
            },
            "count": 3
        }))
        .unwrap()
    }

    #[test]
    fn default_is_uninitialized() {
        let s = Strings::default();
        assert!(!s.is_initialized());
        assert_eq!(s.get("ui.title"), "[ui.title]");
        assert!(strings().is_initialized());
    }

    #[test]
    fn nested_lookup() {
        assert_eq!(strings().get("ui.title"), "Gjett ordet");
        assert_eq!(strings().get("summary.title"), "Ferdig!");
    }

    #[test]
    fn interpolates_params() {
        let text = strings().get_with(
            "summary.scoreText",
            &[("correct", 3.to_string()), ("total", 5.to_string())],
        );
        assert_eq!(text, "Du fikk 3 av 5 riktige");
    }

    #[test]
    fn unknown_placeholders_are_kept() {
        let text = strings().get_with("ui.correctOfTotal", &[("correct", "1".to_string())]);
        assert_eq!(text, "1 av {{total}}");
    }

    #[test]
    fn missing_or_non_string_falls_back_to_key() {
        let s = strings();
        assert_eq!(s.get("ui.missing"), "[ui.missing]");
        assert_eq!(s.get("ui"), "[ui]");
        assert_eq!(s.get("count"), "[count]");
        assert_eq!(s.get("ui.title.deeper"), "[ui.title.deeper]");
        assert!(!s.contains("count"));
        assert!(s.contains("ui.timeLeft"));
    }

    #[test]
    fn sections() {
        let s = strings();
        assert_eq!(s.section("summary").len(), 2);
        assert!(s.section("nope").is_empty());
        assert!(s.section("ui.title").is_empty());
    }

    #[test]
    fn from_value_requires_object() {
        assert!(Strings::from_value(json!(["a"])).is_none());
    }
}
