use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::serialize::serializer::SerializeOptions;

pub const DEFAULT_ENDPOINT: &str = "https://api.feedback-widget.dev/v1/feedback";

/// Local echo server used when `testing` is on.
pub const TESTING_ENDPOINT: &str = "http://localhost:8787/feedback";

pub const DEFAULT_PRIVACY_NOTICE: &str =
    "We capture the element you picked and basic page details. Form values and sensitive attributes are never sent.";

/// Widget initialisation options (`feedback-widget.yaml` or the embedding page).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    /// Required.
    #[serde(default)]
    pub api_key: String,

    /// Regexes; the widget shows only on matching paths.
    #[serde(default)]
    pub include_paths: Option<Vec<String>>,

    /// Regexes; the widget hides on matching paths. Exclusive with `include_paths`.
    #[serde(default)]
    pub exclude_paths: Option<Vec<String>>,

    /// Levels of children serialised below the picked element.
    #[serde(default)]
    pub child_depth: usize,

    #[serde(default)]
    pub privacy_notice: Option<String>,

    #[serde(default)]
    pub allow_on_sensitive_pages: bool,

    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub testing: bool,

    #[serde(default)]
    pub logo_url: Option<String>,
}

impl WidgetConfig {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            ..Self::default()
        }
    }

    pub fn from_yaml(content: &str, path: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_string(),
            source: e,
        })
    }

    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_string(),
            source: e,
        })?;
        Self::from_yaml(&content, path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if has_rules(&self.include_paths) && has_rules(&self.exclude_paths) {
            return Err(ConfigError::ConflictingPathRules);
        }
        Ok(())
    }

    pub fn resolved_endpoint(&self) -> &str {
        match (&self.endpoint, self.testing) {
            (Some(endpoint), _) if !endpoint.is_empty() => endpoint,
            (_, true) => TESTING_ENDPOINT,
            _ => DEFAULT_ENDPOINT,
        }
    }

    pub fn privacy_notice_text(&self) -> &str {
        self.privacy_notice
            .as_deref()
            .unwrap_or(DEFAULT_PRIVACY_NOTICE)
    }

    pub fn serialize_options(&self) -> SerializeOptions {
        SerializeOptions::with_depth(self.child_depth)
    }
}

fn has_rules(rules: &Option<Vec<String>>) -> bool {
    rules.as_ref().map(|r| !r.is_empty()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_uses_camel_case_and_defaults() {
        let yaml = "apiKey: k-123\nexcludePaths: ['^/admin']\ntesting: true\n";
        let config = WidgetConfig::from_yaml(yaml, "inline").unwrap();

        assert_eq!(config.api_key, "k-123");
        assert_eq!(config.exclude_paths, Some(vec!["^/admin".to_string()]));
        assert_eq!(config.child_depth, 0);
        assert!(!config.allow_on_sensitive_pages);
        assert_eq!(config.resolved_endpoint(), TESTING_ENDPOINT);
    }

    #[test]
    fn explicit_endpoint_beats_testing_mode() {
        let mut config = WidgetConfig::new("k");
        config.testing = true;
        config.endpoint = Some("https://collect.example.com/fb".into());
        assert_eq!(config.resolved_endpoint(), "https://collect.example.com/fb");
    }

    #[test]
    fn empty_rule_lists_do_not_conflict() {
        let mut config = WidgetConfig::new("k");
        config.include_paths = Some(vec![]);
        config.exclude_paths = Some(vec!["^/x".into()]);
        assert!(config.validate().is_ok());
    }
}
