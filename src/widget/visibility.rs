use regex::Regex;
use tracing::warn;

use crate::error::ConfigError;
use crate::host::page::HostPage;
use crate::page::classifier::{SensitiveSignal, classify_page};

#[derive(Debug, Clone)]
enum RuleMode {
    All,
    Include(Vec<Regex>),
    Exclude(Vec<Regex>),
}

/// Compiled include/exclude path rules.
#[derive(Debug, Clone)]
pub struct PathRules {
    mode: RuleMode,
}

impl PathRules {
    pub fn allow_all() -> Self {
        Self {
            mode: RuleMode::All,
        }
    }

    /// Invalid patterns are logged and dropped; they never match.
    pub fn compile(
        include: Option<&[String]>,
        exclude: Option<&[String]>,
    ) -> Result<Self, ConfigError> {
        let include = include.filter(|p| !p.is_empty());
        let exclude = exclude.filter(|p| !p.is_empty());

        let mode = match (include, exclude) {
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingPathRules),
            (Some(patterns), None) => RuleMode::Include(compile_patterns(patterns)),
            (None, Some(patterns)) => RuleMode::Exclude(compile_patterns(patterns)),
            (None, None) => RuleMode::All,
        };

        Ok(Self { mode })
    }

    pub fn allows(&self, path: &str) -> bool {
        match &self.mode {
            RuleMode::All => true,
            RuleMode::Include(patterns) => patterns.iter().any(|p| p.is_match(path)),
            RuleMode::Exclude(patterns) => !patterns.iter().any(|p| p.is_match(path)),
        }
    }
}

fn compile_patterns(patterns: &[String]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|p| match Regex::new(p) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!(pattern = %p, error = %e, "ignoring invalid path pattern");
                None
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    HiddenByPathRule,
    HiddenSensitive(SensitiveSignal),
}

impl Visibility {
    pub fn is_visible(&self) -> bool {
        matches!(self, Visibility::Visible)
    }
}

/// Decide whether the widget shows on the page as it is now.
pub fn evaluate_visibility(rules: &PathRules, allow_sensitive: bool, page: &HostPage) -> Visibility {
    if !rules.allows(page.path()) {
        return Visibility::HiddenByPathRule;
    }

    if !allow_sensitive {
        if let Some(signal) = classify_page(page).signal {
            return Visibility::HiddenSensitive(signal);
        }
    }

    Visibility::Visible
}
