use glob::{MatchOptions, Pattern};

use crate::error::ConfigError;
use crate::types::{RetentionRule, DEFAULT_RETENTION_DAYS};

// `*` spans directory separators; matching is case-sensitive.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

#[derive(Clone, Debug)]
struct CompiledRule {
    rule: RetentionRule,
    matcher: Pattern,
}

/// Ordered retention rules, compiled once. The first matching rule wins.
#[derive(Clone, Debug)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
    default_days: u32,
}

/// Outcome of resolving a relative path against a [`RuleSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuleMatch<'a> {
    pub retention_days: u32,
    /// `None` when the default retention applied.
    pub rule: Option<&'a RetentionRule>,
}

impl RuleSet {
    pub fn compile(rules: &[RetentionRule]) -> Result<Self, ConfigError> {
        let compiled = rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                Pattern::new(&rule.pattern)
                    .map(|matcher| CompiledRule { rule: rule.clone(), matcher })
                    .map_err(|e| ConfigError::InvalidPattern {
                        index,
                        pattern: rule.pattern.clone(),
                        message: e.msg.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules: compiled, default_days: DEFAULT_RETENTION_DAYS })
    }

    pub fn with_default_days(mut self, days: u32) -> Self {
        self.default_days = days;
        self
    }

    pub fn default_days(&self) -> u32 {
        self.default_days
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> impl Iterator<Item = &RetentionRule> {
        self.rules.iter().map(|c| &c.rule)
    }

    pub fn resolve(&self, relative_path: &str) -> RuleMatch<'_> {
        self.rules
            .iter()
            .find(|c| c.matcher.matches_with(relative_path, MATCH_OPTIONS))
            .map(|c| RuleMatch { retention_days: c.rule.retention_days, rule: Some(&c.rule) })
            .unwrap_or(RuleMatch { retention_days: self.default_days, rule: None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(rules: &[(&str, u32)]) -> RuleSet {
        let rules: Vec<_> = rules.iter().map(|(p, d)| RetentionRule::new(*p, *d)).collect();
        RuleSet::compile(&rules).unwrap()
    }

    #[test]
    fn first_matching_rule_wins() {
        let rules = set(&[("logs/*", 7), ("logs/*.log", 90)]);
        let m = rules.resolve("logs/app.log");
        assert_eq!(m.retention_days, 7);
        assert_eq!(m.rule.unwrap().pattern, "logs/*");
    }

    #[test]
    fn unmatched_path_uses_default() {
        let rules = set(&[("logs/*", 7)]);
        let m = rules.resolve("data/keep.txt");
        assert_eq!(m.retention_days, DEFAULT_RETENTION_DAYS);
        assert!(m.rule.is_none());
    }

    #[test]
    fn star_crosses_directories() {
        let rules = set(&[("*.tmp", 1), ("cache/*", 3)]);
        assert_eq!(rules.resolve("a/b/c.tmp").retention_days, 1);
        assert_eq!(rules.resolve("cache/x/y/z.bin").retention_days, 3);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let rules = set(&[("Logs/*", 7)]);
        assert_eq!(rules.resolve("logs/app.log").retention_days, DEFAULT_RETENTION_DAYS);
        assert_eq!(rules.resolve("Logs/app.log").retention_days, 7);
    }

    #[test]
    fn invalid_pattern_reports_rule_index() {
        let rules = vec![RetentionRule::new("ok/*", 1), RetentionRule::new("bad/[", 2)];
        let err = RuleSet::compile(&rules).unwrap_err();
        match err {
            ConfigError::InvalidPattern { index, pattern, .. } => {
                assert_eq!(index, 1);
                assert_eq!(pattern, "bad/[");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn default_can_be_overridden() {
        let rules = set(&[]).with_default_days(30);
        assert!(rules.is_empty());
        assert_eq!(rules.resolve("anything").retention_days, 30);
    }
}
