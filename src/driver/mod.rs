//! The naming pass: filter declarations, run the rules, report violations
//!
//! CDD Principle: Application Service - A single forward pass with no cross-declaration state
//! - Only type and interface declarations are checked
//! - Rules run in table order and never short-circuit one another
//! - Diagnostics reach the sink in declaration order

use crate::config::NamingConfig;
use crate::domain::declarations::Declaration;
use crate::domain::violations::{NamingError, NamingResult, Severity, Violation};
use crate::reporter::{DiagnosticIds, DiagnosticSink, ViolationReporter};
use crate::rules::{NamingRule, BUILTIN_RULES};
use regex::Regex;

/// A rule as configured for one pass
#[derive(Debug, Clone)]
pub struct ActiveRule {
    pub rule: &'static NamingRule,
    pub severity: Severity,
    /// Message template used instead of the rule's built-in one
    pub message: String,
}

impl ActiveRule {
    pub fn builtin(rule: &'static NamingRule) -> Self {
        Self {
            rule,
            severity: Severity::Error,
            message: rule.message.to_string(),
        }
    }

    pub fn check(&self, name: &str) -> Option<Violation> {
        self.rule
            .check_with_message(name, &self.message)
            .map(|violation| violation.with_severity(self.severity))
    }
}

/// Counters for one run of the pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    pub declarations_seen: usize,
    pub declarations_checked: usize,
    /// Type declarations skipped by an allow pattern
    pub declarations_allowed: usize,
    pub violations_reported: usize,
}

/// Configured naming pass
#[derive(Debug, Clone)]
pub struct NamingPass {
    rules: Vec<ActiveRule>,
    allow: Vec<Regex>,
}

impl NamingPass {
    /// Pass running every built-in rule with its default message
    pub fn new() -> Self {
        Self {
            rules: BUILTIN_RULES.iter().map(ActiveRule::builtin).collect(),
            allow: Vec::new(),
        }
    }

    pub fn with_rules(rules: Vec<ActiveRule>) -> Self {
        Self {
            rules,
            allow: Vec::new(),
        }
    }

    /// Pass with the rules, messages, severities and allow list of `config`
    pub fn from_config(config: &NamingConfig) -> NamingResult<Self> {
        let rules = BUILTIN_RULES
            .iter()
            .filter_map(|rule| {
                let settings = config.rule_settings(rule.id);
                settings.enabled.then(|| ActiveRule {
                    rule,
                    severity: settings.severity,
                    message: settings
                        .message
                        .clone()
                        .unwrap_or_else(|| rule.message.to_string()),
                })
            })
            .collect();

        let allow = config
            .allow
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| {
                    NamingError::pattern(format!("Invalid allow pattern '{pattern}': {e}"))
                })
            })
            .collect::<NamingResult<Vec<_>>>()?;

        Ok(Self { rules, allow })
    }

    pub fn rules(&self) -> &[ActiveRule] {
        &self.rules
    }

    fn is_allowed(&self, name: &str) -> bool {
        self.allow.iter().any(|pattern| pattern.is_match(name))
    }

    /// Violations of `name` in rule order
    pub fn check(&self, name: &str) -> Vec<Violation> {
        self.rules.iter().filter_map(|rule| rule.check(name)).collect()
    }

    /// Run the pass over `declarations`, reporting through `reporter`
    ///
    /// Stops at the first diagnostic the sink rejects and returns that error.
    pub fn run<D, I, S>(
        &self,
        declarations: D,
        reporter: &mut ViolationReporter<I, S>,
    ) -> NamingResult<PassStats>
    where
        D: IntoIterator<Item = Declaration>,
        I: DiagnosticIds,
        S: DiagnosticSink,
    {
        let mut stats = PassStats::default();

        for decl in declarations {
            stats.declarations_seen += 1;

            if !decl.is_type_or_interface() {
                continue;
            }
            if self.is_allowed(&decl.name) {
                tracing::debug!("Skipping allowed type name `{}`", decl.name);
                stats.declarations_allowed += 1;
                continue;
            }

            stats.declarations_checked += 1;
            for rule in &self.rules {
                if let Some(violation) = rule.check(&decl.name) {
                    reporter.report(&decl, violation)?;
                    stats.violations_reported += 1;
                }
            }
        }

        Ok(stats)
    }
}

impl Default for NamingPass {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the built-in rules over `declarations`
pub fn run<D, I, S>(
    declarations: D,
    reporter: &mut ViolationReporter<I, S>,
) -> NamingResult<PassStats>
where
    D: IntoIterator<Item = Declaration>,
    I: DiagnosticIds,
    S: DiagnosticSink,
{
    NamingPass::new().run(declarations, reporter)
}
