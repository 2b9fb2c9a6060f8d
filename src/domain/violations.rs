//! Core domain models for naming violations and validation results
//!
//! Architecture: Rich Domain Models - Violations carry their own correction and fix-it span
//! - A Violation is anchor-relative and knows nothing about files
//! - A Finding is a Violation resolved against a concrete file and line index
//! - ValidationReport acts as an aggregate root managing collections of findings

use crate::domain::source::{Position, SourceRange};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Severity levels for naming violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational messages and suggestions
    Info,
    /// Warnings that should be addressed but don't block builds
    Warning,
    /// Errors that block commits and fail CI/CD builds
    Error,
}

impl Severity {
    /// Whether this severity level should cause validation to fail
    pub fn is_blocking(self) -> bool {
        matches!(self, Self::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Identifier of a built-in naming rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    /// Type names must not begin with a lowercase letter
    LeadingLowercase,
    /// Type names must not contain underscores
    EmbeddedSeparator,
}

impl RuleId {
    pub const ALL: [RuleId; 2] = [RuleId::LeadingLowercase, RuleId::EmbeddedSeparator];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LeadingLowercase => "leading_lowercase",
            Self::EmbeddedSeparator => "embedded_separator",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s || id.as_str().replace('_', "-") == s)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Replacement edit relative to a declaration's anchor; both ends inclusive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub range_start: usize,
    pub range_end: usize,
    /// Corrected name
    pub text: String,
}

/// A failed rule check for one declaration name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub rule_id: RuleId,
    pub severity: Severity,
    pub message: String,
    /// Offset from the anchor the diagnostic points at
    pub primary_offset: usize,
    pub replacement: Replacement,
}

impl Violation {
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// The corrected name this violation proposes
    pub fn suggestion(&self) -> &str {
        &self.replacement.text
    }
}

/// A concrete text substitution over an absolute, inclusive source range
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixIt {
    pub range: SourceRange,
    pub replacement: String,
}

impl FixIt {
    pub fn replace(range: SourceRange, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }
}

/// Fix-it of a finding, with human coordinates of both range ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixSuggestion {
    pub fix_it: FixIt,
    pub start: Position,
    pub end: Position,
}

/// A violation resolved against a concrete file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub rule_id: RuleId,
    pub severity: Severity,
    pub file_path: PathBuf,
    /// Name of the offending declaration as written
    pub declaration: String,
    /// Where the diagnostic points
    pub position: Position,
    pub message: String,
    pub fix: FixSuggestion,
    /// Source line containing `position`
    pub context: Option<String>,
    pub detected_at: DateTime<Utc>,
}

impl Finding {
    pub fn is_blocking(&self) -> bool {
        self.severity.is_blocking()
    }

    pub fn format_display(&self) -> String {
        format!(
            "{}:{}: {}: {} [{}]",
            self.file_path.display(),
            self.position,
            self.severity.as_str(),
            self.message,
            self.rule_id
        )
    }
}

/// Summary statistics for a validation report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Total number of files analyzed
    pub total_files: usize,
    /// Type or interface declarations the rules were run against
    pub declarations_checked: usize,
    pub findings_by_severity: SeverityCounts,
    /// Total execution time in milliseconds
    pub execution_time_ms: u64,
    pub validated_at: DateTime<Utc>,
}

/// Count of findings by severity level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
}

impl SeverityCounts {
    pub fn total(&self) -> usize {
        self.error + self.warning + self.info
    }

    pub fn has_blocking(&self) -> bool {
        self.error > 0
    }

    pub fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.error += 1,
            Severity::Warning => self.warning += 1,
            Severity::Info => self.info += 1,
        }
    }
}

/// Complete validation report containing all findings and metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
    pub summary: ValidationSummary,
    /// Fingerprint of the configuration used for this validation
    pub config_fingerprint: Option<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            findings: Vec::new(),
            summary: ValidationSummary {
                validated_at: Utc::now(),
                ..Default::default()
            },
            config_fingerprint: None,
        }
    }

    pub fn add_finding(&mut self, finding: Finding) {
        self.summary.findings_by_severity.add(finding.severity);
        self.findings.push(finding);
    }

    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }

    /// Whether the report contains blocking findings (errors)
    pub fn has_errors(&self) -> bool {
        self.summary.findings_by_severity.has_blocking()
    }

    pub fn findings_by_severity(&self, severity: Severity) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.severity == severity)
    }

    pub fn findings_for_rule(&self, rule_id: RuleId) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.rule_id == rule_id)
    }

    pub fn set_files_analyzed(&mut self, count: usize) {
        self.summary.total_files = count;
    }

    pub fn add_declarations_checked(&mut self, count: usize) {
        self.summary.declarations_checked += count;
    }

    pub fn set_execution_time(&mut self, duration_ms: u64) {
        self.summary.execution_time_ms = duration_ms;
    }

    pub fn set_config_fingerprint(&mut self, fingerprint: impl Into<String>) {
        self.config_fingerprint = Some(fingerprint.into());
    }

    /// Merge another report into this one
    pub fn merge(&mut self, other: ValidationReport) {
        for finding in other.findings {
            self.add_finding(finding);
        }
        self.summary.total_files += other.summary.total_files;
        self.summary.declarations_checked += other.summary.declarations_checked;
    }

    /// Sort by file path and line; stable, so emission order survives within a line
    pub fn sort_findings(&mut self) {
        self.findings.sort_by(|a, b| {
            a.file_path
                .cmp(&b.file_path)
                .then_with(|| a.position.line.cmp(&b.position.line))
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Error types that can occur during validation
#[derive(Debug, thiserror::Error)]
pub enum NamingError {
    /// Configuration file could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File could not be read or accessed
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Glob or regex compilation failed
    #[error("Pattern error: {message}")]
    Pattern { message: String },

    /// Analysis failed for a specific file
    #[error("Analysis error in {file}: {message}")]
    Analysis { file: String, message: String },

    /// The diagnostic sink refused a diagnostic
    #[error("Diagnostic sink error: {message}")]
    Sink { message: String },

    /// Fix-its could not be applied
    #[error("Fix-it error in {file}: {message}")]
    Fix { file: String, message: String },

    /// Validation operation failed
    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl NamingError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn pattern(message: impl Into<String>) -> Self {
        Self::Pattern {
            message: message.into(),
        }
    }

    pub fn analysis(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Analysis {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn sink(message: impl Into<String>) -> Self {
        Self::Sink {
            message: message.into(),
        }
    }

    pub fn fix(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fix {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Result type for naming guardian operations
pub type NamingResult<T> = Result<T, NamingError>;
