//! Report generation with multiple output formats
//!
//! CDD Principle: Anti-Corruption Layer - Formatters translate domain objects to external formats
//! - ValidationReport (domain) is converted to various external representations
//! - Each formatter encapsulates the rules for its specific output format
//! - Fix-its travel with every format that has a place for them

use crate::domain::violations::{
    Finding, NamingError, NamingResult, Severity, ValidationReport,
};
use crate::rules::BUILTIN_RULES;
use serde_json::Value as JsonValue;
use std::io::Write;
use std::str::FromStr;

/// Supported output formats for validation reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Compiler-style diagnostics with caret and fix-it lines
    Human,
    /// JSON format for programmatic consumption
    Json,
    /// SARIF format for code scanning tools
    Sarif,
    /// GitHub Actions workflow commands
    GitHub,
}

impl OutputFormat {
    /// Get all available format names
    pub fn all_formats() -> &'static [&'static str] {
        &["human", "json", "sarif", "github"]
    }
}

impl FromStr for OutputFormat {
    type Err = NamingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            "sarif" => Ok(Self::Sarif),
            "github" => Ok(Self::GitHub),
            other => Err(NamingError::validation(format!(
                "Unknown output format '{}'. Available formats: {}",
                other,
                Self::all_formats().join(", ")
            ))),
        }
    }
}

/// Options for customizing report output
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Whether to use colored output (for human format)
    pub use_colors: bool,
    /// Whether to show the source line and caret under each finding
    pub show_context: bool,
    /// Whether to show the replacement text of each fix-it
    pub show_fixits: bool,
    /// Maximum number of findings to include
    pub max_findings: Option<usize>,
    /// Minimum severity level to include
    pub min_severity: Option<Severity>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            use_colors: true,
            show_context: true,
            show_fixits: true,
            max_findings: None,
            min_severity: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Style {
    Error,
    Warning,
    Info,
    Dim,
    Bold,
    Success,
    Fixit,
}

impl From<Severity> for Style {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Error => Self::Error,
            Severity::Warning => Self::Warning,
            Severity::Info => Self::Info,
        }
    }
}

/// Main report formatter that dispatches to specific formatters
#[derive(Debug, Clone, Default)]
pub struct ReportFormatter {
    options: ReportOptions,
}

impl ReportFormatter {
    /// Create a new report formatter with options
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Format a validation report in the specified format
    pub fn format_report(
        &self,
        report: &ValidationReport,
        format: OutputFormat,
    ) -> NamingResult<String> {
        let findings = self.filter_findings(&report.findings);

        match format {
            OutputFormat::Human => Ok(self.format_human(report, &findings)),
            OutputFormat::Json => self.format_json(report, &findings),
            OutputFormat::Sarif => self.format_sarif(&findings),
            OutputFormat::GitHub => Ok(self.format_github(&findings)),
        }
    }

    /// Write a formatted report to a writer
    pub fn write_report<W: Write>(
        &self,
        report: &ValidationReport,
        format: OutputFormat,
        mut writer: W,
    ) -> NamingResult<()> {
        let formatted = self.format_report(report, format)?;
        writer.write_all(formatted.as_bytes())?;
        Ok(())
    }

    /// Filter findings based on report options
    fn filter_findings<'a>(&self, findings: &'a [Finding]) -> Vec<&'a Finding> {
        let mut filtered: Vec<&Finding> = findings
            .iter()
            .filter(|f| {
                self.options
                    .min_severity
                    .map_or(true, |min_severity| f.severity >= min_severity)
            })
            .collect();

        if let Some(max) = self.options.max_findings {
            filtered.truncate(max);
        }

        filtered
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.options.use_colors {
            colorize(text, style)
        } else {
            text.to_string()
        }
    }

    /// Format report in human-readable, compiler-style format
    fn format_human(&self, report: &ValidationReport, findings: &[&Finding]) -> String {
        let mut output = String::new();

        if findings.is_empty() {
            output.push_str(&format!(
                "✅ {}\n",
                self.paint("No naming violations found", Style::Success)
            ));
        } else {
            for finding in findings {
                self.format_human_finding(&mut output, finding);
            }
        }

        output.push_str(&self.format_summary(report));
        output
    }

    fn format_human_finding(&self, output: &mut String, finding: &Finding) {
        output.push_str(&format!(
            "{}: {}: {} {}\n",
            self.paint(
                &format!("{}:{}", finding.file_path.display(), finding.position),
                Style::Bold
            ),
            self.paint(finding.severity.as_str(), finding.severity.into()),
            finding.message,
            self.paint(&format!("[{}]", finding.rule_id), Style::Dim)
        ));

        if !self.options.show_context {
            return;
        }
        let Some(context) = &finding.context else {
            return;
        };

        output.push_str(&format!("{context}\n"));
        output.push_str(&self.paint(&caret_line(context, finding), Style::Success));
        output.push('\n');

        let fix = &finding.fix;
        if self.options.show_fixits && fix.start.line == finding.position.line {
            let indent = leading_padding(context, fix.start.column as usize - 1);
            output.push_str(&format!(
                "{}{}\n",
                indent,
                self.paint(&fix.fix_it.replacement, Style::Fixit)
            ));
        }
    }

    /// Format report in JSON format
    fn format_json(&self, report: &ValidationReport, findings: &[&Finding]) -> NamingResult<String> {
        let json_findings: Vec<JsonValue> = findings
            .iter()
            .map(|f| {
                serde_json::json!({
                    "rule_id": f.rule_id,
                    "severity": f.severity.as_str(),
                    "file_path": f.file_path.display().to_string(),
                    "declaration": f.declaration,
                    "line_number": f.position.line,
                    "column_number": f.position.column,
                    "message": f.message,
                    "context": f.context,
                    "fix": {
                        "replacement": f.fix.fix_it.replacement,
                        "start": { "line": f.fix.start.line, "column": f.fix.start.column },
                        "end": { "line": f.fix.end.line, "column": f.fix.end.column },
                        "byte_range": [
                            f.fix.fix_it.range.begin.offset(),
                            f.fix.fix_it.range.end.offset()
                        ]
                    },
                    "detected_at": f.detected_at.to_rfc3339()
                })
            })
            .collect();

        let counts = &report.summary.findings_by_severity;
        let json_report = serde_json::json!({
            "findings": json_findings,
            "summary": {
                "total_files": report.summary.total_files,
                "declarations_checked": report.summary.declarations_checked,
                "findings_by_severity": {
                    "error": counts.error,
                    "warning": counts.warning,
                    "info": counts.info
                },
                "execution_time_ms": report.summary.execution_time_ms,
                "validated_at": report.summary.validated_at.to_rfc3339()
            },
            "config_fingerprint": report.config_fingerprint
        });

        serde_json::to_string_pretty(&json_report)
            .map_err(|e| NamingError::validation(format!("JSON serialization failed: {e}")))
    }

    /// Format report in SARIF 2.1.0 format
    fn format_sarif(&self, findings: &[&Finding]) -> NamingResult<String> {
        let rules: Vec<JsonValue> = BUILTIN_RULES
            .iter()
            .map(|rule| {
                serde_json::json!({
                    "id": rule.id,
                    "shortDescription": { "text": rule.message.replace("`{name}`", "name") },
                    "fullDescription": { "text": rule.description }
                })
            })
            .collect();

        let results: Vec<JsonValue> = findings
            .iter()
            .map(|f| {
                let uri = f.file_path.display().to_string();
                let level = match f.severity {
                    Severity::Error => "error",
                    Severity::Warning => "warning",
                    Severity::Info => "note",
                };

                serde_json::json!({
                    "ruleId": f.rule_id,
                    "level": level,
                    "message": { "text": f.message },
                    "locations": [{
                        "physicalLocation": {
                            "artifactLocation": { "uri": uri },
                            "region": {
                                "startLine": f.position.line,
                                "startColumn": f.position.column
                            },
                            "contextRegion": f.context.as_ref().map(|c| serde_json::json!({
                                "startLine": f.position.line,
                                "snippet": { "text": c }
                            }))
                        }
                    }],
                    "fixes": [{
                        "description": {
                            "text": format!("Rename `{}` to `{}`", f.declaration, f.fix.fix_it.replacement)
                        },
                        "artifactChanges": [{
                            "artifactLocation": { "uri": uri },
                            "replacements": [{
                                "deletedRegion": {
                                    "startLine": f.fix.start.line,
                                    "startColumn": f.fix.start.column,
                                    "endLine": f.fix.end.line,
                                    "endColumn": f.fix.end.column + 1
                                },
                                "insertedContent": { "text": f.fix.fix_it.replacement }
                            }]
                        }]
                    }]
                })
            })
            .collect();

        let sarif_report = serde_json::json!({
            "version": "2.1.0",
            "$schema": "https://json.schemastore.org/sarif-2.1.0.json",
            "runs": [{
                "tool": {
                    "driver": {
                        "name": env!("CARGO_PKG_NAME"),
                        "version": env!("CARGO_PKG_VERSION"),
                        "rules": rules
                    }
                },
                "results": results
            }]
        });

        serde_json::to_string_pretty(&sarif_report)
            .map_err(|e| NamingError::validation(format!("SARIF serialization failed: {e}")))
    }

    /// Format report as GitHub Actions workflow commands
    fn format_github(&self, findings: &[&Finding]) -> String {
        let mut output = String::new();

        for finding in findings {
            let level = match finding.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
                Severity::Info => "notice",
            };

            output.push_str(&format!(
                "::{} file={},line={},col={},endColumn={},title={}::{}\n",
                level,
                finding.file_path.display(),
                finding.position.line,
                finding.position.column,
                finding.fix.end.column + 1,
                finding.rule_id,
                escape_workflow_data(&format!(
                    "{} (suggested: {})",
                    finding.message, finding.fix.fix_it.replacement
                ))
            ));
        }

        output
    }

    /// Format the summary section
    fn format_summary(&self, report: &ValidationReport) -> String {
        let counts = &report.summary.findings_by_severity;
        let execution_time = (report.summary.execution_time_ms as f64) / 1000.0;

        let mut summary = format!("📊 {} ", self.paint("Summary:", Style::Bold));

        if counts.total() == 0 {
            summary.push_str(&format!(
                "{} in {} files, {} declarations ({:.1}s)\n",
                self.paint("0 violations", Style::Success),
                report.summary.total_files,
                report.summary.declarations_checked,
                execution_time
            ));
            return summary;
        }

        let mut parts = Vec::new();
        if counts.error > 0 {
            let text = format!("{} error{}", counts.error, plural(counts.error));
            parts.push(self.paint(&text, Style::Error));
        }
        if counts.warning > 0 {
            let text = format!("{} warning{}", counts.warning, plural(counts.warning));
            parts.push(self.paint(&text, Style::Warning));
        }
        if counts.info > 0 {
            parts.push(self.paint(&format!("{} info", counts.info), Style::Info));
        }

        summary.push_str(&format!(
            "{} in {} files, {} declarations ({:.1}s)\n",
            parts.join(", "),
            report.summary.total_files,
            report.summary.declarations_checked,
            execution_time
        ));
        summary
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// `^` under the primary position, `~` under the rest of the fix-it range
fn caret_line(context: &str, finding: &Finding) -> String {
    let caret = finding.position.column as usize;
    let (start, end) = if finding.fix.start.line == finding.position.line {
        (
            finding.fix.start.column as usize,
            finding.fix.end.column as usize,
        )
    } else {
        (caret, caret)
    };

    let width = caret.max(end);
    let mut context_chars = context.chars();
    let mut line = String::with_capacity(width);

    for column in 1..=width {
        let under = context_chars.next();
        let marker = if column == caret {
            '^'
        } else if (start..=end).contains(&column) {
            '~'
        } else if under == Some('\t') {
            '\t'
        } else {
            ' '
        };
        line.push(marker);
    }

    line
}

/// Whitespace reaching `columns` characters into `context`, keeping tabs
fn leading_padding(context: &str, columns: usize) -> String {
    let mut chars = context.chars();
    (0..columns)
        .map(|_| match chars.next() {
            Some('\t') => '\t',
            _ => ' ',
        })
        .collect()
}

/// Escape data of a GitHub workflow command
fn escape_workflow_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(feature = "colors")]
fn colorize(text: &str, style: Style) -> String {
    use colored::Colorize;

    match style {
        Style::Error => text.red().bold().to_string(),
        Style::Warning => text.yellow().bold().to_string(),
        Style::Info => text.cyan().to_string(),
        Style::Dim => text.dimmed().to_string(),
        Style::Bold => text.bold().to_string(),
        Style::Success => text.green().to_string(),
        Style::Fixit => text.green().bold().to_string(),
    }
}

#[cfg(not(feature = "colors"))]
fn colorize(text: &str, _style: Style) -> String {
    text.to_string()
}
