//! Naming Guardian - naming-convention enforcement for type declarations
//!
//! Architecture: Clean Architecture - Library interface serves as the application layer
//! - The naming pass and its rules are pure and know nothing about files
//! - Declaration sources, path filtering and reporting sit around that core
//! - NamingValidator offers async validation and fix-it workflows on top

pub mod analyzer;
pub mod config;
pub mod domain;
pub mod driver;
pub mod fixit;
pub mod report;
pub mod reporter;
pub mod rules;

// Re-export main types for convenient access
pub use domain::declarations::{DeclKind, Declaration};
pub use domain::source::{LineIndex, Position, SourceLocation, SourceRange};
pub use domain::violations::{
    Finding, FixIt, NamingError, NamingResult, RuleId, Severity, ValidationReport,
    ValidationSummary, Violation,
};

pub use config::{ConfigBuilder, NamingConfig, RuleSettings};

pub use analyzer::{AnalysisOptions, Analyzer, DeclarationSource, FileAnalysis};

pub use driver::{run, NamingPass, PassStats};

pub use fixit::{apply_fixits, FixOutcome};

pub use report::{OutputFormat, ReportFormatter, ReportOptions};

pub use reporter::{Diagnostic, DiagnosticIds, DiagnosticSink, ViolationReporter};

pub use rules::{NamingRule, BUILTIN_RULES};

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Main validator providing high-level validation and fix operations
pub struct NamingValidator {
    analyzer: Arc<Analyzer>,
    report_formatter: ReportFormatter,
}

/// Options for validation workflows
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// Output format for results
    pub output_format: OutputFormat,
    /// Report options
    pub report_options: ReportOptions,
    /// Analysis options
    pub analysis_options: AnalysisOptions,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Human,
            report_options: ReportOptions::default(),
            analysis_options: AnalysisOptions::default(),
        }
    }
}

/// Result of applying the fix-its of one file
#[derive(Debug, Clone)]
pub struct FileFix {
    pub file_path: PathBuf,
    pub outcome: FixOutcome,
    /// Whether the corrected text was written back
    pub written: bool,
}

impl NamingValidator {
    /// Create a new validator with the given configuration
    pub fn new_with_config(config: NamingConfig) -> NamingResult<Self> {
        let analyzer = Analyzer::new(config)?;

        Ok(Self {
            analyzer: Arc::new(analyzer),
            report_formatter: ReportFormatter::default(),
        })
    }

    /// Create a validator with default configuration
    pub fn new() -> NamingResult<Self> {
        Self::new_with_config(NamingConfig::default())
    }

    /// Create a validator loading configuration from file
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> NamingResult<Self> {
        let config = NamingConfig::load_from_file(path)?;
        Self::new_with_config(config)
    }

    /// Set custom report formatter
    pub fn with_report_formatter(mut self, formatter: ReportFormatter) -> Self {
        self.report_formatter = formatter;
        self
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Validate files and directories with default options
    pub async fn validate<P: AsRef<Path>>(&self, paths: Vec<P>) -> NamingResult<ValidationReport> {
        self.validate_with_options(paths, &ValidationOptions::default())
            .await
    }

    /// Validate files with custom options; analysis runs on a blocking task
    pub async fn validate_with_options<P: AsRef<Path>>(
        &self,
        paths: Vec<P>,
        options: &ValidationOptions,
    ) -> NamingResult<ValidationReport> {
        let paths: Vec<PathBuf> = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
        let analyzer = Arc::clone(&self.analyzer);
        let analysis_options = options.analysis_options.clone();

        tokio::task::spawn_blocking(move || analyzer.analyze_paths(&paths, &analysis_options))
            .await
            .map_err(|e| NamingError::validation(format!("Analysis task failed: {e}")))?
    }

    /// Validate a single file
    pub fn validate_file<P: AsRef<Path>>(&self, file_path: P) -> NamingResult<ValidationReport> {
        let file_path = file_path.as_ref();
        let analysis = self.analyzer.analyze_file(file_path)?;

        let mut report = ValidationReport::new();
        for finding in analysis.findings {
            report.add_finding(finding);
        }
        report.add_declarations_checked(analysis.stats.declarations_checked);
        report.set_files_analyzed(usize::from(self.analyzer.handles_file(file_path)));
        report.set_config_fingerprint(self.analyzer.config_fingerprint());

        Ok(report)
    }

    /// Validate entire directory tree
    pub fn validate_directory<P: AsRef<Path>>(
        &self,
        root: P,
        options: &AnalysisOptions,
    ) -> NamingResult<ValidationReport> {
        self.analyzer.analyze_directory(root, options)
    }

    /// Apply the fix-its of one file, writing the result back unless `dry_run`
    pub async fn fix_file<P: AsRef<Path>>(&self, file_path: P, dry_run: bool) -> NamingResult<FileFix> {
        let file_path = file_path.as_ref();
        let content = tokio::fs::read_to_string(file_path).await.map_err(|e| {
            NamingError::fix(
                file_path.display().to_string(),
                format!("Failed to read file: {e}"),
            )
        })?;

        let analysis = self.analyzer.analyze_source(file_path, &content)?;
        let fixits: Vec<FixIt> = analysis
            .findings
            .iter()
            .map(|finding| finding.fix.fix_it.clone())
            .collect();

        let outcome = apply_fixits(&content, &fixits).map_err(|e| {
            NamingError::fix(file_path.display().to_string(), e.to_string())
        })?;

        let written = !dry_run && outcome.changed();
        if written {
            tokio::fs::write(file_path, &outcome.text).await.map_err(|e| {
                NamingError::fix(
                    file_path.display().to_string(),
                    format!("Failed to write file: {e}"),
                )
            })?;
            tracing::info!(
                "Applied {} fix-it(s) to {}",
                outcome.applied.len(),
                file_path.display()
            );
        }

        Ok(FileFix {
            file_path: file_path.to_path_buf(),
            outcome,
            written,
        })
    }

    /// Apply fix-its to every analyzable file under `paths`
    ///
    /// Only files with at least one applied fix-it are returned.
    pub async fn fix_paths<P: AsRef<Path>>(
        &self,
        paths: &[P],
        options: &AnalysisOptions,
        dry_run: bool,
    ) -> NamingResult<Vec<FileFix>> {
        let files = self.analyzer.collect_files(paths, options)?;
        let mut fixes = Vec::new();

        for file_path in files {
            match self.fix_file(&file_path, dry_run).await {
                Ok(fix) if fix.outcome.changed() => fixes.push(fix),
                Ok(_) => {}
                Err(e) if options.fail_fast => return Err(e),
                Err(e) => tracing::warn!("Failed to fix {}: {}", file_path.display(), e),
            }
        }

        Ok(fixes)
    }

    /// Format a validation report for output
    pub fn format_report(
        &self,
        report: &ValidationReport,
        format: OutputFormat,
    ) -> NamingResult<String> {
        self.report_formatter.format_report(report, format)
    }
}

/// Convenience function to create a validator with default settings
pub fn create_validator() -> NamingResult<NamingValidator> {
    NamingValidator::new()
}

/// Convenience function to validate files with default settings
pub async fn validate_files<P: AsRef<Path>>(files: Vec<P>) -> NamingResult<ValidationReport> {
    let validator = NamingValidator::new()?;
    validator.validate(files).await
}

/// Convenience function to validate a directory with default settings
pub fn validate_directory<P: AsRef<Path>>(directory: P) -> NamingResult<ValidationReport> {
    let validator = NamingValidator::new()?;
    validator.validate_directory(directory, &AnalysisOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_validate_reports_findings() {
        let temp_dir = TempDir::new().unwrap();
        let test_file = temp_dir.path().join("shapes.rs");
        fs::write(&test_file, "struct circle;\nenum Shape_Kind { A }\nfn bad_fn() {}\n").unwrap();

        let validator = NamingValidator::new().unwrap();
        let report = validator.validate(vec![&test_file]).await.unwrap();

        assert_eq!(report.findings.len(), 2);
        assert_eq!(report.summary.total_files, 1);
        assert_eq!(report.summary.declarations_checked, 2);
        assert!(report.has_errors());
    }

    #[tokio::test]
    async fn test_validate_with_options_respects_limits() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.rs"), "struct one_a;\n").unwrap();
        fs::write(temp_dir.path().join("b.rs"), "struct one_b;\n").unwrap();

        let validator = NamingValidator::new().unwrap();
        let options = ValidationOptions {
            analysis_options: AnalysisOptions {
                max_files: Some(1),
                parallel: false,
                ..Default::default()
            },
            ..Default::default()
        };
        let report = validator
            .validate_with_options(vec![temp_dir.path()], &options)
            .await
            .unwrap();

        assert_eq!(report.summary.total_files, 1);
    }

    #[test]
    fn test_single_file_validation() {
        let temp_dir = TempDir::new().unwrap();
        let test_file = temp_dir.path().join("Widget.h");
        fs::write(&test_file, "@interface widget : NSObject\n@end\n").unwrap();

        let validator = NamingValidator::new().unwrap();
        let report = validator.validate_file(&test_file).unwrap();

        assert!(report.has_findings());
        assert_eq!(report.summary.total_files, 1);
        assert_eq!(report.findings[0].fix.fix_it.replacement, "Widget");
    }

    #[tokio::test]
    async fn test_fix_file_applies_first_fix_per_declaration() {
        let temp_dir = TempDir::new().unwrap();
        let test_file = temp_dir.path().join("lib.rs");
        fs::write(&test_file, "struct bad_name;\nstruct widget;\nstruct Fine;\n").unwrap();

        let validator = NamingValidator::new().unwrap();

        let first = validator.fix_file(&test_file, false).await.unwrap();
        assert!(first.written);
        assert_eq!(first.outcome.applied.len(), 2);
        assert_eq!(first.outcome.skipped.len(), 1);
        assert_eq!(
            fs::read_to_string(&test_file).unwrap(),
            "struct Bad_name;\nstruct Widget;\nstruct Fine;\n"
        );

        let second = validator.fix_file(&test_file, false).await.unwrap();
        assert_eq!(second.outcome.applied.len(), 1);
        assert_eq!(
            fs::read_to_string(&test_file).unwrap(),
            "struct Badname;\nstruct Widget;\nstruct Fine;\n"
        );

        let third = validator.fix_file(&test_file, false).await.unwrap();
        assert!(!third.outcome.changed());
        assert!(!third.written);
    }

    #[tokio::test]
    async fn test_fix_dry_run_leaves_file_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let test_file = temp_dir.path().join("View.m");
        let original = "@interface my_view : UIView\n@end\n";
        fs::write(&test_file, original).unwrap();

        let validator = NamingValidator::new().unwrap();
        let fix = validator.fix_file(&test_file, true).await.unwrap();

        assert!(!fix.written);
        assert_eq!(fix.outcome.text, "@interface My_view : UIView\n@end\n");
        assert_eq!(fs::read_to_string(&test_file).unwrap(), original);
    }

    #[tokio::test]
    async fn test_fix_paths_only_returns_changed_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("clean.rs"), "struct Clean;\n").unwrap();
        fs::write(temp_dir.path().join("dirty.rs"), "struct dirty;\n").unwrap();

        let validator = NamingValidator::new().unwrap();
        let fixes = validator
            .fix_paths(&[temp_dir.path()], &AnalysisOptions::default(), true)
            .await
            .unwrap();

        assert_eq!(fixes.len(), 1);
        assert!(fixes[0].file_path.ends_with("dirty.rs"));
    }

    #[tokio::test]
    async fn test_fix_missing_file_is_a_fix_error() {
        let validator = NamingValidator::new().unwrap();
        let result = validator.fix_file("does/not/exist.rs", true).await;
        assert!(matches!(result, Err(NamingError::Fix { .. })));
    }

    #[test]
    fn test_report_formatting() {
        let temp_dir = TempDir::new().unwrap();
        let test_file = temp_dir.path().join("test.rs");
        fs::write(&test_file, "struct widget;\n").unwrap();

        let validator = NamingValidator::new()
            .unwrap()
            .with_report_formatter(ReportFormatter::new(ReportOptions {
                use_colors: false,
                ..Default::default()
            }));
        let report = validator.validate_file(&test_file).unwrap();

        let human = validator.format_report(&report, OutputFormat::Human).unwrap();
        assert!(human.contains("error: type name `widget` must not begin with a lowercase letter"));

        let json = validator.format_report(&report, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed["findings"].is_array());
    }

    #[test]
    fn test_validator_from_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("naming_guardian.yaml");
        fs::write(
            &config_path,
            "version: \"1.0\"\nrules:\n  leading_lowercase:\n    enabled: false\n",
        )
        .unwrap();
        let test_file = temp_dir.path().join("test.rs");
        fs::write(&test_file, "struct widget;\n").unwrap();

        let validator = NamingValidator::from_config_file(&config_path).unwrap();
        let report = validator.validate_file(&test_file).unwrap();
        assert!(!report.has_findings());
    }

    #[tokio::test]
    async fn test_convenience_functions() {
        let temp_dir = TempDir::new().unwrap();
        let test_file = temp_dir.path().join("test.rs");
        fs::write(&test_file, "struct Fine;\n").unwrap();

        assert!(create_validator().is_ok());

        let report = validate_directory(temp_dir.path()).unwrap();
        assert_eq!(report.summary.total_files, 1);

        let report = validate_files(vec![&test_file]).await.unwrap();
        assert!(!report.has_findings());
    }
}
