//! Main analysis orchestrator for Naming Guardian
//!
//! CDD Principle: Domain Services - Analyzer orchestrates complex validation workflows
//! - Coordinates path filtering, declaration discovery, the naming pass and result aggregation
//! - Provides clean interface for validating single files, buffers or directory trees
//! - Handles parallel processing and error recovery gracefully

pub mod objc;
pub mod path_filter;
pub mod rust;

use crate::analyzer::objc::ObjcSource;
use crate::analyzer::path_filter::PathFilter;
use crate::analyzer::rust::RustSource;
use crate::config::NamingConfig;
use crate::domain::declarations::Declaration;
use crate::domain::source::LineIndex;
use crate::domain::violations::{
    Finding, FixSuggestion, NamingError, NamingResult, ValidationReport,
};
use crate::driver::{NamingPass, PassStats};
use crate::reporter::{Diagnostic, ViolationReporter};
use chrono::Utc;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Front end that discovers declarations in one kind of source file
pub trait DeclarationSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Check if this source handles the given file type
    fn handles_file(&self, file_path: &Path) -> bool;

    /// Declarations of `content` in document order
    fn declarations(&self, content: &str) -> NamingResult<Vec<Declaration>>;
}

/// Main analyzer that orchestrates the entire validation process
pub struct Analyzer {
    /// Configuration for this analysis
    config: NamingConfig,
    /// Naming pass built from the configured rules
    pass: NamingPass,
    /// Path filter for determining which files to analyze
    path_filter: PathFilter,
    /// Declaration sources, first match by file wins
    sources: Vec<Box<dyn DeclarationSource>>,
}

/// Options for customizing analysis behavior
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Whether to use parallel processing
    pub parallel: bool,
    /// Maximum number of files to analyze
    pub max_files: Option<usize>,
    /// Whether to continue on errors or fail fast
    pub fail_fast: bool,
    /// Additional paths to exclude for this run only
    pub exclude_patterns: Vec<String>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            max_files: None,
            fail_fast: false,
            exclude_patterns: Vec::new(),
        }
    }
}

/// Findings of one file together with the pass counters
#[derive(Debug, Clone, Default)]
pub struct FileAnalysis {
    pub findings: Vec<Finding>,
    pub stats: PassStats,
}

impl Analyzer {
    /// Create a new analyzer with the given configuration
    pub fn new(config: NamingConfig) -> NamingResult<Self> {
        let pass = NamingPass::from_config(&config)
            .map_err(|e| NamingError::config(format!("Failed to build naming pass: {e}")))?;

        let ignore_file = if config.paths.ignore_file.as_deref() == Some("") {
            None
        } else {
            config.paths.ignore_file.clone()
        };

        let path_filter = PathFilter::new(config.paths.patterns.clone(), ignore_file)
            .map_err(|e| NamingError::config(format!("Failed to create path filter: {e}")))?;

        Ok(Self {
            config,
            pass,
            path_filter,
            sources: vec![Box::new(RustSource::new()), Box::new(ObjcSource::new()?)],
        })
    }

    /// Create an analyzer with default configuration
    pub fn with_defaults() -> NamingResult<Self> {
        Self::new(NamingConfig::default())
    }

    /// Register another declaration source; it is consulted before the built-in ones
    pub fn with_source(mut self, source: Box<dyn DeclarationSource>) -> Self {
        self.sources.insert(0, source);
        self
    }

    pub fn config(&self) -> &NamingConfig {
        &self.config
    }

    pub fn pass(&self) -> &NamingPass {
        &self.pass
    }

    /// Get configuration fingerprint for report stamping
    pub fn config_fingerprint(&self) -> String {
        self.config.fingerprint()
    }

    fn source_for(&self, file_path: &Path) -> Option<&dyn DeclarationSource> {
        self.sources
            .iter()
            .find(|source| source.handles_file(file_path))
            .map(|source| source.as_ref())
    }

    /// Whether some declaration source understands `file_path`
    pub fn handles_file(&self, file_path: &Path) -> bool {
        self.source_for(file_path).is_some()
    }

    /// Analyze a single file and return its findings
    pub fn analyze_file<P: AsRef<Path>>(&self, file_path: P) -> NamingResult<FileAnalysis> {
        let file_path = file_path.as_ref();

        if !self.path_filter.should_analyze(file_path)? || !self.handles_file(file_path) {
            tracing::debug!("Skipping {}", file_path.display());
            return Ok(FileAnalysis::default());
        }

        let content = fs::read_to_string(file_path).map_err(|e| {
            NamingError::analysis(
                file_path.display().to_string(),
                format!("Failed to read file: {e}"),
            )
        })?;

        self.analyze_source(file_path, &content)
    }

    /// Analyze an in-memory buffer as if it were the contents of `file_path`
    pub fn analyze_source(&self, file_path: &Path, content: &str) -> NamingResult<FileAnalysis> {
        let Some(source) = self.source_for(file_path) else {
            return Ok(FileAnalysis::default());
        };

        let declarations = source.declarations(content).map_err(|e| {
            NamingError::analysis(
                file_path.display().to_string(),
                format!("{} declaration scan failed: {e}", source.name()),
            )
        })?;

        let mut reporter = ViolationReporter::collecting();
        let stats = self.pass.run(declarations, &mut reporter)?;

        let index = LineIndex::new(content);
        let findings = reporter
            .into_diagnostics()
            .into_iter()
            .map(|diagnostic| to_finding(file_path, &index, diagnostic))
            .collect();

        Ok(FileAnalysis { findings, stats })
    }

    /// Files under `paths` that would be analyzed with `options`, in walk order
    pub fn collect_files<P: AsRef<Path>>(
        &self,
        paths: &[P],
        options: &AnalysisOptions,
    ) -> NamingResult<Vec<PathBuf>> {
        let mut files = Vec::new();

        for path in paths {
            let path = path.as_ref();

            if path.is_file() {
                files.push(path.to_path_buf());
            } else if path.is_dir() {
                files.extend(self.path_filter.find_files(path)?);
            } else {
                tracing::warn!("Path does not exist: {}", path.display());
            }
        }

        files.retain(|path| self.handles_file(path));

        // Apply additional exclusions if specified
        if !options.exclude_patterns.is_empty() {
            let mut temp_filter = self.path_filter.clone();
            for pattern in &options.exclude_patterns {
                temp_filter.add_pattern(pattern)?;
            }
            files = temp_filter.filter_paths(&files)?;
        }

        if let Some(max_files) = options.max_files {
            files.truncate(max_files);
        }

        Ok(files)
    }

    /// Analyze multiple files and return a complete validation report
    pub fn analyze_paths<P: AsRef<Path>>(
        &self,
        paths: &[P],
        options: &AnalysisOptions,
    ) -> NamingResult<ValidationReport> {
        let start_time = Instant::now();
        let mut report = ValidationReport::new();

        let files_to_analyze = self.collect_files(paths, options)?;
        let total_files = files_to_analyze.len();

        let analyses = if options.parallel && files_to_analyze.len() > 1 {
            self.analyze_files_parallel(&files_to_analyze, options)?
        } else {
            self.analyze_files_sequential(&files_to_analyze, options)?
        };

        for analysis in analyses {
            report.add_declarations_checked(analysis.stats.declarations_checked);
            for finding in analysis.findings {
                report.add_finding(finding);
            }
        }

        report.set_files_analyzed(total_files);
        report.set_execution_time(start_time.elapsed().as_millis() as u64);
        report.set_config_fingerprint(self.config.fingerprint());
        report.sort_findings();

        Ok(report)
    }

    /// Analyze files sequentially
    fn analyze_files_sequential(
        &self,
        files: &[PathBuf],
        options: &AnalysisOptions,
    ) -> NamingResult<Vec<FileAnalysis>> {
        let mut analyses = Vec::with_capacity(files.len());

        for file_path in files {
            match self.analyze_file(file_path) {
                Ok(analysis) => analyses.push(analysis),
                Err(e) if options.fail_fast => return Err(e),
                Err(e) => tracing::warn!("Failed to analyze {}: {}", file_path.display(), e),
            }
        }

        Ok(analyses)
    }

    /// Analyze files in parallel; results keep the input order
    fn analyze_files_parallel(
        &self,
        files: &[PathBuf],
        options: &AnalysisOptions,
    ) -> NamingResult<Vec<FileAnalysis>> {
        let results: Vec<(&PathBuf, NamingResult<FileAnalysis>)> = files
            .par_iter()
            .map(|file_path| (file_path, self.analyze_file(file_path)))
            .collect();

        let mut analyses = Vec::with_capacity(results.len());
        for (file_path, result) in results {
            match result {
                Ok(analysis) => analyses.push(analysis),
                Err(e) if options.fail_fast => return Err(e),
                Err(e) => tracing::warn!("Failed to analyze {}: {}", file_path.display(), e),
            }
        }

        Ok(analyses)
    }

    /// Analyze a directory tree and return a validation report
    pub fn analyze_directory<P: AsRef<Path>>(
        &self,
        root: P,
        options: &AnalysisOptions,
    ) -> NamingResult<ValidationReport> {
        self.analyze_paths(&[root.as_ref()], options)
    }
}

/// Resolve a diagnostic against the line index of its file
fn to_finding(file_path: &Path, index: &LineIndex<'_>, diagnostic: Diagnostic) -> Finding {
    let position = index.position(diagnostic.location);
    let fix = FixSuggestion {
        start: index.position(diagnostic.fix_it.range.begin),
        end: index.position(diagnostic.fix_it.range.end),
        fix_it: diagnostic.fix_it,
    };

    Finding {
        rule_id: diagnostic.rule_id,
        severity: diagnostic.severity,
        file_path: file_path.to_path_buf(),
        declaration: diagnostic.declaration,
        position,
        message: diagnostic.message,
        fix,
        context: index.line_text(position.line).map(str::to_string),
        detected_at: Utc::now(),
    }
}
