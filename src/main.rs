//! Naming Guardian CLI - Command-line interface for naming-convention enforcement
//!
//! CDD Principle: Application Layer - CLI coordinates user interactions with domain services
//! - Translates user commands to domain operations
//! - Handles external concerns like file I/O, process exit codes, and terminal output
//! - Provides clean separation between user interface and business logic

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use naming_guardian::{
    AnalysisOptions, NamingConfig, NamingRule, NamingValidator, OutputFormat, ReportFormatter,
    ReportOptions, RuleId, Severity, ValidationOptions, BUILTIN_RULES,
};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

/// Naming Guardian - naming-convention enforcement for type declarations
#[derive(Parser)]
#[command(name = "naming-guardian")]
#[command(version)]
#[command(about = "Checks that type and interface names start uppercase and contain no underscores")]
#[command(long_about = "Naming Guardian scans Rust and Objective-C sources for type and interface declarations, reports names that start with a lowercase letter or contain underscores, and can apply the suggested renames.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormatArg,
}

#[derive(Subcommand)]
enum Commands {
    /// Check files for naming violations
    Check(CheckArgs),

    /// Apply suggested renames to source files
    Fix(FixArgs),

    /// Explain what a specific rule does
    Explain {
        /// Rule ID to explain
        rule_id: String,
    },

    /// List available rules and their configured settings
    Rules {
        /// Show only enabled rules
        #[arg(long)]
        enabled_only: bool,
    },

    /// Validate configuration file
    ValidateConfig {
        /// Configuration file to validate
        config_file: Option<PathBuf>,
    },
}

#[derive(Args)]
struct CheckArgs {
    /// Paths to analyze (files or directories)
    paths: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormatArg,

    /// Minimum severity level to report
    #[arg(short, long, value_enum)]
    severity: Option<SeverityArg>,

    /// Maximum number of findings to report
    #[arg(long)]
    max_findings: Option<usize>,

    /// Additional exclude patterns
    #[arg(long, action = clap::ArgAction::Append)]
    exclude: Vec<String>,

    /// Disable parallel processing
    #[arg(long)]
    no_parallel: bool,

    /// Fail on first error
    #[arg(long)]
    fail_fast: bool,

    /// Do not print source lines and carets
    #[arg(long)]
    no_context: bool,
}

#[derive(Args)]
struct FixArgs {
    /// Paths to fix (files or directories)
    paths: Vec<PathBuf>,

    /// Report what would change without writing files
    #[arg(long)]
    dry_run: bool,

    /// Additional exclude patterns
    #[arg(long, action = clap::ArgAction::Append)]
    exclude: Vec<String>,

    /// Fail on first error
    #[arg(long)]
    fail_fast: bool,
}

#[derive(Copy, Clone, ValueEnum, PartialEq, Eq, Debug)]
enum OutputFormatArg {
    Human,
    Json,
    Sarif,
    Github,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Sarif => OutputFormat::Sarif,
            OutputFormatArg::Github => OutputFormat::GitHub,
        }
    }
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum SeverityArg {
    Info,
    Warning,
    Error,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Info => Severity::Info,
            SeverityArg::Warning => Severity::Warning,
            SeverityArg::Error => Severity::Error,
        }
    }
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum LogFormatArg {
    Text,
    Json,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.log_format);
    if cli.no_color {
        disable_colors();
    }

    match run_command(cli).await {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}

async fn run_command(cli: Cli) -> Result<i32> {
    let config_path = cli.config.as_deref();
    let use_colors = !cli.no_color;

    match cli.command {
        Commands::Check(args) => run_check(config_path, args, use_colors).await,
        Commands::Fix(args) => run_fix(config_path, args).await,
        Commands::Explain { rule_id } => Ok(run_explain(&rule_id)),
        Commands::Rules { enabled_only } => run_list_rules(config_path, enabled_only),
        Commands::ValidateConfig { config_file } => {
            Ok(run_validate_config(
                config_file.or_else(|| config_path.map(Path::to_path_buf)),
            ))
        }
    }
}

fn load_config(config_path: Option<&Path>) -> Result<NamingConfig> {
    NamingConfig::resolve(config_path).with_context(|| match config_path {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Failed to load configuration".to_string(),
    })
}

/// Use the current directory if no paths were given
fn default_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths
    }
}

async fn run_check(config_path: Option<&Path>, args: CheckArgs, use_colors: bool) -> Result<i32> {
    let config = load_config(config_path)?;

    let validation_options = ValidationOptions {
        output_format: args.format.into(),
        report_options: ReportOptions {
            use_colors,
            show_context: !args.no_context,
            max_findings: args.max_findings,
            min_severity: args.severity.map(Into::into),
            ..Default::default()
        },
        analysis_options: AnalysisOptions {
            parallel: !args.no_parallel,
            fail_fast: args.fail_fast,
            exclude_patterns: args.exclude,
            ..Default::default()
        },
    };

    let validator = NamingValidator::new_with_config(config)?.with_report_formatter(
        ReportFormatter::new(validation_options.report_options.clone()),
    );

    let report = validator
        .validate_with_options(default_paths(args.paths), &validation_options)
        .await
        .context("Validation failed")?;

    let formatted = validator.format_report(&report, validation_options.output_format)?;
    println!("{}", formatted.trim_end());

    Ok(if report.has_errors() { 1 } else { 0 })
}

async fn run_fix(config_path: Option<&Path>, args: FixArgs) -> Result<i32> {
    let config = load_config(config_path)?;
    let validator = NamingValidator::new_with_config(config)?;

    let options = AnalysisOptions {
        fail_fast: args.fail_fast,
        exclude_patterns: args.exclude,
        ..Default::default()
    };

    let paths = default_paths(args.paths);
    let fixes = validator
        .fix_paths(&paths, &options, args.dry_run)
        .await
        .context("Applying fix-its failed")?;

    let verb = if args.dry_run { "Would apply" } else { "Applied" };
    let mut deferred = 0;

    for fix in &fixes {
        println!(
            "{} {} fix-it{} to {}",
            verb,
            fix.outcome.applied.len(),
            if fix.outcome.applied.len() == 1 { "" } else { "s" },
            fix.file_path.display()
        );
        for fix_it in &fix.outcome.applied {
            println!("  {} -> `{}`", fix_it.range.begin, fix_it.replacement);
        }
        deferred += fix.outcome.skipped.len();
    }

    if fixes.is_empty() {
        println!("✅ Nothing to fix");
    }
    if deferred > 0 {
        println!(
            "{deferred} overlapping fix-it{} deferred; run `fix` again to apply",
            if deferred == 1 { "" } else { "s" }
        );
    }

    Ok(0)
}

fn run_explain(rule_id: &str) -> i32 {
    let Some(id) = RuleId::parse(rule_id) else {
        eprintln!("❌ Rule '{rule_id}' not found");
        println!();
        println!("Available rules:");
        for rule in &BUILTIN_RULES {
            println!("  - {}", rule.id);
        }
        return 1;
    };

    let rule = NamingRule::lookup(id);
    let example = "my_widget";

    println!("📖 Rule: {}", rule.id);
    println!("⚠️ Default severity: {}", Severity::Error.as_str());
    println!();
    println!("📝 Description:");
    println!("   {}", rule.description);
    println!();
    println!("💬 Message:");
    println!("   {}", rule.message);
    println!();
    println!("🔧 Example fix:");
    println!("   {} -> {}", example, rule.correct(example));

    0
}

fn run_list_rules(config_path: Option<&Path>, enabled_only: bool) -> Result<i32> {
    let config = load_config(config_path)?;

    println!("📋 Available Rules\n");

    for rule in &BUILTIN_RULES {
        let settings = config.rule_settings(rule.id);
        if enabled_only && !settings.enabled {
            continue;
        }

        let status = if settings.enabled { "✅" } else { "❌" };
        let message = settings.message.as_deref().unwrap_or(rule.message);
        println!(
            "  {}🔍 {} [{}] - {}",
            status,
            rule.id,
            settings.severity.as_str(),
            message
        );
    }

    if !config.allow.is_empty() {
        println!();
        println!("Allowed names: {}", config.allow.join(", "));
    }

    Ok(0)
}

fn run_validate_config(config_path: Option<PathBuf>) -> i32 {
    let config_path = config_path
        .or_else(|| NamingConfig::discover(Path::new(".")))
        .unwrap_or_else(|| PathBuf::from("naming_guardian.yaml"));

    println!("Validating configuration: {}", config_path.display());

    match NamingConfig::load_from_file(&config_path) {
        Ok(config) => {
            println!("✅ Configuration is valid");
            println!("📊 Configuration summary:");
            println!(
                "  Rules: {} total, {} enabled",
                BUILTIN_RULES.len(),
                config.enabled_rules().count()
            );
            println!("  Path patterns: {}", config.paths.patterns.len());
            println!("  Allow patterns: {}", config.allow.len());
            println!("  Fingerprint: {}", config.fingerprint());
            0
        }
        Err(e) => {
            eprintln!("❌ Configuration validation failed: {e}");
            1
        }
    }
}

fn init_logging(verbose: bool, format: LogFormatArg) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormatArg::Text => builder.init(),
        LogFormatArg::Json => builder.json().init(),
    }
}

#[cfg(feature = "colors")]
fn disable_colors() {
    colored::control::set_override(false);
}

#[cfg(not(feature = "colors"))]
fn disable_colors() {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn check_args(paths: Vec<PathBuf>, format: OutputFormatArg) -> CheckArgs {
        CheckArgs {
            paths,
            format,
            severity: None,
            max_findings: None,
            exclude: vec![],
            no_parallel: false,
            fail_fast: false,
            no_context: false,
        }
    }

    fn write_config(dir: &Path, yaml: &str) -> PathBuf {
        let path = dir.join("naming_guardian.yaml");
        fs::write(&path, yaml).unwrap();
        path
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_global_flags() {
        let cli = Cli::try_parse_from([
            "naming-guardian",
            "check",
            "src",
            "--format",
            "sarif",
            "--no-color",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert!(cli.no_color);
        assert!(matches!(cli.log_format, LogFormatArg::Json));
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.paths, vec![PathBuf::from("src")]);
                assert_eq!(args.format, OutputFormatArg::Sarif);
            }
            _ => panic!("expected check"),
        }
    }

    #[tokio::test]
    async fn test_check_command_exit_codes() {
        let temp_dir = TempDir::new().unwrap();
        let config = write_config(temp_dir.path(), "version: \"1.0\"\n");
        let dirty = temp_dir.path().join("dirty.rs");
        let clean = temp_dir.path().join("clean.rs");
        fs::write(&dirty, "struct bad_name;\n").unwrap();
        fs::write(&clean, "struct GoodName;\n").unwrap();

        let result = run_check(
            Some(&config),
            check_args(vec![dirty], OutputFormatArg::Json),
            false,
        )
        .await;
        assert_eq!(result.unwrap(), 1);

        let result = run_check(
            Some(&config),
            check_args(vec![clean], OutputFormatArg::Human),
            false,
        )
        .await;
        assert_eq!(result.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_check_warnings_do_not_fail() {
        let temp_dir = TempDir::new().unwrap();
        let config = write_config(
            temp_dir.path(),
            "version: \"1.0\"\nrules:\n  leading_lowercase:\n    severity: warning\n",
        );
        let file = temp_dir.path().join("lib.rs");
        fs::write(&file, "struct widget;\n").unwrap();

        let result = run_check(
            Some(&config),
            check_args(vec![file], OutputFormatArg::Github),
            false,
        )
        .await;
        assert_eq!(result.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_check_with_missing_config_fails() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("absent.yaml");

        let result = run_check(
            Some(&missing),
            check_args(vec![temp_dir.path().to_path_buf()], OutputFormatArg::Human),
            false,
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_fix_command() {
        let temp_dir = TempDir::new().unwrap();
        let config = write_config(temp_dir.path(), "version: \"1.0\"\n");
        let file = temp_dir.path().join("View.h");
        fs::write(&file, "@interface my_view : UIView\n@end\n").unwrap();

        let dry = FixArgs {
            paths: vec![file.clone()],
            dry_run: true,
            exclude: vec![],
            fail_fast: false,
        };
        assert_eq!(run_fix(Some(&config), dry).await.unwrap(), 0);
        assert!(fs::read_to_string(&file).unwrap().contains("my_view"));

        let real = FixArgs {
            paths: vec![file.clone()],
            dry_run: false,
            exclude: vec![],
            fail_fast: false,
        };
        assert_eq!(run_fix(Some(&config), real).await.unwrap(), 0);
        assert!(fs::read_to_string(&file).unwrap().contains("@interface My_view"));
    }

    #[test]
    fn test_validate_config() {
        let temp_dir = TempDir::new().unwrap();

        let valid = temp_dir.path().join("valid.yaml");
        fs::write(&valid, serde_yaml::to_string(&NamingConfig::default()).unwrap()).unwrap();
        assert_eq!(run_validate_config(Some(valid)), 0);

        let invalid = temp_dir.path().join("invalid.yaml");
        fs::write(&invalid, "version: \"9.9\"\n").unwrap();
        assert_eq!(run_validate_config(Some(invalid)), 1);
    }

    #[test]
    fn test_explain_rule() {
        assert_eq!(run_explain("leading_lowercase"), 0);
        assert_eq!(run_explain("embedded-separator"), 0);
        assert_eq!(run_explain("nonexistent_rule"), 1);
    }

    #[test]
    fn test_list_rules() {
        let temp_dir = TempDir::new().unwrap();
        let config = write_config(
            temp_dir.path(),
            "version: \"1.0\"\nrules:\n  embedded_separator:\n    enabled: false\nallow: [\"^NS\"]\n",
        );

        assert_eq!(run_list_rules(Some(&config), false).unwrap(), 0);
        assert_eq!(run_list_rules(Some(&config), true).unwrap(), 0);
    }
}
