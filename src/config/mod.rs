//! Configuration loading and management for Naming Guardian
//!
//! Architecture: Anti-Corruption Layer - Configuration translates external YAML formats
//! - Raw YAML structures are converted to clean domain objects
//! - Default configurations are embedded in the domain, not infrastructure
//! - Missing rule sections fall back to the built-in rule defaults

use crate::analyzer::path_filter::{DEFAULT_EXCLUDE_PATTERNS, DEFAULT_IGNORE_FILE};
use crate::domain::violations::{NamingError, NamingResult, RuleId, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File names searched, in order, when no configuration path is given
pub const DEFAULT_CONFIG_FILES: [&str; 3] = [
    "naming_guardian.yaml",
    "naming_guardian.yml",
    ".naming_guardian.yaml",
];

/// Main configuration structure for Naming Guardian
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Configuration format version
    pub version: String,
    /// Path filtering configuration
    #[serde(default)]
    pub paths: PathConfig,
    /// Per-rule settings; absent rules use their defaults
    #[serde(default)]
    pub rules: BTreeMap<RuleId, RuleSettings>,
    /// Regular expressions for type names exempt from every rule
    #[serde(default)]
    pub allow: Vec<String>,
}

/// Path filtering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    /// Include/exclude patterns (gitignore-style)
    pub patterns: Vec<String>,
    /// Optional .namingignore file name
    pub ignore_file: Option<String>,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_EXCLUDE_PATTERNS.iter().map(|p| p.to_string()).collect(),
            ignore_file: Some(DEFAULT_IGNORE_FILE.to_string()),
        }
    }
}

/// Settings of a single rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_severity")]
    pub severity: Severity,
    /// Message template; `{name}` and `{suggestion}` are substituted
    #[serde(default)]
    pub message: Option<String>,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: default_severity(),
            message: None,
        }
    }
}

impl NamingConfig {
    /// Load configuration from a file; `.json` files are parsed as JSON, anything else as YAML
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> NamingResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            NamingError::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let parsed: Result<Self, String> = if is_json {
            serde_json::from_str(&contents).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(&contents).map_err(|e| e.to_string())
        };
        let config = parsed.map_err(|e| {
            NamingError::config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from string content
    pub fn load_from_str(content: &str) -> NamingResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| NamingError::config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// First default configuration file found in `dir`, if any
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    }

    /// Load `path`, or the first default file in the working directory, or defaults
    pub fn resolve(path: Option<&Path>) -> NamingResult<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => match Self::discover(Path::new(".")) {
                Some(found) => {
                    tracing::debug!("Using configuration {}", found.display());
                    Self::load_from_file(found)
                }
                None => Ok(Self::default()),
            },
        }
    }

    /// Get default configuration with every built-in rule enabled
    pub fn with_defaults() -> Self {
        Self {
            version: "1.0".to_string(),
            paths: PathConfig::default(),
            rules: RuleId::ALL
                .into_iter()
                .map(|id| (id, RuleSettings::default()))
                .collect(),
            allow: Vec::new(),
        }
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> NamingResult<()> {
        if !["1.0"].contains(&self.version.as_str()) {
            return Err(NamingError::config(format!(
                "Unsupported configuration version: {}. Supported versions: 1.0",
                self.version
            )));
        }

        for pattern in &self.allow {
            regex::Regex::new(pattern).map_err(|e| {
                NamingError::config(format!("Invalid allow pattern '{pattern}': {e}"))
            })?;
        }

        for pattern in &self.paths.patterns {
            let glob_str = pattern.strip_prefix('!').unwrap_or(pattern);
            glob::Pattern::new(glob_str.trim_start_matches('/').trim_end_matches('/'))
                .map_err(|e| {
                    NamingError::config(format!("Invalid path pattern '{pattern}': {e}"))
                })?;
        }

        Ok(())
    }

    /// Effective settings of `id`
    pub fn rule_settings(&self, id: RuleId) -> RuleSettings {
        self.rules.get(&id).cloned().unwrap_or_default()
    }

    /// Enabled rule ids in evaluation order
    pub fn enabled_rules(&self) -> impl Iterator<Item = RuleId> + '_ {
        RuleId::ALL
            .into_iter()
            .filter(move |id| self.rule_settings(*id).enabled)
    }

    /// Convert to JSON for serialization
    pub fn to_json(&self) -> NamingResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| NamingError::config(format!("Failed to serialize config: {e}")))
    }

    /// Create a fingerprint of the configuration for report stamping
    pub fn fingerprint(&self) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();

        self.version.hash(&mut hasher);
        self.paths.patterns.hash(&mut hasher);
        self.paths.ignore_file.hash(&mut hasher);

        for id in RuleId::ALL {
            let settings = self.rule_settings(id);
            id.hash(&mut hasher);
            settings.enabled.hash(&mut hasher);
            settings.severity.hash(&mut hasher);
            settings.message.hash(&mut hasher);
        }

        self.allow.hash(&mut hasher);

        format!("{:x}", hasher.finish())
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn default_true() -> bool {
    true
}

fn default_severity() -> Severity {
    Severity::Error
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: NamingConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: NamingConfig::default(),
        }
    }

    pub fn add_path_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.paths.patterns.push(pattern.into());
        self
    }

    pub fn ignore_file(mut self, filename: impl Into<String>) -> Self {
        self.config.paths.ignore_file = Some(filename.into());
        self
    }

    pub fn allow_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.allow.push(pattern.into());
        self
    }

    pub fn disable_rule(mut self, id: RuleId) -> Self {
        self.settings_mut(id).enabled = false;
        self
    }

    pub fn rule_severity(mut self, id: RuleId, severity: Severity) -> Self {
        self.settings_mut(id).severity = severity;
        self
    }

    pub fn rule_message(mut self, id: RuleId, message: impl Into<String>) -> Self {
        self.settings_mut(id).message = Some(message.into());
        self
    }

    fn settings_mut(&mut self, id: RuleId) -> &mut RuleSettings {
        self.config.rules.entry(id).or_default()
    }

    /// Build the final configuration
    pub fn build(self) -> NamingResult<NamingConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
