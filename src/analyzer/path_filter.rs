//! Path filtering using .gitignore-style patterns
//!
//! Architectural Principle: Service Layer - PathFilter decides which files a run visits
//! - Patterns apply in order; the last matching pattern wins and `!` re-includes
//! - .namingignore files are honoured in every ancestor directory of a file

use crate::domain::violations::{NamingError, NamingResult};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Name of the per-directory ignore file when none is configured
pub const DEFAULT_IGNORE_FILE: &str = ".namingignore";

/// Patterns excluded unless the configuration says otherwise
pub const DEFAULT_EXCLUDE_PATTERNS: [&str; 4] = [
    "target/**",
    "**/node_modules/**",
    "**/.git/**",
    "**/*.generated.*",
];

/// Decides which files are analyzed
#[derive(Debug, Clone)]
pub struct PathFilter {
    patterns: Vec<FilterPattern>,
    /// Ignore file looked up in ancestor directories, if enabled
    ignore_filename: Option<String>,
}

#[derive(Debug, Clone)]
struct FilterPattern {
    glob: glob::Pattern,
    /// Pattern started with `!`
    reinclude: bool,
    /// Pattern started with `/` and only matches from the start of a path
    anchored: bool,
    shape: PatternShape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatternShape {
    /// `dir/`: matches directories only
    Directory,
    /// Contains a `/`: matched against the whole path
    Path,
    /// Bare name: matched against the file name
    FileName,
}

impl FilterPattern {
    fn parse(raw: &str) -> NamingResult<Self> {
        let (reinclude, body) = match raw.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        let shape = if body.ends_with('/') {
            PatternShape::Directory
        } else if body.contains('/') {
            PatternShape::Path
        } else {
            PatternShape::FileName
        };

        let glob_str = body.trim_start_matches('/').trim_end_matches('/');
        let glob = glob::Pattern::new(glob_str)
            .map_err(|e| NamingError::pattern(format!("Invalid pattern '{raw}': {e}")))?;

        Ok(Self {
            glob,
            reinclude,
            anchored: body.starts_with('/'),
            shape,
        })
    }

    fn matches(&self, path: &Path) -> bool {
        match self.shape {
            PatternShape::Directory => path.is_dir() && self.matches_path_suffix(path),
            PatternShape::Path => self.matches_path_suffix(path),
            PatternShape::FileName => path
                .file_name()
                .map(|name| self.glob.matches(&name.to_string_lossy()))
                .unwrap_or(false),
        }
    }

    /// Unanchored patterns may match any trailing run of components
    fn matches_path_suffix(&self, path: &Path) -> bool {
        if self.anchored {
            return self.glob.matches_path(path);
        }

        let components: Vec<_> = path.components().collect();
        (0..components.len()).any(|start| {
            let suffix: PathBuf = components[start..].iter().collect();
            self.glob.matches_path(&suffix)
        })
    }
}

impl PathFilter {
    pub fn new(patterns: Vec<String>, ignore_filename: Option<String>) -> NamingResult<Self> {
        let patterns = patterns
            .iter()
            .map(|raw| FilterPattern::parse(raw))
            .collect::<NamingResult<Vec<_>>>()?;

        Ok(Self {
            patterns,
            ignore_filename,
        })
    }

    /// Filter excluding build output and VCS metadata
    pub fn with_defaults() -> NamingResult<Self> {
        Self::new(
            DEFAULT_EXCLUDE_PATTERNS.iter().map(|p| p.to_string()).collect(),
            Some(DEFAULT_IGNORE_FILE.to_string()),
        )
    }

    pub fn add_pattern(&mut self, pattern: &str) -> NamingResult<()> {
        self.patterns.push(FilterPattern::parse(pattern)?);
        Ok(())
    }

    /// Whether `path` passes the configured patterns and ignore files
    pub fn should_analyze<P: AsRef<Path>>(&self, path: P) -> NamingResult<bool> {
        let path = path.as_ref();

        if !last_match_includes(&self.patterns, path, true) {
            return Ok(false);
        }

        match &self.ignore_filename {
            Some(ignore_filename) => Ok(!self.is_ignored_by_files(path, ignore_filename)?),
            None => Ok(true),
        }
    }

    fn is_ignored_by_files(&self, path: &Path, ignore_filename: &str) -> NamingResult<bool> {
        let mut ignored = false;

        // Outermost directories first so that closer ignore files win
        let ancestors: Vec<&Path> = path.ancestors().skip(1).collect();
        for dir in ancestors.into_iter().rev() {
            let ignore_file = dir.join(ignore_filename);
            if !ignore_file.is_file() {
                continue;
            }

            let Ok(relative) = path.strip_prefix(dir) else {
                continue;
            };
            let patterns = load_ignore_file(&ignore_file)?;
            ignored = !last_match_includes(&patterns, relative, !ignored);
        }

        Ok(ignored)
    }

    /// Every file under `root` that should be analyzed, in walk order
    pub fn find_files<P: AsRef<Path>>(&self, root: P) -> NamingResult<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root.as_ref())
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if entry.file_type().is_file() && self.should_analyze(path)? {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }

    pub fn filter_paths<P: AsRef<Path>>(&self, paths: &[P]) -> NamingResult<Vec<PathBuf>> {
        let mut filtered = Vec::new();
        for path in paths {
            if self.should_analyze(path)? {
                filtered.push(path.as_ref().to_path_buf());
            }
        }
        Ok(filtered)
    }
}

/// Verdict of the last pattern matching `path`, or `default` if none match
fn last_match_includes(patterns: &[FilterPattern], path: &Path, default: bool) -> bool {
    patterns
        .iter()
        .rev()
        .find(|pattern| pattern.matches(path))
        .map(|pattern| pattern.reinclude)
        .unwrap_or(default)
}

fn load_ignore_file(path: &Path) -> NamingResult<Vec<FilterPattern>> {
    let content = fs::read_to_string(path).map_err(|e| {
        NamingError::config(format!(
            "Failed to read ignore file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let mut patterns = Vec::new();
    for line in content.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match FilterPattern::parse(line) {
            Ok(pattern) => patterns.push(pattern),
            Err(e) => tracing::warn!("Skipping pattern in {}: {}", path.display(), e),
        }
    }

    Ok(patterns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_basic_exclusions() {
        let filter = PathFilter::new(vec!["target/**".to_string(), "*.md".to_string()], None).unwrap();

        assert!(filter.should_analyze("src/lib.rs").unwrap());
        assert!(!filter.should_analyze("target/debug/lib.rs").unwrap());
        assert!(!filter.should_analyze("README.md").unwrap());
    }

    #[test]
    fn test_reinclude_overrides_earlier_exclusion() {
        let filter = PathFilter::new(
            vec!["vendor/**".to_string(), "!vendor/ours/**".to_string()],
            None,
        )
        .unwrap();

        assert!(!filter.should_analyze("vendor/theirs/Foo.h").unwrap());
        assert!(filter.should_analyze("vendor/ours/Foo.h").unwrap());
    }

    #[test]
    fn test_ignore_file_in_ancestor() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("legacy")).unwrap();
        fs::write(root.join(DEFAULT_IGNORE_FILE), "legacy/**\n# comment\n!legacy/keep.m\n").unwrap();
        fs::write(root.join("src/lib.rs"), "").unwrap();
        fs::write(root.join("legacy/old.m"), "").unwrap();
        fs::write(root.join("legacy/keep.m"), "").unwrap();

        let filter = PathFilter::new(vec![], Some(DEFAULT_IGNORE_FILE.to_string())).unwrap();

        assert!(filter.should_analyze(root.join("src/lib.rs")).unwrap());
        assert!(!filter.should_analyze(root.join("legacy/old.m")).unwrap());
        assert!(filter.should_analyze(root.join("legacy/keep.m")).unwrap());

        let found = filter.find_files(root).unwrap();
        assert!(found.contains(&root.join("src/lib.rs")));
        assert!(!found.contains(&root.join("legacy/old.m")));
    }

    #[test]
    fn test_unanchored_patterns_match_below_walk_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("target/debug")).unwrap();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("target/debug/gen.rs"), "").unwrap();
        fs::write(root.join("src/main.rs"), "").unwrap();

        let filter = PathFilter::new(vec!["target/**".to_string()], None).unwrap();
        let found = filter.find_files(root).unwrap();

        assert_eq!(found, vec![root.join("src/main.rs")]);
    }

    #[test]
    fn test_anchored_patterns_match_from_start() {
        let filter = PathFilter::new(vec!["/build/**".to_string()], None).unwrap();
        assert!(!filter.should_analyze("build/out.rs").unwrap());
        assert!(filter.should_analyze("src/build/out.rs").unwrap());
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        assert!(PathFilter::new(vec!["[invalid".to_string()], None).is_err());
    }

    #[test]
    fn test_default_filter() {
        let filter = PathFilter::with_defaults().unwrap();
        assert!(!filter.should_analyze("target/debug/build.rs").unwrap());
        assert!(filter.should_analyze("src/lib.rs").unwrap());
    }
}
