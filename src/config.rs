//! Loading of the extension mapping and entry filtering rules.
//!
//! The mapping lives in a JSON document whose keys are category labels and
//! whose values are lists of extensions (without the leading dot):
//!
//! ```json
//! {
//!     "Documents": ["pdf", "docx"],
//!     "Images": ["png", "jpg"]
//! }
//! ```
//!
//! Unless a path is given explicitly, the document is read from
//! `extensions.json` next to the running executable. The working directory is
//! never consulted.

use crate::file_category::ExtensionMapping;
use glob::Pattern;
use serde_json::{Map, Value};
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File name of the mapping document.
pub const CONFIG_FILE_NAME: &str = "extensions.json";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found at the resolved path.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// The document is not valid JSON or its top level is not an object.
    #[error("Invalid configuration in {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A category value is not an array of strings.
    #[error("Category '{category}' in {} must be an array of strings", .path.display())]
    InvalidCategory { path: PathBuf, category: String },

    /// IO error while reading the configuration file.
    #[error("IO error reading configuration {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The directory of the running executable could not be determined.
    #[error("Cannot locate the running executable: {0}")]
    ExecutableLocation(#[source] io::Error),

    /// Invalid glob pattern given as an exclusion rule.
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidGlobPattern { pattern: String, reason: String },
}

/// Returns the default location of the mapping document: `extensions.json`
/// in the directory that contains the running executable.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let exe = std::env::current_exe().map_err(ConfigError::ExecutableLocation)?;
    let dir = exe.parent().ok_or_else(|| {
        ConfigError::ExecutableLocation(io::Error::new(
            io::ErrorKind::NotFound,
            "executable has no parent directory",
        ))
    })?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

impl ExtensionMapping {
    /// Load the mapping from `config_path`, or from [`default_config_path`]
    /// when none is given.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if the file does not exist.
    /// Returns `ConfigError::ConfigParse` if the content is not a JSON object.
    /// Returns `ConfigError::InvalidCategory` if a value is not a string array.
    /// Returns `ConfigError::Io` if the file cannot be read.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match config_path {
            Some(path) => path.to_path_buf(),
            None => default_config_path()?,
        };
        debug!(path = %path.display(), "loading extension mapping");
        Self::load_from_file(&path)
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json_str(&content, path)
    }

    /// Parse a mapping document. `origin` is only used in error messages.
    pub fn from_json_str(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        let document: Map<String, Value> =
            serde_json::from_str(content).map_err(|source| ConfigError::ConfigParse {
                path: origin.to_path_buf(),
                source,
            })?;

        let pairs = document
            .into_iter()
            .map(|(category, value)| match serde_json::from_value::<Vec<String>>(value) {
                Ok(extensions) => Ok((category, extensions)),
                Err(_) => Err(ConfigError::InvalidCategory {
                    path: origin.to_path_buf(),
                    category,
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_pairs(pairs))
    }
}

/// Compiled exclusion rules applied to directory entries before organizing.
///
/// Patterns are matched against the entry name only (not the full path).
#[derive(Debug, Clone, Default)]
pub struct ExcludeFilter {
    patterns: Vec<Pattern>,
}

impl ExcludeFilter {
    /// Compile a list of glob patterns.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidGlobPattern` for the first pattern that
    /// does not compile.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Pattern::new(pattern).map_err(|e| ConfigError::InvalidGlobPattern {
                    pattern: pattern.to_string(),
                    reason: e.msg.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// True if the entry should be left alone.
    pub fn is_excluded(&self, entry_name: &OsStr) -> bool {
        let name = entry_name.to_string_lossy();
        self.patterns.iter().any(|pattern| pattern.matches(&name))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_preserves_declaration_order() {
        let json = r#"{"Zeta": ["z"], "Alpha": ["a"], "Mid": ["m"]}"#;
        let mapping = ExtensionMapping::from_json_str(json, Path::new("test.json")).unwrap();

        let names: Vec<_> = mapping.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(CONFIG_FILE_NAME);

        let result = ExtensionMapping::load(Some(&path));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(p)) if p == path));
    }

    #[test]
    fn test_load_directory_path_is_io_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::create_dir(&path).unwrap();

        let result = ExtensionMapping::load(Some(&path));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_from_explicit_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("custom.json");
        fs::write(&path, r#"{"Documents": ["pdf", "docx"]}"#).unwrap();

        let mapping = ExtensionMapping::load(Some(&path)).unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.folder_name("cv.docx"), "documents");
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let result = ExtensionMapping::from_json_str("{not json", Path::new("bad.json"));
        assert!(matches!(result, Err(ConfigError::ConfigParse { .. })));
    }

    #[test]
    fn test_top_level_array_is_parse_error() {
        let result = ExtensionMapping::from_json_str(r#"["png"]"#, Path::new("bad.json"));
        assert!(matches!(result, Err(ConfigError::ConfigParse { .. })));
    }

    #[test]
    fn test_non_array_category_is_rejected() {
        let json = r#"{"Images": ["png"], "Broken": "pdf"}"#;
        let result = ExtensionMapping::from_json_str(json, Path::new("bad.json"));
        match result {
            Err(ConfigError::InvalidCategory { category, .. }) => assert_eq!(category, "Broken"),
            other => panic!("expected InvalidCategory, got {:?}", other),
        }
    }

    #[test]
    fn test_default_config_path_is_next_to_executable() {
        let path = default_config_path().unwrap();
        let exe_dir = std::env::current_exe().unwrap().parent().unwrap().to_path_buf();
        assert_eq!(path, exe_dir.join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_exclude_filter_matches_entry_name() {
        let filter = ExcludeFilter::new(&["*.tmp", ".*"]).unwrap();
        assert!(filter.is_excluded(OsStr::new("download.tmp")));
        assert!(filter.is_excluded(OsStr::new(".DS_Store")));
        assert!(!filter.is_excluded(OsStr::new("photo.png")));
    }

    #[test]
    fn test_invalid_glob_pattern() {
        let result = ExcludeFilter::new(&["[unclosed"]);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidGlobPattern { ref pattern, .. }) if pattern == "[unclosed"
        ));
    }

    #[test]
    fn test_empty_filter_excludes_nothing() {
        let filter = ExcludeFilter::default();
        assert!(filter.is_empty());
        assert!(!filter.is_excluded(OsStr::new("anything")));
    }
}
