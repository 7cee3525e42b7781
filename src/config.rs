//! Bundler configuration: construction-time settings, eager validation and
//! the JSON file form.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::models::{ArchiveOptions, EntryOptions};
use crate::selection::FilterPattern;

/// Transform applied to an asset's name to derive its in-archive path.
///
/// The mapper receives the original asset name, before the prefix is applied,
/// and returns a replacement relative path.
pub type PathMapper = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Bundler configuration, immutable for the lifetime of the plugin.
///
/// All fields are optional; the zero-value configuration packages every asset
/// under its original name into `<host default filename>.zip`.
#[derive(Default)]
pub struct ZipBundlerConfig {
    /// Assets to package; unset selects every asset.
    pub include: Option<FilterPattern>,
    /// Assets to drop, even when `include` matches them.
    pub exclude: Option<FilterPattern>,
    /// Relative directory every entry is nested under inside the archive.
    /// Rejected at construction when it carries a root marker.
    pub path_prefix: Option<String>,
    /// Mapper from asset name to in-archive path; identity when unset.
    pub path_mapper: Option<PathMapper>,
    /// Output directory override, resolved against the host root when
    /// relative, used as-is when absolute.
    pub path: Option<PathBuf>,
    /// Output filename override.
    pub filename: Option<String>,
    /// Archive filename extension, `zip` when unset.
    pub extension: Option<String>,
    /// Per-entry options forwarded to the archive writer.
    pub entry_options: EntryOptions,
    /// Whole-archive options forwarded to the archive writer.
    pub archive_options: ArchiveOptions,
}

impl ZipBundlerConfig {
    /// Check construction-time invariants.
    ///
    /// An absolute `path_prefix` is rejected here, before any build runs:
    /// in-archive paths are always relative, so such a prefix could never be
    /// honoured.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(prefix) = &self.path_prefix {
            if Path::new(prefix).has_root() {
                return Err(ConfigError::AbsolutePathPrefix {
                    prefix: prefix.clone(),
                });
            }
        }
        Ok(())
    }

    /// Load configuration from a JSON file if present.
    ///
    /// A missing file yields the default configuration so hosts can ship an
    /// optional config file. String patterns from the file follow the
    /// exact/directory-form rules; regular-expression patterns and the path
    /// mapper can only be supplied programmatically.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        let file: ConfigFile =
            serde_json::from_str(&contents).map_err(|err| ConfigError::Parse {
                path: path.to_path_buf(),
                source: err,
            })?;
        let config = Self::from(file);
        config.validate()?;
        Ok(config)
    }
}

impl fmt::Debug for ZipBundlerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZipBundlerConfig")
            .field("include", &self.include)
            .field("exclude", &self.exclude)
            .field("path_prefix", &self.path_prefix)
            .field("path_mapper", &self.path_mapper.as_ref().map(|_| "<fn>"))
            .field("path", &self.path)
            .field("filename", &self.filename)
            .field("extension", &self.extension)
            .field("entry_options", &self.entry_options)
            .field("archive_options", &self.archive_options)
            .finish()
    }
}

/// JSON file layout for the configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ConfigFile {
    include: Option<PatternField>,
    exclude: Option<PatternField>,
    path_prefix: Option<String>,
    path: Option<PathBuf>,
    filename: Option<String>,
    extension: Option<String>,
    file_options: EntryOptions,
    zip_options: ArchiveOptions,
}

/// One pattern string or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PatternField {
    One(String),
    Many(Vec<String>),
}

impl From<PatternField> for FilterPattern {
    fn from(field: PatternField) -> Self {
        match field {
            PatternField::One(rule) => FilterPattern::Name(rule),
            PatternField::Many(rules) => {
                FilterPattern::Any(rules.into_iter().map(FilterPattern::Name).collect())
            }
        }
    }
}

impl From<ConfigFile> for ZipBundlerConfig {
    fn from(file: ConfigFile) -> Self {
        Self {
            include: file.include.map(Into::into),
            exclude: file.exclude.map(Into::into),
            path_prefix: file.path_prefix,
            path_mapper: None,
            path: file.path,
            filename: file.filename,
            extension: file.extension,
            entry_options: file.file_options,
            archive_options: file.zip_options,
        }
    }
}

/// Errors raised while constructing the bundler configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The configured path prefix carried a root marker.
    AbsolutePathPrefix {
        /// The offending prefix value.
        prefix: String,
    },
    /// Failed to read the configuration file from disk.
    Io {
        /// Path that caused the error.
        path: PathBuf,
        /// Source I/O error.
        source: std::io::Error,
    },
    /// Failed to parse the JSON configuration file.
    Parse {
        /// Path that caused the error.
        path: PathBuf,
        /// Source parse error.
        source: serde_json::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AbsolutePathPrefix { prefix } => {
                write!(f, "\"pathPrefix\" must be a relative path, got {prefix:?}")
            }
            Self::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::AbsolutePathPrefix { .. } => None,
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}
