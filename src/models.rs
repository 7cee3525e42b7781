//! Data structures shared between selection, archiving and output resolution.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Per-entry options forwarded to the archive writer.
///
/// Selection and output resolution pass the record through uninterpreted; only
/// the archive writer gives the fields meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntryOptions {
    /// Modification timestamp recorded for the entry, in seconds since the
    /// unix epoch.
    pub mtime: Option<i64>,
    /// POSIX file mode recorded for the entry (e.g. `0o644`).
    pub unix_mode: Option<u32>,
    /// Whether entry content is deflated; `false` stores the bytes verbatim.
    pub compress: Option<bool>,
    /// Force the 64-bit archive format for this entry.
    pub zip64: Option<bool>,
}

/// Whole-archive options bound to an archive writer session when it is opened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArchiveOptions {
    /// Force the 64-bit archive format for every entry in the archive.
    pub zip64: Option<bool>,
}

/// A build asset that passed filtering, paired with its in-archive path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedAsset {
    /// Asset name as keyed in the host build's asset map.
    pub name: String,
    /// Relative path the content is stored under inside the archive.
    pub archive_path: String,
}

/// Output location derived for one build invocation and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutput {
    /// Absolute directory the archive lands in when the host flushes assets.
    pub directory: PathBuf,
    /// Absolute path of the archive file itself.
    pub file_path: PathBuf,
    /// Key the archive is registered under in the host asset map, always
    /// relative to the host's root output directory.
    pub asset_key: String,
}
