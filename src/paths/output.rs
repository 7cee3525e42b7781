use std::path::Path;

use anyhow::{Result, anyhow};

use crate::config::ZipBundlerConfig;
use crate::models::ResolvedOutput;

use super::lexical_resolve;

/// Extension appended to the archive filename when none is configured.
const DEFAULT_EXTENSION: &str = "zip";

/// Compute the archive's output location and host asset-map key for one build.
///
/// `default_dir` is the host's absolute root output directory; it anchors
/// relative `path` overrides (which may traverse above it with `..`) and the
/// relative asset key. The base filename falls back from the configured
/// `filename` to the host's default to the final segment of the resolved
/// directory. A trailing `.zip` on the base is stripped before the configured
/// extension is appended, so user filenames never end up double-suffixed.
pub fn resolve_output(
    default_dir: &Path,
    default_filename: Option<&str>,
    config: &ZipBundlerConfig,
) -> Result<ResolvedOutput> {
    let root = lexical_resolve(default_dir, Path::new(""));

    let directory = match &config.path {
        Some(path) => lexical_resolve(path, &root),
        None => root.clone(),
    };

    let base_filename = config
        .filename
        .clone()
        .or_else(|| default_filename.map(str::to_owned))
        .or_else(|| {
            directory
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .ok_or_else(|| {
            anyhow!(
                "cannot derive an archive filename: none configured and {} has no final segment",
                directory.display()
            )
        })?;

    let extension = config.extension.as_deref().unwrap_or(DEFAULT_EXTENSION);
    // A base that is nothing but the suffix keeps it, matching basename semantics.
    let stem = match base_filename.strip_suffix(".zip") {
        Some(stem) if !stem.is_empty() => stem,
        _ => base_filename.as_str(),
    };
    let filename = format!("{stem}.{extension}");

    let file_path = directory.join(&filename);
    let relative = pathdiff::diff_paths(&file_path, &root).ok_or_else(|| {
        anyhow!(
            "archive path {} cannot be expressed relative to the output directory {}",
            file_path.display(),
            root.display()
        )
    })?;
    let asset_key = relative.to_string_lossy().replace('\\', "/");

    Ok(ResolvedOutput {
        directory,
        file_path,
        asset_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config() -> ZipBundlerConfig {
        ZipBundlerConfig::default()
    }

    #[test]
    fn host_default_filename_gains_the_archive_extension() {
        let resolved = resolve_output(Path::new("/out"), Some("bundle.js"), &config()).unwrap();

        assert_eq!(resolved.asset_key, "bundle.js.zip");
        assert_eq!(resolved.file_path, PathBuf::from("/out/bundle.js.zip"));
        assert_eq!(resolved.directory, PathBuf::from("/out"));
    }

    #[test]
    fn missing_filenames_fall_back_to_the_directory_basename() {
        let resolved = resolve_output(Path::new("/out/dist"), None, &config()).unwrap();
        assert_eq!(resolved.asset_key, "dist.zip");
    }

    #[test]
    fn configured_zip_filenames_are_not_double_suffixed() {
        let mut config = config();
        config.filename = Some("my_app.zip".into());

        let resolved = resolve_output(Path::new("/out"), Some("bundle.js"), &config).unwrap();
        assert_eq!(resolved.asset_key, "my_app.zip");
    }

    #[test]
    fn configured_bare_filenames_gain_the_extension() {
        let mut config = config();
        config.filename = Some("my_app".into());

        let resolved = resolve_output(Path::new("/out"), None, &config).unwrap();
        assert_eq!(resolved.asset_key, "my_app.zip");
    }

    #[test]
    fn non_zip_suffixes_pass_through_verbatim() {
        let mut config = config();
        config.extension = Some("ext".into());

        let resolved = resolve_output(Path::new("/out"), Some("bundle.js"), &config).unwrap();
        assert_eq!(resolved.asset_key, "bundle.js.ext");
    }

    #[test]
    fn custom_extensions_replace_a_zip_suffix() {
        let mut config = config();
        config.filename = Some("my_app.zip".into());
        config.extension = Some("pkg".into());

        let resolved = resolve_output(Path::new("/out"), None, &config).unwrap();
        assert_eq!(resolved.asset_key, "my_app.pkg");
    }

    #[test]
    fn relative_paths_resolve_under_the_host_root() {
        let mut config = config();
        config.path = Some(PathBuf::from("zip"));

        let resolved = resolve_output(Path::new("/out"), Some("bundle.js"), &config).unwrap();

        assert_eq!(resolved.directory, PathBuf::from("/out/zip"));
        assert_eq!(resolved.asset_key, "zip/bundle.js.zip");
    }

    #[test]
    fn parent_traversal_resolves_above_the_host_root() {
        let mut config = config();
        config.path = Some(PathBuf::from("../zip"));

        let resolved = resolve_output(Path::new("/out/bin"), Some("bundle.js"), &config).unwrap();

        assert_eq!(resolved.directory, PathBuf::from("/out/zip"));
        assert_eq!(resolved.asset_key, "../zip/bundle.js.zip");
    }

    #[test]
    fn absolute_paths_are_used_as_is_with_a_relative_key() {
        let mut config = config();
        config.path = Some(PathBuf::from("/elsewhere/archives"));

        let resolved = resolve_output(Path::new("/out"), Some("bundle.js"), &config).unwrap();

        assert_eq!(resolved.directory, PathBuf::from("/elsewhere/archives"));
        assert_eq!(resolved.file_path, PathBuf::from("/elsewhere/archives/bundle.js.zip"));
        assert_eq!(resolved.asset_key, "../elsewhere/archives/bundle.js.zip");
    }

    #[test]
    fn a_filename_that_is_only_the_suffix_keeps_it() {
        let mut config = config();
        config.filename = Some(".zip".into());

        let resolved = resolve_output(Path::new("/out"), None, &config).unwrap();
        assert_eq!(resolved.asset_key, ".zip.zip");
    }
}
