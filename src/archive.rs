//! Archive writer contract and the ZIP implementation behind it.

use std::io::{Cursor, Write};

use anyhow::{Context, Result};
use time::OffsetDateTime;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::models::{ArchiveOptions, EntryOptions};

/// Sink the bundler feeds selected assets into.
///
/// One builder instance is one single-use archive session: entries are
/// appended in call order and `finalize` consumes the session, returning the
/// complete archive. Whole-archive options are bound when the session is
/// opened. Entry paths must be relative.
pub trait ArchiveBuilder {
    /// Append one entry under a relative archive path.
    fn add_entry(&mut self, path: &str, content: &[u8], options: &EntryOptions) -> Result<()>;

    /// Close the archive and return the fully materialised byte stream.
    fn finalize(self) -> Result<Vec<u8>>
    where
        Self: Sized;
}

/// ZIP archive session writing to an in-memory buffer.
///
/// Entries are deflated unless compression is disabled per entry. The 64-bit
/// format can be forced per entry or, via [`ArchiveOptions`], for the whole
/// archive; a per-entry setting overrides the whole-archive one.
pub struct ZipArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    archive_options: ArchiveOptions,
}

impl ZipArchiveBuilder {
    /// Open a fresh session with the given whole-archive options.
    pub fn new(archive_options: ArchiveOptions) -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            archive_options,
        }
    }

    fn file_options(&self, options: &EntryOptions) -> Result<SimpleFileOptions> {
        let method = if options.compress.unwrap_or(true) {
            CompressionMethod::Deflated
        } else {
            CompressionMethod::Stored
        };

        let mut file_options = SimpleFileOptions::default()
            .compression_method(method)
            .large_file(options.zip64.or(self.archive_options.zip64).unwrap_or(false));

        if let Some(mode) = options.unix_mode {
            file_options = file_options.unix_permissions(mode);
        }

        if let Some(mtime) = options.mtime {
            let timestamp = OffsetDateTime::from_unix_timestamp(mtime)
                .with_context(|| format!("entry timestamp {mtime} is out of range"))?;
            let modified = DateTime::try_from(timestamp).with_context(|| {
                format!("entry timestamp {mtime} cannot be represented in a ZIP archive")
            })?;
            file_options = file_options.last_modified_time(modified);
        }

        Ok(file_options)
    }
}

impl ArchiveBuilder for ZipArchiveBuilder {
    fn add_entry(&mut self, path: &str, content: &[u8], options: &EntryOptions) -> Result<()> {
        let file_options = self.file_options(options)?;
        self.writer
            .start_file(path, file_options)
            .with_context(|| format!("failed to start archive entry {path}"))?;
        self.writer
            .write_all(content)
            .with_context(|| format!("failed to write archive entry {path}"))?;
        Ok(())
    }

    fn finalize(mut self) -> Result<Vec<u8>> {
        let cursor = self
            .writer
            .finish()
            .context("failed to finalise the archive")?;
        Ok(cursor.into_inner())
    }
}
