//! Normalizes a user's file selection into a submission payload.
//!
//! Two selection styles exist: a folder (every file under it, of which only
//! the recordings with the expected extension are kept) and a single upload.
//! Nothing here looks at file contents; the backend validates those.

/// Extension of the recordings the backend accepts.
pub const DEFAULT_EXTENSION: &str = "csv";

/// How many file names a selection summary lists before "+N more".
pub const DEFAULT_PREVIEW_LIMIT: usize = 5;

/// A named byte blob picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub contents: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, contents: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            contents,
        }
    }

    pub fn size(&self) -> u64 {
        self.contents.len() as u64
    }
}

/// What a run is submitted with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSourcePayload {
    Single(SelectedFile),
    Multiple(Vec<SelectedFile>),
}

impl DataSourcePayload {
    pub fn files(&self) -> &[SelectedFile] {
        match self {
            DataSourcePayload::Single(file) => std::slice::from_ref(file),
            DataSourcePayload::Multiple(files) => files,
        }
    }

    pub fn len(&self) -> usize {
        self.files().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files().is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.files().iter().map(SelectedFile::size).sum()
    }

    pub fn summary(&self, preview_limit: usize) -> DataSourceSummary {
        let files = self.files();
        DataSourceSummary {
            count: files.len(),
            total_bytes: self.total_bytes(),
            preview: files
                .iter()
                .take(preview_limit)
                .map(|f| f.name.clone())
                .collect(),
            more: files.len().saturating_sub(preview_limit),
        }
    }

    /// One-line description for the "data source selected" banner.
    pub fn describe(&self) -> String {
        match self {
            DataSourcePayload::Single(file) => format!("File: {}", file.name),
            DataSourcePayload::Multiple(files) => format!("{} CSV files from folder", files.len()),
        }
    }
}

/// Display metadata for a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourceSummary {
    pub count: usize,
    pub total_bytes: u64,
    pub preview: Vec<String>,
    /// Files not listed in `preview`.
    pub more: usize,
}

impl DataSourceSummary {
    pub fn more_label(&self) -> Option<String> {
        (self.more > 0).then(|| format!("+{} more", self.more))
    }

    pub fn total_size_label(&self) -> String {
        format_size(self.total_bytes)
    }
}

/// Case-insensitive check that `name` ends in `.{extension}`.
/// `extension` may be given with or without the leading dot.
pub fn has_extension(name: &str, extension: &str) -> bool {
    let extension = extension.trim_start_matches('.');
    let suffix = format!(".{}", extension.to_lowercase());
    name.to_lowercase().ends_with(&suffix)
}

/// Folder-style selection. Keeps only files with `extension`, in selection
/// order. `None` when nothing survives.
pub fn resolve_folder(files: Vec<SelectedFile>, extension: &str) -> Option<DataSourcePayload> {
    let kept: Vec<SelectedFile> = files
        .into_iter()
        .filter(|f| has_extension(&f.name, extension))
        .collect();
    if kept.is_empty() {
        None
    } else {
        Some(DataSourcePayload::Multiple(kept))
    }
}

/// Single-file selection: exactly one file or nothing.
pub fn resolve_single(file: Option<SelectedFile>) -> Option<DataSourcePayload> {
    file.map(DataSourcePayload::Single)
}

/// `1023 B`, `1.5 KB`, `2.0 MB`.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod local {
    use std::path::Path;

    use tracing::info;
    use walkdir::WalkDir;

    use super::SelectedFile;
    use crate::error::ClientError;

    /// Every regular file under `dir`, sorted by path. Names are relative to
    /// `dir`, the way a browser folder picker reports them.
    pub fn read_folder(dir: &Path) -> Result<Vec<SelectedFile>, ClientError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| ClientError::Io(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry
                .path()
                .strip_prefix(dir)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .replace('\\', "/");
            let contents = std::fs::read(entry.path())?;
            files.push(SelectedFile::new(name, contents));
        }
        info!("Read {} files from {:?}", files.len(), dir);
        Ok(files)
    }

    pub fn read_file(path: &Path) -> Result<SelectedFile, ClientError> {
        let contents = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Ok(SelectedFile::new(name, contents))
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use local::{read_file, read_folder};
