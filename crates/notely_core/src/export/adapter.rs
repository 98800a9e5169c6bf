//! Export file writer and share hand-off.

use super::render::{render, ExportFormat};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Base name used when a note has no title.
pub const FALLBACK_FILE_STEM: &str = "Note";
/// User-visible failure message.
pub const EXPORT_FAILED_MESSAGE: &str = "Failed to export note";

/// Platform share sheet.
pub trait ShareSurface {
    /// Whether a share mechanism exists on this host.
    fn is_available(&self) -> bool;
    /// Offers `path` to the user.
    fn share(&self, path: &Path) -> Result<(), String>;
}

/// Host without a share sheet; exports are only saved.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShareSurface;

impl ShareSurface for NoShareSurface {
    fn is_available(&self) -> bool {
        false
    }

    fn share(&self, _path: &Path) -> Result<(), String> {
        Err("no share surface available".to_string())
    }
}

/// Export failure cause, logged before it is turned into an outcome.
#[derive(Debug)]
pub enum ExportError {
    Io { path: PathBuf, source: std::io::Error },
    Share { path: PathBuf, message: String },
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to write `{}`: {source}", path.display())
            }
            Self::Share { path, message } => {
                write!(f, "failed to share `{}`: {message}", path.display())
            }
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Share { .. } => None,
        }
    }
}

/// Result of one export request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// File written and handed to the share surface.
    Shared(PathBuf),
    /// File written; no share surface, so the location is reported.
    Saved(PathBuf),
    /// Write or share failed.
    Failed(String),
}

impl ExportOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    /// One-line message for the UI.
    pub fn message(&self) -> String {
        match self {
            Self::Shared(path) => format!("Note shared from {}", path.display()),
            Self::Saved(path) => format!("Note saved to {}", path.display()),
            Self::Failed(message) => message.clone(),
        }
    }
}

/// Writes rendered notes into an app-private directory and shares them.
#[derive(Debug)]
pub struct ExportAdapter<S: ShareSurface> {
    export_dir: PathBuf,
    share: S,
}

impl<S: ShareSurface> ExportAdapter<S> {
    pub fn new(export_dir: impl Into<PathBuf>, share: S) -> Self {
        Self {
            export_dir: export_dir.into(),
            share,
        }
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Target path for a note title in the given format.
    pub fn file_path(&self, title: &str, format: ExportFormat) -> PathBuf {
        self.export_dir
            .join(format!("{}.{}", file_stem(title), format.extension()))
    }

    /// Renders, writes and shares one note. Never returns an error.
    pub fn export(&self, title: &str, content: &str, format: ExportFormat) -> ExportOutcome {
        match self.try_export(title, content, format) {
            Ok(outcome) => {
                info!(
                    "event=note_export module=export status=ok format={} shared={}",
                    format.extension(),
                    matches!(outcome, ExportOutcome::Shared(_))
                );
                outcome
            }
            Err(err) => {
                error!(
                    "event=note_export module=export status=error format={} error={}",
                    format.extension(),
                    err
                );
                ExportOutcome::Failed(EXPORT_FAILED_MESSAGE.to_string())
            }
        }
    }

    fn try_export(
        &self,
        title: &str,
        content: &str,
        format: ExportFormat,
    ) -> Result<ExportOutcome, ExportError> {
        let path = self.file_path(title, format);
        let rendered = render(format, title, content);

        std::fs::create_dir_all(&self.export_dir).map_err(|source| ExportError::Io {
            path: self.export_dir.clone(),
            source,
        })?;
        std::fs::write(&path, rendered).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;

        if !self.share.is_available() {
            return Ok(ExportOutcome::Saved(path));
        }
        self.share
            .share(&path)
            .map_err(|message| ExportError::Share {
                path: path.clone(),
                message,
            })?;
        Ok(ExportOutcome::Shared(path))
    }
}

/// File stem for a title: the title itself, or `Note` when empty. Path
/// separators are replaced so the file cannot escape the export directory.
pub fn file_stem(title: &str) -> String {
    if title.is_empty() {
        return FALLBACK_FILE_STEM.to_string();
    }
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '-',
            other => other,
        })
        .collect();
    if cleaned == "." || cleaned == ".." {
        return FALLBACK_FILE_STEM.to_string();
    }
    cleaned
}
