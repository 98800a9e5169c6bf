//! Note export to text, markdown, and HTML files.
//!
//! # Responsibility
//! - Render a note's title/content into one of three encodings.
//! - Write the rendered file and hand it to the platform share surface.
//!
//! # Invariants
//! - Export never raises: every failure becomes an `ExportOutcome::Failed`.
//! - Export files stay inside the configured export directory.

pub mod adapter;
pub mod render;

pub use adapter::{ExportAdapter, ExportError, ExportOutcome, NoShareSurface, ShareSurface};
pub use render::{render, ExportFormat};
