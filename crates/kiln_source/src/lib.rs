//! Source text management and location tracking for architecture files.
//!
//! [`SourceDb`] owns the text of every loaded file. [`FileId`] and [`Span`]
//! locate tokens inside that text, and [`ResolvedSpan`] turns a span into the
//! `path:line:col` form used in diagnostics.

#![warn(missing_docs)]

pub mod file_id;
pub mod resolved_span;
pub mod source_db;
pub mod source_file;
pub mod span;

pub use file_id::FileId;
pub use resolved_span::ResolvedSpan;
pub use source_db::SourceDb;
pub use source_file::SourceFile;
pub use span::Span;
