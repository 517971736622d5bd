//! Structured diagnostics for architecture-file problems.
//!
//! A [`Diagnostic`] pairs a [`Severity`] and a stable [`DiagnosticCode`] with a
//! message and a source [`Span`](kiln_source::Span). The [`DiagnosticSink`]
//! collects them during a run and the [`TerminalRenderer`] prints them in a
//! rustc-like layout; diagnostics also serialize to JSON via serde.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod label;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use label::{Label, LabelStyle};
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
