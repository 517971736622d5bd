//! Labels annotating source spans within a diagnostic.

use kiln_source::Span;
use serde::{Deserialize, Serialize};

/// How a label is drawn under the source line.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum LabelStyle {
    /// The main location (`^^^`).
    Primary,
    /// Related context (`---`).
    Secondary,
}

/// A span with an explanatory message.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Label {
    /// The annotated span.
    pub span: Span,
    /// Text printed next to the underline.
    pub message: String,
    /// Primary or secondary.
    pub style: LabelStyle,
}

impl Label {
    /// Creates a primary label.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            style: LabelStyle::Primary,
        }
    }

    /// Creates a secondary label.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            style: LabelStyle::Secondary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_style() {
        assert_eq!(
            Label::primary(Span::DUMMY, "expected a side").style,
            LabelStyle::Primary
        );
        assert_eq!(
            Label::secondary(Span::DUMMY, "class first used here").style,
            LabelStyle::Secondary
        );
    }
}
