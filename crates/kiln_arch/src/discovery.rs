//! First pass: learn how many pin classes the file declares.
//!
//! Only `inpin`/`outpin` statements are inspected; everything else, and the
//! rest of every pin statement, is skipped. The result is a [`ClassSchema`]
//! that sizes the tables the loading pass fills.

use crate::error::ArchError;
use crate::field::Field;
use crate::lexer::TokenStream;
use crate::scalar::parse_class_id;
use kiln_source::Span;
use std::collections::BTreeMap;

/// Pin-class sizes learned by the discovery pass.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ClassSchema {
    pins_per_class: Vec<u32>,
}

impl ClassSchema {
    /// Builds a schema directly from per-class pin counts.
    pub fn from_counts(pins_per_class: Vec<u32>) -> Self {
        Self { pins_per_class }
    }

    /// Number of classes; IDs run from 0 to `num_classes() - 1`.
    pub fn num_classes(&self) -> usize {
        self.pins_per_class.len()
    }

    /// Pins declared with class `class`, or 0 for an unknown class.
    pub fn pins_in_class(&self, class: u32) -> u32 {
        self.pins_per_class
            .get(class as usize)
            .copied()
            .unwrap_or(0)
    }

    /// Per-class pin counts indexed by class ID.
    pub fn pins_per_class(&self) -> &[u32] {
        &self.pins_per_class
    }

    /// Total pins on the block.
    pub fn total_pins(&self) -> usize {
        self.pins_per_class.iter().map(|n| *n as usize).sum()
    }
}

struct Seen {
    count: u32,
    line: u32,
    span: Span,
}

/// Scans the whole stream and returns the class schema.
///
/// Fails on a malformed `class:` clause or when the declared IDs are not
/// contiguous from zero. The stream is left at its end.
pub fn discover_classes(stream: &mut TokenStream<'_>) -> Result<ClassSchema, ArchError> {
    let mut seen: BTreeMap<u32, Seen> = BTreeMap::new();

    while let Some(line) = stream.next_line() {
        let field = match line.keyword().text {
            "inpin" => Field::Inpin,
            "outpin" => Field::Outpin,
            _ => continue,
        };
        let mut cursor = line.cursor();
        let (class, tok) = parse_class_id(&mut cursor, field)?;
        seen.entry(class)
            .and_modify(|s| s.count += 1)
            .or_insert(Seen {
                count: 1,
                line: tok.line,
                span: tok.span,
            });
    }

    // Keys are sorted, so the first key that differs from its position is
    // the next declared class above the smallest gap.
    for (expected, (&class, first)) in seen.iter().enumerate() {
        let expected = expected as u32;
        if class != expected {
            return Err(ArchError::ClassIdGap {
                class: expected,
                line: first.line,
                span: first.span,
            });
        }
    }

    let schema = ClassSchema::from_counts(seen.values().map(|s| s.count).collect());
    log::debug!(
        "discovered {} pin classes, {} pins",
        schema.num_classes(),
        schema.total_pins()
    );
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_source::FileId;

    fn discover(src: &str) -> Result<ClassSchema, ArchError> {
        let mut stream = TokenStream::new(src, FileId::from_raw(0));
        discover_classes(&mut stream)
    }

    #[test]
    fn counts_pins_per_class() {
        let src = "\
io_rat 2
inpin class: 0 bottom
inpin class: 0 left
outpin class: 1 top
inpin class: 2 \\
    right
inpin class: 0 top
";
        let schema = discover(src).unwrap();
        assert_eq!(schema.num_classes(), 3);
        assert_eq!(schema.pins_per_class(), &[3, 1, 1]);
        assert_eq!(schema.total_pins(), 5);
        assert_eq!(schema.pins_in_class(7), 0);
    }

    #[test]
    fn classes_may_appear_out_of_order() {
        let src = "outpin class: 1 top\ninpin class: 0 bottom\n";
        assert_eq!(discover(src).unwrap().pins_per_class(), &[1, 1]);
    }

    #[test]
    fn gap_is_reported_at_next_declared_class() {
        let src = "inpin class: 0 top\n\noutpin class: 2 left\ninpin class: 3 top\n";
        match discover(src).unwrap_err() {
            ArchError::ClassIdGap { class, line, .. } => {
                assert_eq!(class, 1);
                assert_eq!(line, 3);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_class_zero_is_a_gap() {
        let src = "inpin class: 1 top\n";
        assert!(matches!(
            discover(src).unwrap_err(),
            ArchError::ClassIdGap { class: 0, .. }
        ));
    }

    #[test]
    fn no_pins_gives_empty_schema() {
        let schema = discover("io_rat 2\nsubblock_lut_size 4\n").unwrap();
        assert_eq!(schema.num_classes(), 0);
        assert_eq!(schema.total_pins(), 0);
    }

    #[test]
    fn malformed_class_clause_fails() {
        assert!(matches!(
            discover("inpin top").unwrap_err(),
            ArchError::UnknownKeyword { .. }
        ));
        assert!(matches!(
            discover("inpin class: x top").unwrap_err(),
            ArchError::InvalidNumber { .. }
        ));
    }

    #[test]
    fn side_tokens_are_not_checked() {
        let schema = discover("inpin class: 0 sideways\n").unwrap();
        assert_eq!(schema.num_classes(), 1);
    }
}
