//! Line-oriented tokenizer for architecture files.
//!
//! The file is consumed one *logical* line at a time. A `#` starts a comment
//! that runs to the end of the physical line, and a trailing `\` joins the
//! next physical line onto the current one. Tokens are runs of
//! non-whitespace; lines with no tokens are skipped. The stream can be
//! rewound, which is how the loading pass re-reads the file after discovery.

use kiln_source::{FileId, Span};

/// A single whitespace-delimited token.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Token<'src> {
    /// The token text.
    pub text: &'src str,
    /// Byte range of the token in its file.
    pub span: Span,
    /// 1-based physical line the token sits on.
    pub line: u32,
}

/// The tokens of one logical line, continuation lines included.
#[derive(Clone, Debug)]
pub struct LogicalLine<'src> {
    tokens: Vec<Token<'src>>,
}

impl<'src> LogicalLine<'src> {
    /// The leading token, which names the statement.
    pub fn keyword(&self) -> &Token<'src> {
        // A logical line is only produced when it holds at least one token.
        &self.tokens[0]
    }

    /// Physical line of the leading token.
    pub fn line(&self) -> u32 {
        self.keyword().line
    }

    /// Every token on the line, keyword included.
    pub fn tokens(&self) -> &[Token<'src>] {
        &self.tokens
    }

    /// A cursor over the tokens that follow the keyword.
    pub fn cursor(&self) -> LineCursor<'_, 'src> {
        LineCursor {
            keyword: &self.tokens[0],
            rest: &self.tokens[1..],
            pos: 0,
        }
    }
}

/// Sequential reader over the operands of a logical line.
#[derive(Clone, Debug)]
pub struct LineCursor<'a, 'src> {
    keyword: &'a Token<'src>,
    rest: &'a [Token<'src>],
    pos: usize,
}

impl<'a, 'src> LineCursor<'a, 'src> {
    /// The statement keyword this cursor belongs to.
    pub fn keyword(&self) -> &'a Token<'src> {
        self.keyword
    }

    /// Consumes and returns the next operand.
    pub fn next(&mut self) -> Option<&'a Token<'src>> {
        let tok = self.rest.get(self.pos)?;
        self.pos += 1;
        Some(tok)
    }

    /// Returns the next operand without consuming it.
    pub fn peek(&self) -> Option<&'a Token<'src>> {
        self.rest.get(self.pos)
    }

    /// Returns `true` when every operand has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.rest.len()
    }

    /// The most recently consumed token, or the keyword if none was consumed.
    pub fn last(&self) -> &'a Token<'src> {
        match self.pos {
            0 => self.keyword,
            n => &self.rest[n - 1],
        }
    }

    /// Empty span just past the last consumed token, where a missing
    /// operand would have been.
    pub fn end_span(&self) -> Span {
        let last = self.last().span;
        Span::new(last.file, last.end, last.end)
    }
}

/// Rewindable stream of logical lines over one file's text.
pub struct TokenStream<'src> {
    source: &'src str,
    file: FileId,
    pos: usize,
    line: u32,
}

impl<'src> TokenStream<'src> {
    /// Creates a stream positioned at the start of `source`.
    pub fn new(source: &'src str, file: FileId) -> Self {
        Self {
            source,
            file,
            pos: 0,
            line: 1,
        }
    }

    /// The file every token span refers to.
    pub fn file(&self) -> FileId {
        self.file
    }

    /// Moves back to the start of the text.
    pub fn rewind(&mut self) {
        self.pos = 0;
        self.line = 1;
    }

    /// Number of the next physical line to be read.
    pub fn current_line(&self) -> u32 {
        self.line
    }

    /// Number of the last physical line in the file (0 for empty text).
    pub fn last_line(&self) -> u32 {
        let newlines = self.source.bytes().filter(|b| *b == b'\n').count() as u32;
        if self.source.is_empty() || self.source.ends_with('\n') {
            newlines
        } else {
            newlines + 1
        }
    }

    /// Empty span at the end of the text.
    pub fn end_span(&self) -> Span {
        let end = self.source.len() as u32;
        Span::new(self.file, end, end)
    }

    /// Reads the next non-empty logical line, or `None` at end of text.
    pub fn next_line(&mut self) -> Option<LogicalLine<'src>> {
        let mut tokens = Vec::new();
        while self.pos < self.source.len() {
            let continues = self.read_physical(&mut tokens);
            if !continues && !tokens.is_empty() {
                return Some(LogicalLine { tokens });
            }
        }
        if tokens.is_empty() {
            None
        } else {
            Some(LogicalLine { tokens })
        }
    }

    /// Tokenizes one physical line into `tokens` and reports whether it ends
    /// in a continuation marker.
    fn read_physical(&mut self, tokens: &mut Vec<Token<'src>>) -> bool {
        let source = self.source;
        let start = self.pos;
        let rest = &source[start..];
        let (raw, advance) = match rest.find('\n') {
            Some(nl) => (&rest[..nl], nl + 1),
            None => (rest, rest.len()),
        };
        let line = self.line;
        self.pos += advance;
        self.line += 1;

        let body = match raw.find('#') {
            Some(hash) => &raw[..hash],
            None => raw,
        };
        let trimmed = body.trim_end_matches(is_blank);
        let (body, continues) = match trimmed.strip_suffix('\\') {
            Some(joined) => (joined, true),
            None => (body, false),
        };

        let mut tok_start = None;
        for (i, c) in body.char_indices() {
            match (is_blank(c), tok_start) {
                (true, Some(s)) => {
                    tokens.push(self.token(body, start, s, i, line));
                    tok_start = None;
                }
                (false, None) => tok_start = Some(i),
                _ => {}
            }
        }
        if let Some(s) = tok_start {
            tokens.push(self.token(body, start, s, body.len(), line));
        }
        continues
    }

    fn token(&self, body: &'src str, base: usize, s: usize, e: usize, line: u32) -> Token<'src> {
        Token {
            text: &body[s..e],
            span: Span::new(self.file, (base + s) as u32, (base + e) as u32),
            line,
        }
    }
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0b' | '\x0c')
}
