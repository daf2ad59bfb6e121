//! Character cursor over configuration source
//!
//! Walks the input one code point at a time, tracking line and column, and
//! exposes the primitive scans the directive parser is built from: words,
//! quoted strings, whitespace and comment skipping. One code point of
//! lookahead is all the grammar needs.

/// Characters that terminate an unquoted word
fn is_word_break(c: char) -> bool {
    c.is_whitespace() || matches!(c, ';' | '{' | '}' | '#')
}

/// Cursor over source text
pub struct Cursor {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Cursor {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Current code point, `None` at end of input
    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// 1-based line of the current position
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based column of the current position
    pub fn column(&self) -> usize {
        self.column
    }

    /// Consume one code point
    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.pos += 1;
        Some(c)
    }

    /// Skip whitespace; `\r` is whitespace, so CRLF input needs no special case
    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_whitespace()) {
            self.advance();
        }
    }

    /// Skip a `#` comment up to (not including) the end of line
    pub fn skip_comment(&mut self) {
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }
    }

    /// Skip any run of whitespace and comments
    pub fn skip_whitespace_and_comments(&mut self) {
        loop {
            self.skip_whitespace();
            if self.peek() == Some('#') {
                self.skip_comment();
            } else {
                break;
            }
        }
    }

    /// Greedily consume a word: everything up to whitespace or `; { } #`
    pub fn parse_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if is_word_break(c) {
                break;
            }
            word.push(c);
            self.advance();
        }
        word
    }

    /// Consume a quoted string up to the matching unescaped quote
    ///
    /// A backslash includes the next character literally, whatever it is; no
    /// other escape semantics. An unterminated string yields what accumulated
    /// before end of input.
    pub fn parse_quoted_string(&mut self, quote: char) -> String {
        self.advance(); // opening quote
        let mut value = String::new();
        let mut escaped = false;

        while let Some(c) = self.peek() {
            if escaped {
                value.push(c);
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                self.advance(); // closing quote
                break;
            } else {
                value.push(c);
            }
            self.advance();
        }

        value
    }

    /// Parse one value token, quoted or bare
    pub fn parse_value(&mut self) -> String {
        self.skip_whitespace();
        match self.peek() {
            Some(q @ ('"' | '\'')) => self.parse_quoted_string(q),
            _ => self.parse_word(),
        }
    }
}
