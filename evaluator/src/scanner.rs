use std::ops::Range;

/// Walks over the characters of an expression.
/// Positions are character indices, not byte offsets.
pub struct Scanner {
    values: Vec<char>,
    /// the index of the *next* character to be consumed
    index: usize,
}

impl Scanner {
    pub fn new(text: &str) -> Scanner {
        Scanner {
            values: text.chars().collect(),
            index: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn peek(&self) -> Option<char> {
        self.values.get(self.index).copied()
    }

    pub fn eof(&self) -> bool {
        self.index >= self.values.len()
    }

    pub fn advance(&mut self) -> Option<char> {
        let value = self.peek()?;
        self.index += 1;
        Some(value)
    }

    /// Consumes the next character if it is `expected`.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.index += 1;
        }
    }

    /// Digits with an optional fractional part, like `12`, `2.5` or `.5`
    pub fn consume_number(&mut self) -> String {
        let range = self.consume_while(|c| c.is_ascii_digit());
        let mut text = self.slice(range);
        if self.peek() == Some('.') {
            self.index += 1;
            text.push('.');
            let fraction = self.consume_while(|c| c.is_ascii_digit());
            text.push_str(&self.slice(fraction));
        }
        text
    }

    pub fn consume_identifier(&mut self) -> String {
        if !self.peek().is_some_and(is_identifier_start) {
            return String::new();
        }
        self.index += 1;
        let rest = self.consume_while(is_identifier_continue);
        self.slice(rest.start - 1..rest.end)
    }

    fn consume_while(&mut self, predicate: impl Fn(char) -> bool) -> Range<usize> {
        let start = self.index;
        while self.peek().is_some_and(&predicate) {
            self.index += 1;
        }
        start..self.index
    }

    fn slice(&self, range: Range<usize>) -> String {
        self.values[range].iter().collect()
    }
}

pub fn is_identifier_start(value: char) -> bool {
    unicode_ident::is_xid_start(value)
}

/// `_` is reserved for subscripts, like the base in `log_2`
pub fn is_identifier_continue(value: char) -> bool {
    value != '_' && unicode_ident::is_xid_continue(value)
}

/// Whether the whole text is a single identifier, like a variable name.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(is_identifier_start) && chars.all(is_identifier_continue)
}

/// Characters that can begin a factor. Used for implicit multiplication.
pub fn starts_factor(value: char) -> bool {
    value.is_ascii_digit() || value == '.' || value == '(' || value == '{' || is_identifier_start(value)
}

/// Splits a piece of text into identifier runs, skipping everything else.
pub fn identifiers(text: &str) -> Vec<String> {
    let mut scanner = Scanner::new(text);
    let mut result = Vec::new();
    while !scanner.eof() {
        if scanner.peek().is_some_and(|c| c.is_ascii_digit()) {
            // Digits glued to letters belong to the number, like in `2x`
            scanner.consume_number();
            continue;
        }
        let identifier = scanner.consume_identifier();
        if identifier.is_empty() {
            scanner.advance();
        } else {
            result.push(identifier);
        }
    }
    result
}
