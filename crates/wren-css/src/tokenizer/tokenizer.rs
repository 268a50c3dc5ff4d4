use super::token::CSSToken;

/// [§ 4.3 Tokenizer Algorithms](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms)
///
/// Converts stylesheet text into a flat token list terminated by
/// [`CSSToken::EOF`]. Comments are dropped.
pub struct CSSTokenizer {
    input: Vec<char>,
    position: usize,
    tokens: Vec<CSSToken>,
}

/// Tokenize `input` in one call.
pub fn tokenize(input: &str) -> Vec<CSSToken> {
    let mut tokenizer = CSSTokenizer::new(input);
    tokenizer.run();
    tokenizer.into_tokens()
}

impl CSSTokenizer {
    /// Create a new CSS tokenizer with the given input.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into().chars().collect(),
            position: 0,
            tokens: Vec::new(),
        }
    }

    /// Consume tokens until end of input.
    pub fn run(&mut self) {
        loop {
            let token = self.consume_token();
            let is_eof = token.is_eof();
            self.tokens.push(token);
            if is_eof {
                break;
            }
        }
    }

    /// Return the collected tokens.
    pub fn into_tokens(self) -> Vec<CSSToken> {
        self.tokens
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    fn consume_token(&mut self) -> CSSToken {
        self.consume_comments();

        let Some(c) = self.consume() else {
            return CSSToken::EOF;
        };

        match c {
            c if is_whitespace(c) => {
                while self.peek().is_some_and(is_whitespace) {
                    self.position += 1;
                }
                CSSToken::Whitespace
            }
            '"' | '\'' => self.consume_string(c),
            '#' => {
                if self.peek().is_some_and(is_ident_char) || self.starts_escape(0) {
                    CSSToken::Hash(self.consume_ident_sequence())
                } else {
                    CSSToken::Delim('#')
                }
            }
            '(' => CSSToken::LeftParen,
            ')' => CSSToken::RightParen,
            '[' => CSSToken::LeftBracket,
            ']' => CSSToken::RightBracket,
            '{' => CSSToken::LeftBrace,
            '}' => CSSToken::RightBrace,
            ',' => CSSToken::Comma,
            ':' => CSSToken::Colon,
            ';' => CSSToken::Semicolon,
            '+' | '.' if self.starts_number_at(-1) => {
                self.position -= 1;
                self.consume_numeric()
            }
            '-' => {
                if self.starts_number_at(-1) {
                    self.position -= 1;
                    self.consume_numeric()
                } else if self.starts_ident_at(-1) {
                    self.position -= 1;
                    self.consume_ident_like()
                } else {
                    CSSToken::Delim('-')
                }
            }
            '@' => {
                if self.starts_ident_at(0) {
                    CSSToken::AtKeyword(self.consume_ident_sequence())
                } else {
                    CSSToken::Delim('@')
                }
            }
            '\\' if self.peek().is_some_and(|n| n != '\n') => {
                self.position -= 1;
                self.consume_ident_like()
            }
            c if c.is_ascii_digit() => {
                self.position -= 1;
                self.consume_numeric()
            }
            c if is_ident_start(c) => {
                self.position -= 1;
                self.consume_ident_like()
            }
            c => CSSToken::Delim(c),
        }
    }

    /// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comments)
    fn consume_comments(&mut self) {
        while self.peek() == Some('/') && self.peek_at(1) == Some('*') {
            self.position += 2;
            loop {
                match self.consume() {
                    None => return,
                    Some('*') if self.peek() == Some('/') => {
                        self.position += 1;
                        break;
                    }
                    Some(_) => {}
                }
            }
        }
    }

    /// [§ 4.3.5 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn consume_string(&mut self, quote: char) -> CSSToken {
        let mut value = String::new();
        while let Some(c) = self.consume() {
            match c {
                c if c == quote => break,
                // A newline ends a bad string; keep what we have.
                '\n' => {
                    self.position -= 1;
                    break;
                }
                '\\' => match self.peek() {
                    Some('\n') => self.position += 1,
                    Some(_) => value.push(self.consume_escape()),
                    None => {}
                },
                c => value.push(c),
            }
        }
        CSSToken::String(value)
    }

    /// [§ 4.3.3 Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric(&mut self) -> CSSToken {
        let value = self.consume_number();
        if self.starts_ident_at(0) {
            let unit = self.consume_ident_sequence().to_ascii_lowercase();
            CSSToken::Dimension { value, unit }
        } else if self.peek() == Some('%') {
            self.position += 1;
            CSSToken::Percentage(value)
        } else {
            CSSToken::Number(value)
        }
    }

    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    fn consume_number(&mut self) -> f64 {
        let start = self.position;
        if matches!(self.peek(), Some('+' | '-')) {
            self.position += 1;
        }
        self.consume_digits();
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.position += 1;
            self.consume_digits();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let sign = usize::from(matches!(self.peek_at(1), Some('+' | '-')));
            if self.peek_at(1 + sign).is_some_and(|c| c.is_ascii_digit()) {
                self.position += 1 + sign;
                self.consume_digits();
            }
        }
        let repr: String = self.input[start..self.position].iter().collect();
        repr.parse().unwrap_or(0.0)
    }

    fn consume_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.position += 1;
        }
    }

    /// [§ 4.3.4 Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    fn consume_ident_like(&mut self) -> CSSToken {
        let name = self.consume_ident_sequence();
        if self.peek() == Some('(') {
            self.position += 1;
            CSSToken::Function(name)
        } else {
            CSSToken::Ident(name)
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_ident_sequence(&mut self) -> String {
        let mut result = String::new();
        loop {
            match self.peek() {
                Some(c) if is_ident_char(c) => {
                    result.push(c);
                    self.position += 1;
                }
                Some('\\') if self.starts_escape(0) => {
                    self.position += 1;
                    result.push(self.consume_escape());
                }
                _ => return result,
            }
        }
    }

    /// [§ 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    ///
    /// Called with the cursor just past the backslash.
    fn consume_escape(&mut self) -> char {
        let mut hex = String::new();
        while hex.len() < 6 && self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
            hex.push(self.consume().unwrap_or('0'));
        }
        if hex.is_empty() {
            return self.consume().unwrap_or('\u{fffd}');
        }
        if self.peek().is_some_and(is_whitespace) {
            self.position += 1;
        }
        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .filter(|&c| c != '\0')
            .unwrap_or('\u{fffd}')
    }

    /// [§ 4.3.8 Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
    fn starts_escape(&self, offset: usize) -> bool {
        self.peek_at(offset) == Some('\\') && self.peek_at(offset + 1).is_some_and(|c| c != '\n')
    }

    /// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
    fn starts_ident_at(&self, offset: isize) -> bool {
        let at = |i: isize| self.char_at(offset + i);
        match at(0) {
            Some('-') => {
                at(1).is_some_and(|c| is_ident_start(c) || c == '-')
                    || (at(1) == Some('\\') && at(2).is_some_and(|c| c != '\n'))
            }
            Some('\\') => at(1).is_some_and(|c| c != '\n'),
            Some(c) => is_ident_start(c),
            None => false,
        }
    }

    /// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
    fn starts_number_at(&self, offset: isize) -> bool {
        let at = |i: isize| self.char_at(offset + i);
        let digit = |c: Option<char>| c.is_some_and(|c| c.is_ascii_digit());
        match at(0) {
            Some('+' | '-') => digit(at(1)) || (at(1) == Some('.') && digit(at(2))),
            Some('.') => digit(at(1)),
            c => digit(c),
        }
    }

    fn char_at(&self, offset: isize) -> Option<char> {
        let index = self.position.checked_add_signed(offset)?;
        self.input.get(index).copied()
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.position).copied();
        if c.is_some() {
            self.position += 1;
        }
        c
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }
}

/// [§ 4.2 whitespace](https://www.w3.org/TR/css-syntax-3/#whitespace)
const fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{c}')
}

/// [§ 4.2 ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// [§ 4.2 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit() || c == '-'
}
