// ── Token ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Ident(String),
    Str(String),
    Number(f32),
    // Punctuation
    Dot,
    Colon,
    Comma,
    LParen,
    RParen,
    Eq,
    Semicolon,
    // Keywords
    Local,
    /// Any character the statement grammar has no use for (`+`, `{`, an
    /// unterminated quote, ...). Kept so such lines fail to match instead of
    /// silently matching a shorter statement.
    Other(char),
    /// End of a physical line.
    Newline,
}

/// A token with the 1-based line it starts on.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenWithPos {
    pub token: Token,
    pub line: usize,
}

// ── Lexer ─────────────────────────────────────────────────────────────────

/// Tokenizer for the Lua subset used by GUI construction scripts.
///
/// Never fails: anything it cannot classify becomes [`Token::Other`].
/// Comments (`-- ...` and `--[[ ... ]]`) are dropped, and each physical line
/// ends in a [`Token::Newline`].
pub struct Lexer<'s> {
    src: &'s str,
    pos: usize,
    line: usize,
}

impl<'s> Lexer<'s> {
    pub fn new(src: &'s str) -> Self {
        Self { src, pos: 0, line: 1 }
    }

    pub fn tokenize(mut self) -> Vec<TokenWithPos> {
        let mut tokens = Vec::new();
        while let Some(tok) = self.next_token() {
            tokens.push(tok);
        }
        tokens
    }

    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn at(&self, tok: Token) -> TokenWithPos {
        TokenWithPos { token: tok, line: self.line }
    }

    fn skip_blanks(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace() && c != '\n') {
            self.advance();
        }
    }

    /// Skips a comment starting at `--`. Block comments may span lines; the
    /// newlines they swallow still bump the line counter.
    fn skip_comment(&mut self) {
        self.advance();
        self.advance(); // consume `--`
        if let Some(level) = long_bracket_level(self.rest()) {
            self.pos += level + 2;
            let close = format!("]{}]", "=".repeat(level));
            match self.rest().find(&close) {
                Some(idx) => {
                    self.line += self.rest()[..idx].matches('\n').count();
                    self.pos += idx + close.len();
                }
                None => {
                    // unterminated: comment runs to end of input
                    self.line += self.rest().matches('\n').count();
                    self.pos = self.src.len();
                }
            }
            return;
        }
        while !matches!(self.peek(), None | Some('\n')) {
            self.advance();
        }
    }

    fn next_token(&mut self) -> Option<TokenWithPos> {
        loop {
            self.skip_blanks();
            if self.rest().starts_with("--") {
                self.skip_comment();
            } else {
                break;
            }
        }

        let ch = self.peek()?;
        let tok = match ch {
            '\n' => {
                let tok = self.at(Token::Newline);
                self.advance();
                self.line += 1;
                return Some(tok);
            }
            '.' if matches!(self.peek_second(), Some(c) if c.is_ascii_digit()) => self.lex_number(),
            '.' => { self.advance(); Token::Dot }
            ':' => { self.advance(); Token::Colon }
            ',' => { self.advance(); Token::Comma }
            '(' => { self.advance(); Token::LParen }
            ')' => { self.advance(); Token::RParen }
            '=' => { self.advance(); Token::Eq }
            ';' => { self.advance(); Token::Semicolon }
            '"' | '\'' => self.lex_string(ch),
            '-' if matches!(self.peek_second(), Some(c) if c.is_ascii_digit() || c == '.') => self.lex_number(),
            c if c.is_ascii_digit() => self.lex_number(),
            c if c.is_alphabetic() || c == '_' => self.lex_ident_or_keyword(),
            other => { self.advance(); Token::Other(other) }
        };
        Some(self.at(tok))
    }

    fn lex_string(&mut self, quote: char) -> Token {
        let start = self.pos;
        self.advance(); // consume opening quote
        let mut s = String::new();
        loop {
            match self.advance() {
                None | Some('\n') => {
                    // Unterminated: rewind to just past the quote and let the
                    // rest of the line lex as ordinary tokens.
                    self.pos = start + quote.len_utf8();
                    return Token::Other(quote);
                }
                Some(c) if c == quote => break,
                Some('\\') => {
                    match self.advance() {
                        Some('n')  => s.push('\n'),
                        Some('t')  => s.push('\t'),
                        Some('r')  => s.push('\r'),
                        Some('\\') => s.push('\\'),
                        Some('"')  => s.push('"'),
                        Some('\'') => s.push('\''),
                        Some(c)    => { s.push('\\'); s.push(c); }
                        None => {
                            self.pos = start + quote.len_utf8();
                            return Token::Other(quote);
                        }
                    }
                }
                Some(c) => s.push(c),
            }
        }
        Token::Str(s)
    }

    fn lex_number(&mut self) -> Token {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.advance();
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some('.') {
            self.advance();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let mark = self.pos;
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            if matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                    self.advance();
                }
            } else {
                self.pos = mark;
            }
        }
        let s = &self.src[start..self.pos];
        match s.parse::<f32>() {
            Ok(n) if n.is_finite() => Token::Number(n),
            // `-.`, `1e999` and friends: surface the first char, re-lex the rest
            _ => {
                self.pos = start;
                let c = self.advance().unwrap_or('-');
                Token::Other(c)
            }
        }
    }

    fn lex_ident_or_keyword(&mut self) -> Token {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.advance();
        }
        let word = &self.src[start..self.pos];
        match word {
            "local" => Token::Local,
            _       => Token::Ident(word.to_string()),
        }
    }
}

/// If `s` opens a Lua long bracket (`[[`, `[=[`, `[==[`, ...), returns its level.
fn long_bracket_level(s: &str) -> Option<usize> {
    let rest = s.strip_prefix('[')?;
    let level = rest.chars().take_while(|&c| c == '=').count();
    rest[level..].starts_with('[').then_some(level)
}
