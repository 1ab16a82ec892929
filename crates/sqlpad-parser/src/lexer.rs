use sqlpad_core::{QueryError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Select,
    From,
    Where,
    And,
    Limit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword(Keyword),
    /// Any other whitespace-delimited run of characters
    Word,
    /// A '...' or "..." literal
    Quoted,
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text; for quoted literals, the text between the quotes
    pub text: String,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn eof() -> Self {
        Self::new(TokenKind::Eof, "")
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }

    /// The token as it would be written back into a query.
    pub fn raw(&self) -> String {
        match self.kind {
            TokenKind::Quoted => format!("'{}'", self.text),
            _ => self.text.clone(),
        }
    }
}

/// Splits a query into keywords, words and quoted literals.
///
/// Keywords are recognized case-insensitively; every other word keeps its
/// original spelling. Operators and punctuation are not split out of words,
/// so `Price >= 10` lexes as three words while `Price>=10` is one.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            if self.position >= self.input.len() {
                break;
            }
            tokens.push(self.next_token()?);
        }

        tokens.push(Token::eof());
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token> {
        match self.current_char() {
            quote @ ('\'' | '"') => self.read_quoted(quote),
            _ => Ok(self.read_word()),
        }
    }

    fn read_quoted(&mut self, quote: char) -> Result<Token> {
        self.advance();
        let start = self.position;

        while self.position < self.input.len() && self.current_char() != quote {
            self.advance();
        }
        if self.position >= self.input.len() {
            return Err(QueryError::MalformedQuery(
                "unterminated string literal".to_string(),
            ));
        }

        let text: String = self.input[start..self.position].iter().collect();
        self.advance();
        Ok(Token::new(TokenKind::Quoted, text))
    }

    fn read_word(&mut self) -> Token {
        let start = self.position;
        while self.position < self.input.len() && !self.current_char().is_whitespace() {
            self.advance();
        }

        let word: String = self.input[start..self.position].iter().collect();
        let kind = match word.to_ascii_uppercase().as_str() {
            "SELECT" => TokenKind::Keyword(Keyword::Select),
            "FROM" => TokenKind::Keyword(Keyword::From),
            "WHERE" => TokenKind::Keyword(Keyword::Where),
            "AND" => TokenKind::Keyword(Keyword::And),
            "LIMIT" => TokenKind::Keyword(Keyword::Limit),
            _ => TokenKind::Word,
        };
        Token::new(kind, word)
    }

    fn current_char(&self) -> char {
        if self.position < self.input.len() {
            self.input[self.position]
        } else {
            '\0'
        }
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while self.position < self.input.len() && self.current_char().is_whitespace() {
            self.advance();
        }
    }
}
