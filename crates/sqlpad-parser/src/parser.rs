use crate::ast::*;
use crate::lexer::{Keyword, Lexer, Token, TokenKind};
use sqlpad_core::{QueryError, Result};

/// Parse `sql` into a [`QueryIntent`].
pub fn parse_query(sql: &str) -> Result<QueryIntent> {
    Parser::new(sql)?.parse()
}

/// Parser for the supported subset:
///
/// ```text
/// [SELECT <* | col[, col...]>] FROM <table>
///     [WHERE <col> <op> <value> [AND ...]]
///     [LIMIT <n>]
/// ```
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(sql: &str) -> Result<Self> {
        let sql = sql.trim().trim_end_matches(';');
        let mut lexer = Lexer::new(sql);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
        })
    }

    pub fn parse(&mut self) -> Result<QueryIntent> {
        let from = self
            .tokens
            .iter()
            .position(|t| t.is_keyword(Keyword::From))
            .ok_or_else(|| QueryError::MalformedQuery("No table specified in query".to_string()))?;

        let projection = self.parse_projection(from)?;

        self.position = from + 1;
        let table = self.parse_table_name()?;

        let conditions = if self.match_keyword(Keyword::Where) {
            self.parse_conditions()?
        } else {
            vec![]
        };

        let limit = if self.match_keyword(Keyword::Limit) {
            Some(self.parse_limit()?)
        } else {
            None
        };

        if self.current_token().kind != TokenKind::Eof {
            return Err(QueryError::MalformedQuery(format!(
                "unexpected '{}' after table '{}'",
                self.current_token().text,
                table
            )));
        }

        Ok(QueryIntent {
            table,
            projection,
            conditions,
            limit,
        })
    }

    /// Everything between SELECT and FROM.
    fn parse_projection(&self, from: usize) -> Result<Projection> {
        if from == 0 {
            return Ok(Projection::All);
        }
        if !self.tokens[0].is_keyword(Keyword::Select) {
            return Err(QueryError::MalformedQuery(format!(
                "expected SELECT, found '{}'",
                self.tokens[0].text
            )));
        }

        let list = self.tokens[1..from]
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let list = list.trim();

        if list.is_empty() || list == "*" {
            return Ok(Projection::All);
        }

        let columns = list
            .split(',')
            .map(|c| c.trim().to_string())
            .collect::<Vec<_>>();
        if columns.iter().any(|c| c.is_empty()) {
            return Err(QueryError::MalformedQuery(format!(
                "empty entry in column list '{}'",
                list
            )));
        }

        Ok(Projection::Columns(columns))
    }

    fn parse_table_name(&mut self) -> Result<String> {
        let token = self.current_token().clone();
        let is_identifier = !token.text.is_empty()
            && token
                .text
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');

        if token.kind != TokenKind::Word || !is_identifier {
            return Err(QueryError::MalformedQuery(format!(
                "expected table name after FROM, found '{}'",
                token.text
            )));
        }

        self.advance();
        Ok(token.text.to_ascii_lowercase())
    }

    /// Conditions run until LIMIT or end of input and are split on AND.
    fn parse_conditions(&mut self) -> Result<Vec<Condition>> {
        let mut conditions = Vec::new();
        let mut current: Vec<Token> = Vec::new();

        loop {
            let token = self.current_token().clone();
            match token.kind {
                TokenKind::Eof | TokenKind::Keyword(Keyword::Limit) => break,
                TokenKind::Keyword(Keyword::And) => {
                    conditions.push(Self::parse_condition(&current)?);
                    current.clear();
                }
                _ => current.push(token),
            }
            self.advance();
        }
        conditions.push(Self::parse_condition(&current)?);

        Ok(conditions)
    }

    fn parse_condition(tokens: &[Token]) -> Result<Condition> {
        if tokens.len() < 3 {
            let text = tokens.iter().map(Token::raw).collect::<Vec<_>>().join(" ");
            return Err(QueryError::MalformedQuery(format!(
                "expected '<column> <operator> <value>', found '{}'",
                text
            )));
        }

        let column = tokens[0].text.clone();
        let operator = Operator::parse(&tokens[1].text);
        let value_tokens = &tokens[2..];

        let value = match operator {
            Operator::In => {
                let raw = value_tokens
                    .iter()
                    .map(Token::raw)
                    .collect::<Vec<_>>()
                    .join(" ");
                Value::List(parse_list(&raw))
            }
            _ => match value_tokens {
                [single] if single.kind == TokenKind::Quoted => Value::Text(single.text.clone()),
                _ => {
                    let raw = value_tokens
                        .iter()
                        .map(Token::raw)
                        .collect::<Vec<_>>()
                        .join(" ");
                    Value::Text(strip_quotes(&raw).to_string())
                }
            },
        };

        Ok(Condition {
            column,
            operator,
            value,
        })
    }

    fn parse_limit(&mut self) -> Result<usize> {
        let token = self.current_token().clone();
        let limit = match token.kind {
            TokenKind::Word => token.text.parse::<usize>().ok(),
            _ => None,
        };

        match limit {
            Some(n) => {
                self.advance();
                Ok(n)
            }
            None => Err(QueryError::MalformedQuery(format!(
                "expected row count after LIMIT, found '{}'",
                token.text
            ))),
        }
    }

    fn current_token(&self) -> &Token {
        &self.tokens[self.position]
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    fn match_keyword(&mut self, keyword: Keyword) -> bool {
        if self.current_token().is_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }
}

/// `(a, 'b', c)` -> `["a", "b", "c"]`
fn parse_list(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    let inner = raw
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(raw);

    inner
        .split(',')
        .map(|item| strip_quotes(item.trim()).to_string())
        .collect()
}

/// Remove one layer of matching single or double quotes.
fn strip_quotes(text: &str) -> &str {
    for quote in ['\'', '"'] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}
