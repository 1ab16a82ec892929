pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::{Condition, Operator, Projection, QueryIntent, Value};
pub use lexer::{Keyword, Lexer, Token, TokenKind};
pub use parser::{parse_query, Parser};
