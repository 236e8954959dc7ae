//! Lexer for the snippet language using logos.
//!
//! Newlines are significant (they separate statements), so they are
//! emitted as tokens rather than skipped. `#` starts a line comment.

use crate::error::ParseError;
use crate::span::Span;
use logos::Logos;

/// Token types for the snippet language.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    // Statement separators
    #[token("\n")]
    Newline,
    #[token(";")]
    Semi,

    // Statement keywords
    #[token("let")]
    Let,
    #[token("print")]
    Print,
    #[token("=")]
    Assign,

    // Query method keywords
    #[token("findMany")]
    FindMany,
    #[token("findUnique")]
    FindUnique,
    #[token("findFirst")]
    FindFirst,
    #[token("count")]
    Count,

    // Mutation method keywords
    #[token("create")]
    Create,
    #[token("update")]
    Update,
    #[token("delete")]
    Delete,

    // Chain method keywords
    #[token("where")]
    Where,
    #[token("include")]
    Include,
    #[token("orderBy")]
    OrderBy,
    #[token("limit")]
    Limit,
    #[token("offset")]
    Offset,
    #[token("set")]
    Set,

    // Sort direction
    #[token("asc")]
    Asc,
    #[token("desc")]
    Desc,

    // Comparison operators
    #[token("==")]
    Eq,
    #[token("!=")]
    Ne,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,

    // Logical operators
    #[token("&&")]
    And,
    #[token("||")]
    Or,
    #[token("not")]
    Not,

    // Keyword operators
    #[token("in")]
    In,
    #[token("like")]
    Like,
    #[token("is")]
    Is,

    // Literals
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    // Identifier
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    // String literal (double- or single-quoted)
    #[regex(r#""([^"\\]|\\.)*""#, |lex| unquote(lex.slice()))]
    #[regex(r#"'([^'\\]|\\.)*'"#, |lex| unquote(lex.slice()))]
    Str(String),

    // Integer literal (unary minus is handled by the parser)
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),

    // Float literal
    #[regex(r"[0-9]+\.[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),

    // Arithmetic operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,

    // Punctuation
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    // Schema command (starts with dot, wins over Dot by longest match)
    #[token(".schema")]
    DotSchema,
}

/// Strip the surrounding quotes and resolve escape sequences.
fn unquote(slice: &str) -> String {
    let inner = &slice[1..slice.len() - 1];
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('\\') => result.push('\\'),
                Some('"') => result.push('"'),
                Some('\'') => result.push('\''),
                Some(other) => {
                    result.push('\\');
                    result.push(other);
                }
                None => result.push('\\'),
            }
        } else {
            result.push(c);
        }
    }

    result
}

/// A token with its span in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// Tokenize a snippet into spanned tokens.
///
/// An unrecognized character is a syntax error: the executor reports it
/// through the captured output, so it must not be silently dropped.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, ParseError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span: Span = lexer.span().into();
        match result {
            Ok(token) => tokens.push(SpannedToken { token, span }),
            Err(()) => {
                return Err(ParseError::new(
                    format!("unexpected character '{}'", lexer.slice()),
                    span,
                ));
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_simple_chain() {
        let tokens = tokenize("Book.findMany()").unwrap();
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[0].token, Token::Ident("Book".to_string()));
        assert_eq!(tokens[1].token, Token::Dot);
        assert_eq!(tokens[2].token, Token::FindMany);
        assert_eq!(tokens[3].token, Token::LParen);
        assert_eq!(tokens[4].token, Token::RParen);
    }

    #[test]
    fn test_newlines_are_tokens() {
        let tokens = tokenize("let x = 1\nx + 1").unwrap();
        assert!(tokens.iter().any(|t| t.token == Token::Newline));
        assert_eq!(tokens[0].token, Token::Let);
        assert_eq!(tokens.last().unwrap().token, Token::Int(1));
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = tokenize("# fetch everything\nBook.findMany()").unwrap();
        assert_eq!(tokens[0].token, Token::Newline);
        assert_eq!(tokens[1].token, Token::Ident("Book".to_string()));
    }

    #[test]
    fn test_minus_is_an_operator() {
        // "1 - 2" and "1 -2" both subtract; negative literals are the
        // parser's business.
        let tokens = tokenize("1 -2").unwrap();
        assert_eq!(tokens[0].token, Token::Int(1));
        assert_eq!(tokens[1].token, Token::Minus);
        assert_eq!(tokens[2].token, Token::Int(2));
    }

    #[test]
    fn test_string_quote_styles() {
        let tokens = tokenize(r#""hi" 'hi'"#).unwrap();
        assert_eq!(tokens[0].token, Token::Str("hi".to_string()));
        assert_eq!(tokens[1].token, Token::Str("hi".to_string()));
    }

    #[test]
    fn test_string_escapes() {
        let tokens = tokenize(r#""line\nbreak" 'it\'s'"#).unwrap();
        assert_eq!(tokens[0].token, Token::Str("line\nbreak".to_string()));
        assert_eq!(tokens[1].token, Token::Str("it's".to_string()));
    }

    #[test]
    fn test_filter_operators() {
        let tokens = tokenize(r#"price >= 10 && title like "The%""#).unwrap();
        assert!(tokens.iter().any(|t| t.token == Token::Ge));
        assert!(tokens.iter().any(|t| t.token == Token::And));
        assert!(tokens.iter().any(|t| t.token == Token::Like));
    }

    #[test]
    fn test_schema_command_token() {
        let tokens = tokenize(".schema Book").unwrap();
        assert_eq!(tokens[0].token, Token::DotSchema);
        assert_eq!(tokens[1].token, Token::Ident("Book".to_string()));
    }

    #[test]
    fn test_object_literal_tokens() {
        let tokens = tokenize(r#"Author.create({ first_name: "Jane" })"#).unwrap();
        assert!(tokens.iter().any(|t| t.token == Token::Create));
        assert!(tokens.iter().any(|t| t.token == Token::LBrace));
        assert!(tokens.iter().any(|t| t.token == Token::Colon));
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("1 + @").unwrap_err();
        assert!(err.message.contains("unexpected character"));
        assert_eq!(err.span, Span::new(4, 5));
    }
}
