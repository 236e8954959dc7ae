//! Recursive descent parser for the snippet language.
//!
//! Statements are separated by newlines or `;`. A chain clause may
//! continue on the next line when that line starts with `.`, so
//! multi-line chains parse the way they read.

use crate::ast::*;
use crate::error::ParseError;
use crate::lexer::{tokenize, SpannedToken, Token};
use crate::span::{Span, Spanned};

/// Parse a snippet source string.
pub fn parse(source: &str) -> Result<Snippet, ParseError> {
    Parser::new(source)?.parse_snippet()
}

/// Parser over the full token stream of a snippet.
pub struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    eof: Span,
}

impl Parser {
    /// Tokenize the source and set up a parser.
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let tokens = tokenize(source)?;
        let eof = Span::new(source.len(), source.len());
        Ok(Self {
            tokens,
            pos: 0,
            eof,
        })
    }

    // ------------------------------------------------------------------
    // Token stream helpers
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn next_token(&mut self) -> Result<SpannedToken, ParseError> {
        self.advance()
            .ok_or_else(|| ParseError::new("unexpected end of input", self.eof))
    }

    fn expect_token(&mut self, expected: Token) -> Result<SpannedToken, ParseError> {
        let tok = self.next_token()?;
        if tok.token == expected {
            Ok(tok)
        } else {
            Err(ParseError::new(
                format!("expected {:?}, found {:?}", expected, tok.token),
                tok.span,
            ))
        }
    }

    fn expect_ident(&mut self) -> Result<Spanned<String>, ParseError> {
        let tok = self.next_token()?;
        match tok.token {
            Token::Ident(name) => Ok(Spanned::new(name, tok.span)),
            other => Err(ParseError::new(
                format!("expected identifier, found {:?}", other),
                tok.span,
            )),
        }
    }

    fn expect_int(&mut self) -> Result<Spanned<i64>, ParseError> {
        let tok = self.next_token()?;
        match tok.token {
            Token::Int(n) => Ok(Spanned::new(n, tok.span)),
            other => Err(ParseError::new(
                format!("expected integer, found {:?}", other),
                tok.span,
            )),
        }
    }

    fn skip_newlines(&mut self) {
        while matches!(self.peek().map(|t| &t.token), Some(Token::Newline)) {
            self.pos += 1;
        }
    }

    fn skip_separators(&mut self) {
        while matches!(
            self.peek().map(|t| &t.token),
            Some(Token::Newline | Token::Semi)
        ) {
            self.pos += 1;
        }
    }

    /// Consume a chain-continuation dot, looking through newlines.
    ///
    /// Returns false (consuming nothing) when the chain does not
    /// continue, so `Book.count()` followed by a fresh statement on the
    /// next line is not swallowed.
    fn eat_chain_dot(&mut self) -> bool {
        let mut k = self.pos;
        while matches!(self.tokens.get(k).map(|t| &t.token), Some(Token::Newline)) {
            k += 1;
        }
        if matches!(self.tokens.get(k).map(|t| &t.token), Some(Token::Dot)) {
            self.pos = k + 1;
            true
        } else {
            false
        }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    /// Parse the whole snippet.
    pub fn parse_snippet(&mut self) -> Result<Snippet, ParseError> {
        let mut statements = Vec::new();

        self.skip_separators();
        while self.peek().is_some() {
            statements.push(self.parse_statement()?);

            match self.peek() {
                None => break,
                Some(t) if matches!(t.token, Token::Newline | Token::Semi) => {
                    self.skip_separators();
                }
                Some(t) => {
                    return Err(ParseError::new(
                        format!("expected newline or ';', found {:?}", t.token),
                        t.span,
                    ))
                }
            }
        }

        Ok(Snippet { statements })
    }

    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        match self.peek().map(|t| &t.token) {
            Some(Token::Let) => self.parse_let(),
            Some(Token::DotSchema) => self.parse_schema_command(),
            _ => Ok(Stmt::Expr(self.parse_expr()?)),
        }
    }

    fn parse_let(&mut self) -> Result<Stmt, ParseError> {
        let let_tok = self.expect_token(Token::Let)?;
        let name = self.expect_ident()?;
        self.expect_token(Token::Assign)?;
        let value = self.parse_expr()?;
        let span = let_tok.span.merge(value.span());

        Ok(Stmt::Let { name, value, span })
    }

    fn parse_schema_command(&mut self) -> Result<Stmt, ParseError> {
        let cmd = self.expect_token(Token::DotSchema)?;

        // Optional entity name on the same line
        let entity = match self.peek() {
            Some(t) if matches!(t.token, Token::Ident(_)) => Some(self.expect_ident()?),
            _ => None,
        };
        let span = entity
            .as_ref()
            .map(|e| cmd.span.merge(e.span))
            .unwrap_or(cmd.span);

        Ok(Stmt::Schema { entity, span })
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_term()?;

        while let Some(tok) = self.peek() {
            let op = match tok.token {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };
            self.pos += 1;

            let right = self.parse_term()?;
            let span = left.span().merge(right.span());
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        while let Some(tok) = self.peek() {
            let op = match tok.token {
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                _ => break,
            };
            self.pos += 1;

            let right = self.parse_unary()?;
            let span = left.span().merge(right.span());
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if let Some(tok) = self.peek() {
            if tok.token == Token::Minus {
                let minus = self.next_token()?;
                let operand = self.parse_unary()?;
                let span = minus.span.merge(operand.span());
                return Ok(Expr::Unary {
                    op: UnaryOp::Neg,
                    operand: Box::new(operand),
                    span,
                });
            }
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let tok = self.next_token()?;

        match tok.token {
            Token::Int(n) => Ok(Expr::Literal(Spanned::new(Literal::Int(n), tok.span))),
            Token::Float(f) => Ok(Expr::Literal(Spanned::new(Literal::Float(f), tok.span))),
            Token::Str(s) => Ok(Expr::Literal(Spanned::new(Literal::Str(s), tok.span))),
            Token::True => Ok(Expr::Literal(Spanned::new(Literal::Bool(true), tok.span))),
            Token::False => Ok(Expr::Literal(Spanned::new(Literal::Bool(false), tok.span))),
            Token::Null => Ok(Expr::Literal(Spanned::new(Literal::Null, tok.span))),

            Token::Print => {
                self.expect_token(Token::LParen)?;
                let value = self.parse_expr()?;
                let close = self.expect_token(Token::RParen)?;
                Ok(Expr::Print {
                    value: Box::new(value),
                    span: tok.span.merge(close.span),
                })
            }

            Token::LParen => {
                let expr = self.parse_expr()?;
                self.expect_token(Token::RParen)?;
                Ok(expr)
            }

            Token::Ident(name) => {
                let ident = Spanned::new(name, tok.span);
                if self.eat_chain_dot() {
                    self.parse_chain(ident)
                } else {
                    Ok(Expr::Var(ident))
                }
            }

            other => Err(ParseError::new(
                format!("expected expression, found {:?}", other),
                tok.span,
            )),
        }
    }

    // ------------------------------------------------------------------
    // Entity chains
    // ------------------------------------------------------------------

    fn parse_chain(&mut self, entity: Spanned<String>) -> Result<Expr, ParseError> {
        let op_token = self.next_token()?;

        match op_token.token {
            Token::FindMany | Token::FindUnique | Token::FindFirst | Token::Count => {
                self.parse_query(entity, op_token)
            }
            Token::Create => self.parse_create(entity),
            Token::Update | Token::Delete => self.parse_mutation(entity, op_token),
            other => Err(ParseError::new(
                format!("expected query or mutation method, found {:?}", other),
                op_token.span,
            )),
        }
    }

    fn parse_query(
        &mut self,
        entity: Spanned<String>,
        op_token: SpannedToken,
    ) -> Result<Expr, ParseError> {
        let kind = match op_token.token {
            Token::FindMany => QueryKind::FindMany,
            Token::FindUnique => QueryKind::FindUnique,
            Token::FindFirst => QueryKind::FindFirst,
            Token::Count => QueryKind::Count,
            _ => unreachable!(),
        };

        self.expect_token(Token::LParen)?;
        let close = self.expect_token(Token::RParen)?;

        let start_span = entity.span;
        let mut end_span = close.span;
        let mut clauses = Vec::new();

        while self.eat_chain_dot() {
            let clause_tok = self.next_token()?;
            let clause = match clause_tok.token {
                Token::Where => QueryClause::Where(self.parse_where_clause(clause_tok.span)?),
                Token::Include => {
                    QueryClause::Include(self.parse_include_clause(clause_tok.span)?)
                }
                Token::OrderBy => {
                    QueryClause::OrderBy(self.parse_orderby_clause(clause_tok.span)?)
                }
                Token::Limit => QueryClause::Limit(self.parse_count_clause("limit")?),
                Token::Offset => QueryClause::Offset(self.parse_count_clause("offset")?),
                other => {
                    return Err(ParseError::new(
                        format!("unexpected query clause {:?}", other),
                        clause_tok.span,
                    ))
                }
            };
            end_span = clause.span();
            clauses.push(clause);
        }

        Ok(Expr::Query(Query {
            entity,
            kind,
            clauses,
            span: start_span.merge(end_span),
        }))
    }

    fn parse_where_clause(&mut self, start_span: Span) -> Result<WhereClause, ParseError> {
        self.expect_token(Token::LParen)?;
        self.skip_newlines();
        let condition = self.parse_or_filter()?;
        self.skip_newlines();
        let close = self.expect_token(Token::RParen)?;

        Ok(WhereClause {
            condition,
            span: start_span.merge(close.span),
        })
    }

    fn parse_or_filter(&mut self) -> Result<Filter, ParseError> {
        let mut left = self.parse_and_filter()?;

        while matches!(self.peek().map(|t| &t.token), Some(Token::Or)) {
            self.pos += 1;
            self.skip_newlines();

            let right = self.parse_and_filter()?;
            left = match left {
                Filter::Or(mut conditions) => {
                    conditions.push(right);
                    Filter::Or(conditions)
                }
                _ => Filter::Or(vec![left, right]),
            };
        }

        Ok(left)
    }

    fn parse_and_filter(&mut self) -> Result<Filter, ParseError> {
        let mut left = self.parse_filter_atom()?;

        while matches!(self.peek().map(|t| &t.token), Some(Token::And)) {
            self.pos += 1;
            self.skip_newlines();

            let right = self.parse_filter_atom()?;
            left = match left {
                Filter::And(mut conditions) => {
                    conditions.push(right);
                    Filter::And(conditions)
                }
                _ => Filter::And(vec![left, right]),
            };
        }

        Ok(left)
    }

    fn parse_filter_atom(&mut self) -> Result<Filter, ParseError> {
        // Parenthesized group, e.g. `a == 1 && (b == 2 || c == 3)`.
        if matches!(self.peek().map(|t| &t.token), Some(Token::LParen)) {
            self.pos += 1;
            self.skip_newlines();
            let inner = self.parse_or_filter()?;
            self.skip_newlines();
            self.expect_token(Token::RParen)?;
            return Ok(inner);
        }

        let field = self.expect_ident()?;

        let op_tok = self.peek().ok_or_else(|| {
            ParseError::new("unexpected end of input, expected filter operator", field.span)
        })?;

        match &op_tok.token {
            Token::Eq | Token::Ne | Token::Lt | Token::Le | Token::Gt | Token::Ge => {
                let op = match self.next_token()?.token {
                    Token::Eq => CompareOp::Eq,
                    Token::Ne => CompareOp::Ne,
                    Token::Lt => CompareOp::Lt,
                    Token::Le => CompareOp::Le,
                    Token::Gt => CompareOp::Gt,
                    Token::Ge => CompareOp::Ge,
                    _ => unreachable!(),
                };
                let value = self.parse_literal()?;
                Ok(Filter::Compare { field, op, value })
            }

            Token::Is => {
                self.pos += 1;

                let negated = if matches!(self.peek().map(|t| &t.token), Some(Token::Not)) {
                    self.pos += 1;
                    true
                } else {
                    false
                };

                let null_tok = self.next_token()?;
                if null_tok.token != Token::Null {
                    return Err(ParseError::new(
                        format!("expected 'null' after 'is', found {:?}", null_tok.token),
                        null_tok.span,
                    ));
                }

                Ok(Filter::IsNull { field, negated })
            }

            Token::In => {
                self.pos += 1;
                let values = self.parse_array_literal()?;
                Ok(Filter::In {
                    field,
                    values,
                    negated: false,
                })
            }

            Token::Like => {
                self.pos += 1;
                let pattern = self.parse_string_literal()?;
                Ok(Filter::Like {
                    field,
                    pattern,
                    negated: false,
                })
            }

            Token::Not => {
                self.pos += 1;
                let next = self.next_token()?;
                match next.token {
                    Token::In => {
                        let values = self.parse_array_literal()?;
                        Ok(Filter::In {
                            field,
                            values,
                            negated: true,
                        })
                    }
                    Token::Like => {
                        let pattern = self.parse_string_literal()?;
                        Ok(Filter::Like {
                            field,
                            pattern,
                            negated: true,
                        })
                    }
                    other => Err(ParseError::new(
                        format!("expected 'in' or 'like' after 'not', found {:?}", other),
                        next.span,
                    )),
                }
            }

            other => Err(ParseError::new(
                format!("expected filter operator, found {:?}", other),
                op_tok.span,
            )),
        }
    }

    fn parse_include_clause(&mut self, start_span: Span) -> Result<IncludeClause, ParseError> {
        self.expect_token(Token::LParen)?;
        let relation = self.expect_ident()?;

        if matches!(self.peek().map(|t| &t.token), Some(Token::Dot)) {
            return Err(ParseError::new(
                "nested include paths are not supported",
                relation.span,
            )
            .with_hint("include one relation per include() call"));
        }

        let close = self.expect_token(Token::RParen)?;
        Ok(IncludeClause {
            relation,
            span: start_span.merge(close.span),
        })
    }

    fn parse_orderby_clause(&mut self, start_span: Span) -> Result<OrderByClause, ParseError> {
        self.expect_token(Token::LParen)?;
        let field = self.expect_ident()?;

        // Optional .asc / .desc
        let direction = if matches!(self.peek().map(|t| &t.token), Some(Token::Dot)) {
            self.pos += 1;
            let dir_tok = self.next_token()?;
            match dir_tok.token {
                Token::Asc => SortDirection::Asc,
                Token::Desc => SortDirection::Desc,
                other => {
                    return Err(ParseError::new(
                        format!("expected 'asc' or 'desc', found {:?}", other),
                        dir_tok.span,
                    ))
                }
            }
        } else {
            SortDirection::default()
        };

        let close = self.expect_token(Token::RParen)?;
        Ok(OrderByClause {
            field,
            direction,
            span: start_span.merge(close.span),
        })
    }

    fn parse_count_clause(&mut self, what: &str) -> Result<Spanned<u32>, ParseError> {
        self.expect_token(Token::LParen)?;
        let value = self.expect_int()?;
        self.expect_token(Token::RParen)?;

        if value.value < 0 {
            return Err(ParseError::new(
                format!("{} must be non-negative", what),
                value.span,
            ));
        }

        Ok(Spanned::new(value.value as u32, value.span))
    }

    fn parse_create(&mut self, entity: Spanned<String>) -> Result<Expr, ParseError> {
        self.expect_token(Token::LParen)?;
        self.skip_newlines();
        let data = self.parse_object_literal()?;
        self.skip_newlines();
        let close = self.expect_token(Token::RParen)?;

        let span = entity.span.merge(close.span);
        Ok(Expr::Mutation(Mutation {
            entity,
            kind: MutationKind::Create { data },
            span,
        }))
    }

    fn parse_mutation(
        &mut self,
        entity: Spanned<String>,
        op_token: SpannedToken,
    ) -> Result<Expr, ParseError> {
        self.expect_token(Token::LParen)?;
        let close = self.expect_token(Token::RParen)?;

        let start_span = entity.span;
        let mut end_span = close.span;
        let mut clauses = Vec::new();

        while self.eat_chain_dot() {
            let clause_tok = self.next_token()?;
            let clause = match clause_tok.token {
                Token::Where => MutationClause::Where(self.parse_where_clause(clause_tok.span)?),
                Token::Set => {
                    self.expect_token(Token::LParen)?;
                    self.skip_newlines();
                    let obj = self.parse_object_literal()?;
                    self.skip_newlines();
                    self.expect_token(Token::RParen)?;
                    MutationClause::Set(obj)
                }
                other => {
                    return Err(ParseError::new(
                        format!("unexpected mutation clause {:?}", other),
                        clause_tok.span,
                    ))
                }
            };
            end_span = clause.span();
            clauses.push(clause);
        }

        let kind = match op_token.token {
            Token::Update => MutationKind::Update { clauses },
            Token::Delete => MutationKind::Delete { clauses },
            _ => unreachable!(),
        };

        Ok(Expr::Mutation(Mutation {
            entity,
            kind,
            span: start_span.merge(end_span),
        }))
    }

    fn parse_object_literal(&mut self) -> Result<ObjectLiteral, ParseError> {
        let open = self.expect_token(Token::LBrace)?;
        self.skip_newlines();
        let mut fields = Vec::new();

        // Empty object
        if matches!(self.peek().map(|t| &t.token), Some(Token::RBrace)) {
            let close = self.next_token()?;
            return Ok(ObjectLiteral {
                fields,
                span: open.span.merge(close.span),
            });
        }

        fields.push(self.parse_object_field()?);
        self.skip_newlines();

        loop {
            match self.peek().map(|t| &t.token) {
                Some(Token::RBrace) => break,
                Some(Token::Comma) => {
                    self.pos += 1;
                    self.skip_newlines();
                    // Trailing comma
                    if matches!(self.peek().map(|t| &t.token), Some(Token::RBrace)) {
                        break;
                    }
                    fields.push(self.parse_object_field()?);
                    self.skip_newlines();
                }
                Some(other) => {
                    let span = self.peek().map(|t| t.span).unwrap_or(self.eof);
                    return Err(ParseError::new(
                        format!("expected ',' or '}}', found {:?}", other),
                        span,
                    ));
                }
                None => {
                    return Err(ParseError::new(
                        "unexpected end of input in object literal",
                        self.eof,
                    ))
                }
            }
        }

        let close = self.expect_token(Token::RBrace)?;
        Ok(ObjectLiteral {
            fields,
            span: open.span.merge(close.span),
        })
    }

    fn parse_object_field(&mut self) -> Result<ObjectField, ParseError> {
        let name = self.expect_ident()?;
        self.expect_token(Token::Colon)?;
        let value = self.parse_literal()?;
        Ok(ObjectField { name, value })
    }

    fn parse_array_literal(&mut self) -> Result<Vec<Spanned<Literal>>, ParseError> {
        self.expect_token(Token::LBracket)?;
        self.skip_newlines();
        let mut values = Vec::new();

        if matches!(self.peek().map(|t| &t.token), Some(Token::RBracket)) {
            self.pos += 1;
            return Ok(values);
        }

        values.push(self.parse_literal()?);
        self.skip_newlines();

        while !matches!(self.peek().map(|t| &t.token), Some(Token::RBracket)) {
            self.expect_token(Token::Comma)?;
            self.skip_newlines();
            values.push(self.parse_literal()?);
            self.skip_newlines();
        }

        self.expect_token(Token::RBracket)?;
        Ok(values)
    }

    fn parse_literal(&mut self) -> Result<Spanned<Literal>, ParseError> {
        let tok = self.next_token()?;
        match tok.token {
            Token::Int(n) => Ok(Spanned::new(Literal::Int(n), tok.span)),
            Token::Float(f) => Ok(Spanned::new(Literal::Float(f), tok.span)),
            Token::Str(s) => Ok(Spanned::new(Literal::Str(s), tok.span)),
            Token::True => Ok(Spanned::new(Literal::Bool(true), tok.span)),
            Token::False => Ok(Spanned::new(Literal::Bool(false), tok.span)),
            Token::Null => Ok(Spanned::new(Literal::Null, tok.span)),
            Token::Minus => {
                let num = self.next_token()?;
                match num.token {
                    Token::Int(n) => Ok(Spanned::new(Literal::Int(-n), tok.span.merge(num.span))),
                    Token::Float(f) => {
                        Ok(Spanned::new(Literal::Float(-f), tok.span.merge(num.span)))
                    }
                    other => Err(ParseError::new(
                        format!("expected number after '-', found {:?}", other),
                        num.span,
                    )),
                }
            }
            other => Err(ParseError::new(
                format!("expected literal value, found {:?}", other),
                tok.span,
            )),
        }
    }

    fn parse_string_literal(&mut self) -> Result<Spanned<String>, ParseError> {
        let tok = self.next_token()?;
        match tok.token {
            Token::Str(s) => Ok(Spanned::new(s, tok.span)),
            other => Err(ParseError::new(
                format!("expected string literal, found {:?}", other),
                tok.span,
            )),
        }
    }
}
