//! Abstract syntax tree for snippets.
//!
//! A snippet is a sequence of statements; the last one may be a bare
//! expression whose value the executor echoes, REPL-style.

use crate::span::{Span, Spanned};

/// A parsed snippet: zero or more top-level statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Snippet {
    /// The statements in source order.
    pub statements: Vec<Stmt>,
}

impl Snippet {
    /// Detach the final statement when it is a bare expression.
    ///
    /// Returns the remaining statements plus the trailing expression,
    /// if any. This is the split the executor uses to replicate
    /// interactive-shell echo semantics.
    pub fn detach_trailing_expr(mut self) -> (Vec<Stmt>, Option<Expr>) {
        match self.statements.last() {
            Some(Stmt::Expr(_)) => {
                let Some(Stmt::Expr(expr)) = self.statements.pop() else {
                    unreachable!();
                };
                (self.statements, Some(expr))
            }
            _ => (self.statements, None),
        }
    }
}

/// A top-level statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// A `let name = expr` binding.
    Let {
        name: Spanned<String>,
        value: Expr,
        span: Span,
    },
    /// A bare expression, evaluated for its value or side effects.
    Expr(Expr),
    /// A `.schema [Entity]` command printing the field listing.
    Schema {
        entity: Option<Spanned<String>>,
        span: Span,
    },
}

impl Stmt {
    /// Get the span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Stmt::Let { span, .. } => *span,
            Stmt::Expr(e) => e.span(),
            Stmt::Schema { span, .. } => *span,
        }
    }
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value.
    Literal(Spanned<Literal>),
    /// A variable reference.
    Var(Spanned<String>),
    /// A unary operation (negation).
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        span: Span,
    },
    /// A binary arithmetic operation.
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    /// `print(expr)`: writes the value to the captured output and
    /// evaluates to the no-value sentinel.
    Print { value: Box<Expr>, span: Span },
    /// An entity query chain (findMany, findUnique, findFirst, count).
    Query(Query),
    /// An entity mutation chain (create, update, delete).
    Mutation(Mutation),
}

impl Expr {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal(l) => l.span,
            Expr::Var(v) => v.span,
            Expr::Unary { span, .. } => *span,
            Expr::Binary { span, .. } => *span,
            Expr::Print { span, .. } => *span,
            Expr::Query(q) => q.span,
            Expr::Mutation(m) => m.span,
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetic negation.
    Neg,
}

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// Addition; concatenation on strings.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Division; dividing by zero is a runtime error.
    Div,
}

/// A query chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// The entity being queried.
    pub entity: Spanned<String>,
    /// The query kind.
    pub kind: QueryKind,
    /// Chained clauses (where, include, orderBy, limit, offset).
    pub clauses: Vec<QueryClause>,
    /// The full span of the chain.
    pub span: Span,
}

/// Kind of query operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Find all matching records.
    FindMany,
    /// Find a unique record.
    FindUnique,
    /// Find the first matching record.
    FindFirst,
    /// Count matching records.
    Count,
}

/// A clause in a query chain.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryClause {
    Where(WhereClause),
    Include(IncludeClause),
    OrderBy(OrderByClause),
    Limit(Spanned<u32>),
    Offset(Spanned<u32>),
}

impl QueryClause {
    /// Get the span of this clause.
    pub fn span(&self) -> Span {
        match self {
            QueryClause::Where(w) => w.span,
            QueryClause::Include(i) => i.span,
            QueryClause::OrderBy(o) => o.span,
            QueryClause::Limit(l) => l.span,
            QueryClause::Offset(o) => o.span,
        }
    }
}

/// A where clause with a filter condition.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub condition: Filter,
    pub span: Span,
}

/// A filter condition in a where clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Comparison: field op value.
    Compare {
        field: Spanned<String>,
        op: CompareOp,
        value: Spanned<Literal>,
    },
    /// Membership: field in [values] / field not in [values].
    In {
        field: Spanned<String>,
        values: Vec<Spanned<Literal>>,
        negated: bool,
    },
    /// Null check: field is null / field is not null.
    IsNull {
        field: Spanned<String>,
        negated: bool,
    },
    /// Pattern match: field like "pat" / field not like "pat".
    Like {
        field: Spanned<String>,
        pattern: Spanned<String>,
        negated: bool,
    },
    /// Logical AND of conditions.
    And(Vec<Filter>),
    /// Logical OR of conditions.
    Or(Vec<Filter>),
}

/// Comparison operators in filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// An include clause loading a relation alongside the query results.
///
/// Only single-level relation names are accepted; nested paths are
/// rejected at parse time.
#[derive(Debug, Clone, PartialEq)]
pub struct IncludeClause {
    pub relation: Spanned<String>,
    pub span: Span,
}

/// An orderBy clause.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByClause {
    pub field: Spanned<String>,
    pub direction: SortDirection,
    pub span: Span,
}

/// Sort direction; ascending when not specified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Literal {
    /// Get a description of the literal type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Null => "null",
            Literal::Bool(_) => "bool",
            Literal::Int(_) => "int",
            Literal::Float(_) => "float",
            Literal::Str(_) => "string",
        }
    }
}

/// A mutation chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    /// The entity being mutated.
    pub entity: Spanned<String>,
    /// The mutation kind and its data.
    pub kind: MutationKind,
    /// The full span of the chain.
    pub span: Span,
}

/// Kind of mutation operation.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationKind {
    /// Create a new record.
    Create { data: ObjectLiteral },
    /// Update records matched by the where clauses.
    Update { clauses: Vec<MutationClause> },
    /// Delete records matched by the where clauses.
    Delete { clauses: Vec<MutationClause> },
}

/// A clause in an update/delete chain.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationClause {
    Where(WhereClause),
    Set(ObjectLiteral),
}

impl MutationClause {
    /// Get the span of this clause.
    pub fn span(&self) -> Span {
        match self {
            MutationClause::Where(w) => w.span,
            MutationClause::Set(o) => o.span,
        }
    }
}

/// An object literal `{ key: value, ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectLiteral {
    pub fields: Vec<ObjectField>,
    pub span: Span,
}

/// A field in an object literal.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectField {
    pub name: Spanned<String>,
    pub value: Spanned<Literal>,
}
