//! Snippet language for the ormpad playground.
//!
//! Snippets are short programs in an ORM-style DSL, one statement per
//! line (or separated by `;`). The last bare expression of a snippet is
//! echoed by the executor, the way an interactive shell would.
//!
//! # Syntax
//!
//! ## Queries
//!
//! ```text
//! Book.findMany()
//! Book.findMany().where(price > 20 && is_bestseller == true)
//! Book.findMany().include(reviews).orderBy(published_date.desc).limit(10)
//! Book.findFirst().where(isbn == "9780000000001")
//! Book.count()
//! ```
//!
//! ## Mutations
//!
//! ```text
//! Author.create({ first_name: "Jane", last_name: "Austen", email: "jane@example.com" })
//! Book.update().where(id == 3).set({ price: 9.99 })
//! Review.delete().where(reviewer_name like "Bot%")
//! ```
//!
//! ## Bindings, printing, arithmetic
//!
//! ```text
//! let total = Book.count()
//! print("books in stock:")
//! total * 2 + 1
//! ```
//!
//! ## Schema commands
//!
//! ```text
//! .schema
//! .schema Book
//! ```
//!
//! # Usage
//!
//! ```rust
//! use ormpad_lang::parse;
//!
//! let snippet = parse("let x = 1\nx + 1").unwrap();
//! assert_eq!(snippet.statements.len(), 2);
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod span;

// Re-export main types
pub use ast::{
    BinOp, CompareOp, Expr, Filter, IncludeClause, Literal, Mutation, MutationClause,
    MutationKind, ObjectField, ObjectLiteral, OrderByClause, Query, QueryClause, QueryKind,
    Snippet, SortDirection, Stmt, UnaryOp, WhereClause,
};
pub use error::ParseError;
pub use span::{Span, Spanned};

/// Parse a snippet source string into an AST.
///
/// # Example
///
/// ```rust
/// use ormpad_lang::parse;
///
/// let snippet = parse("Book.findMany()").unwrap();
/// ```
pub fn parse(source: &str) -> Result<Snippet, ParseError> {
    parser::parse(source)
}

/// Tokenize a source string (for debugging/testing).
pub fn tokenize(source: &str) -> Result<Vec<lexer::SpannedToken>, ParseError> {
    lexer::tokenize(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query() {
        let snippet = parse(r#"Book.findMany().where(title like "The%")"#).unwrap();
        assert_eq!(snippet.statements.len(), 1);
    }

    #[test]
    fn test_parse_full_snippet() {
        let source = r#"
# create an author, then look at the shelf
Author.create({ first_name: "Iris", last_name: "Quill", email: "iris@example.com" })
let n = Author.count()
print(n)
Book.findMany().limit(3)
"#;
        let snippet = parse(source).unwrap();
        assert_eq!(snippet.statements.len(), 4);
    }

    #[test]
    fn test_error_with_source_context() {
        let source = "Book.findMany().where(price = 10)";
        let err = parse(source).unwrap_err();
        let formatted = err.format_with_source(source);
        assert!(formatted.contains("line 1"));
        assert!(formatted.contains("error"));
    }

    #[test]
    fn test_trailing_expression_split() {
        let snippet = parse("let x = 2\nx * 3").unwrap();
        let (rest, trailing) = snippet.detach_trailing_expr();
        assert_eq!(rest.len(), 1);
        assert!(trailing.is_some());
    }
}
