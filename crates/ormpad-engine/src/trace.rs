//! Query trace collection and SQL pretty-printing.
//!
//! Every statement the data layer issues is recorded in order with its
//! wall time; the collector is drained once per snippet run. SQL text is
//! pretty-printed before being handed out: keywords upper-cased and
//! major clauses re-indented onto their own lines.

use parking_lot::Mutex;
use serde::Serialize;
use sqlparser::dialect::SQLiteDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, Tokenizer};

/// One traced SQL statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TracedQuery {
    /// Pretty-printed SQL text.
    pub sql: String,
    /// Wall time in seconds, 4 decimal places.
    pub time: String,
}

/// Ordered collector of traced queries.
///
/// The collector only stores and formats; whether a statement gets
/// recorded at all is decided by the data layer's recording flag.
#[derive(Debug, Default)]
pub struct QueryLog {
    entries: Mutex<Vec<TracedQuery>>,
}

impl QueryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one executed statement with its wall time in seconds.
    pub fn record(&self, sql: &str, seconds: f64) {
        let entry = TracedQuery {
            sql: format_sql(sql),
            time: format!("{:.4}", seconds),
        };
        tracing::trace!(sql, time = %entry.time, "query traced");
        self.entries.lock().push(entry);
    }

    /// Drain all recorded queries, leaving the log empty.
    pub fn take(&self) -> Vec<TracedQuery> {
        std::mem::take(&mut *self.entries.lock())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// Clauses that start a new line at column zero.
const CLAUSE_KEYWORDS: [&str; 8] = [
    "FROM", "WHERE", "VALUES", "SET", "ORDER", "GROUP", "LIMIT", "OFFSET",
];

/// Pretty-print a SQL statement: upper-case keywords, major clauses on
/// their own lines, `AND`/`OR` indented beneath the clause they extend.
///
/// Falls back to the raw text when it does not tokenize.
pub fn format_sql(sql: &str) -> String {
    let dialect = SQLiteDialect {};
    let tokens = match Tokenizer::new(&dialect, sql).tokenize() {
        Ok(tokens) => tokens,
        Err(_) => return sql.to_string(),
    };

    let mut out = String::new();
    for token in &tokens {
        match token {
            Token::Whitespace(_) => {
                if !out.is_empty() && !out.ends_with([' ', '\n']) {
                    out.push(' ');
                }
            }
            Token::Word(word) if word.keyword != Keyword::NoKeyword && word.quote_style.is_none() => {
                let upper = word.value.to_uppercase();
                if CLAUSE_KEYWORDS.contains(&upper.as_str()) {
                    break_line(&mut out, 0);
                } else if upper == "AND" || upper == "OR" {
                    break_line(&mut out, 2);
                }
                out.push_str(&upper);
            }
            other => {
                if matches!(other, Token::Comma | Token::RParen) && out.ends_with(' ') {
                    out.pop();
                }
                out.push_str(&other.to_string());
            }
        }
    }

    out.trim().to_string()
}

fn break_line(out: &mut String, indent: usize) {
    while out.ends_with(' ') {
        out.pop();
    }
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    for _ in 0..indent {
        out.push(' ');
    }
}
