//! Snippet execution engine for the ormpad playground.
//!
//! Takes parsed snippets from `ormpad-lang`, generates SQL against the
//! catalog from `ormpad-schema`, runs it on SQLite, and hands back the
//! captured output plus a pretty-printed query trace.
//!
//! ```rust
//! use ormpad_engine::Engine;
//! use ormpad_schema::bookstore;
//!
//! let mut engine = Engine::in_memory(bookstore()).unwrap();
//! let outcome = engine.run("1 + 1");
//! assert_eq!(outcome.output, "2\n");
//! ```

pub mod db;
pub mod error;
pub mod executor;
pub mod seed;
pub mod sql;
pub mod trace;
pub mod value;

pub use db::Database;
pub use error::{EngineError, EngineResult};
pub use executor::{Engine, RunOutcome};
pub use seed::populate;
pub use trace::{format_sql, QueryLog, TracedQuery};
pub use value::{Record, Value};
