//! SQLite data layer.
//!
//! Wraps a rusqlite connection with query tracing and DDL generation
//! from the schema catalog. Foreign keys are enforced; deletes cascade
//! where the catalog says so.

use std::cell::Cell;
use std::path::Path;
use std::time::Instant;

use ormpad_schema::{AppSchema, DefaultValue, DeleteBehavior, EntityDef, FieldDef, ScalarType};
use rusqlite::Connection;

use crate::error::EngineResult;
use crate::sql::escape_str;
use crate::trace::QueryLog;
use crate::value::Value;

/// A traced SQLite database handle.
pub struct Database {
    conn: Connection,
    log: QueryLog,
    recording: Cell<bool>,
}

impl Database {
    /// Open an in-memory database.
    pub fn open_in_memory() -> EngineResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    /// Open (or create) a database file.
    pub fn open(path: impl AsRef<Path>) -> EngineResult<Self> {
        Self::init(Connection::open(path)?)
    }

    fn init(conn: Connection) -> EngineResult<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn,
            log: QueryLog::new(),
            recording: Cell::new(true),
        })
    }

    /// The query trace collector.
    pub fn log(&self) -> &QueryLog {
        &self.log
    }

    /// Toggle query recording; returns the previous setting.
    pub fn set_recording(&self, on: bool) -> bool {
        self.recording.replace(on)
    }

    /// Create one table per entity in the schema, untraced.
    pub fn create_tables(&self, schema: &AppSchema) -> EngineResult<()> {
        let prev = self.set_recording(false);
        let result = (|| {
            for entity in &schema.entities {
                let ddl = create_table_sql(schema, entity);
                tracing::debug!(table = %entity.table, "creating table");
                self.conn.execute_batch(&ddl)?;
            }
            Ok(())
        })();
        self.set_recording(prev);
        result
    }

    /// Execute a statement, returning the number of affected rows.
    pub fn execute(&self, sql: &str) -> EngineResult<usize> {
        let started = Instant::now();
        let changed = self.conn.execute(sql, [])?;
        self.trace(sql, started);
        Ok(changed)
    }

    /// Run a query, returning rows as ordered (column, value) pairs.
    pub fn query(&self, sql: &str) -> EngineResult<Vec<Vec<(String, Value)>>> {
        let started = Instant::now();
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Vec::with_capacity(columns.len());
            for (i, column) in columns.iter().enumerate() {
                record.push((column.clone(), Value::from_sql(row.get_ref(i)?)));
            }
            out.push(record);
        }
        drop(rows);
        drop(stmt);

        self.trace(sql, started);
        Ok(out)
    }

    /// Rowid of the most recent successful INSERT.
    pub fn last_insert_rowid(&self) -> i64 {
        self.conn.last_insert_rowid()
    }

    fn trace(&self, sql: &str, started: Instant) {
        if self.recording.get() {
            self.log.record(sql, started.elapsed().as_secs_f64());
        }
    }
}

/// Render the CREATE TABLE statement for one entity.
pub fn create_table_sql(schema: &AppSchema, entity: &EntityDef) -> String {
    let mut parts: Vec<String> = entity.fields.iter().map(column_ddl).collect();

    for rel in schema.relations_from(&entity.name) {
        let Some(target) = schema.get_entity(&rel.to_entity) else {
            continue;
        };
        let behavior = match rel.on_delete {
            DeleteBehavior::Cascade => "CASCADE",
            DeleteBehavior::Restrict => "RESTRICT",
            DeleteBehavior::SetNull => "SET NULL",
        };
        parts.push(format!(
            "FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE {}",
            rel.from_field, target.table, rel.to_field, behavior
        ));
    }

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n);",
        entity.table,
        parts.join(",\n  ")
    )
}

fn column_ddl(field: &FieldDef) -> String {
    if field.scalar == ScalarType::Serial {
        return format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", field.name);
    }

    let mut ddl = format!("{} {}", field.name, field.scalar.storage_type());
    if field.required {
        ddl.push_str(" NOT NULL");
    }
    if field.unique {
        ddl.push_str(" UNIQUE");
    }
    if let Some((min, max)) = field.check_range {
        ddl.push_str(&format!(" CHECK ({} BETWEEN {} AND {})", field.name, min, max));
    }
    match &field.default {
        Some(DefaultValue::Bool(b)) => ddl.push_str(&format!(" DEFAULT {}", u8::from(*b))),
        Some(DefaultValue::Int(n)) => ddl.push_str(&format!(" DEFAULT {}", n)),
        Some(DefaultValue::Str(s)) => ddl.push_str(&format!(" DEFAULT '{}'", escape_str(s))),
        Some(DefaultValue::CurrentTimestamp) => ddl.push_str(" DEFAULT CURRENT_TIMESTAMP"),
        None => {}
    }
    ddl
}
