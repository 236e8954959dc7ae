//! The snippet executor.
//!
//! Runs a parsed snippet against the database: statements execute in a
//! fresh scope, printed output accumulates in a per-run buffer, and the
//! value of a trailing bare expression is echoed the way an interactive
//! shell would. Errors of any kind become a single `Error: <message>`
//! line in the captured output; a run itself never fails.

use std::collections::HashMap;
use std::time::Instant;

use ormpad_lang::{
    BinOp, Expr, Mutation, MutationClause, MutationKind, Query, QueryClause, QueryKind, Stmt,
    UnaryOp,
};
use ormpad_schema::{describe_entity, AppSchema, EntityDef, EntityInfo};

use crate::db::Database;
use crate::error::{EngineError, EngineResult};
use crate::sql::{self, SelectParts};
use crate::trace::TracedQuery;
use crate::value::{Record, Value};

/// Variable bindings for one run.
type Scope = HashMap<String, Value>;

/// The result of running one snippet.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Captured output, including any `Error:` line.
    pub output: String,
    /// SQL issued during the run, in order, pretty-printed.
    pub queries: Vec<TracedQuery>,
    /// Wall time of the run, rounded to 4 decimal places.
    pub elapsed_seconds: f64,
}

/// Executes snippets against one database and schema.
pub struct Engine {
    db: Database,
    schema: AppSchema,
}

impl Engine {
    pub fn new(db: Database, schema: AppSchema) -> Self {
        Self { db, schema }
    }

    /// An in-memory engine with the schema's tables created.
    pub fn in_memory(schema: AppSchema) -> EngineResult<Self> {
        let db = Database::open_in_memory()?;
        db.create_tables(&schema)?;
        Ok(Self::new(db, schema))
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn schema(&self) -> &AppSchema {
        &self.schema
    }

    /// Run a snippet; never fails. Drains the query trace it produced.
    pub fn run(&mut self, source: &str) -> RunOutcome {
        let started = Instant::now();
        // Anything still in the log belongs to no run; discard it.
        self.db.log().take();

        let mut output = String::new();
        if let Err(err) = self.run_inner(source, &mut output) {
            output.push_str(&format!("Error: {}\n", err));
        }

        let queries = self.db.log().take();
        let elapsed_seconds = round4(started.elapsed().as_secs_f64());
        tracing::debug!(
            source_len = source.len(),
            queries = queries.len(),
            elapsed_seconds,
            "snippet executed"
        );

        RunOutcome {
            output,
            queries,
            elapsed_seconds,
        }
    }

    fn run_inner(&self, source: &str, out: &mut String) -> EngineResult<()> {
        let snippet = ormpad_lang::parse(source)?;
        let (statements, trailing) = snippet.detach_trailing_expr();

        let mut scope = Scope::new();
        for stmt in &statements {
            self.exec_stmt(stmt, &mut scope, out)?;
        }

        if let Some(expr) = trailing {
            let value = self.eval(&expr, &mut scope, out)?;
            if !matches!(value, Value::Unit) {
                out.push_str(&value.to_string());
                out.push('\n');
            }
        }

        Ok(())
    }

    fn exec_stmt(&self, stmt: &Stmt, scope: &mut Scope, out: &mut String) -> EngineResult<()> {
        match stmt {
            Stmt::Let { name, value, .. } => {
                let value = self.eval(value, scope, out)?;
                scope.insert(name.value.clone(), value);
            }
            Stmt::Expr(expr) => {
                self.eval(expr, scope, out)?;
            }
            Stmt::Schema { entity, .. } => {
                self.write_schema(entity.as_ref().map(|e| e.value.as_str()), out)?;
            }
        }
        Ok(())
    }

    fn eval(&self, expr: &Expr, scope: &mut Scope, out: &mut String) -> EngineResult<Value> {
        match expr {
            Expr::Literal(lit) => Ok(Value::from(&lit.value)),
            Expr::Var(name) => scope
                .get(&name.value)
                .cloned()
                .ok_or_else(|| EngineError::UndefinedVariable(name.value.clone())),
            Expr::Unary { op, operand, .. } => {
                let value = self.eval(operand, scope, out)?;
                match (op, value) {
                    (UnaryOp::Neg, Value::Int(n)) => Ok(Value::Int(-n)),
                    (UnaryOp::Neg, Value::Float(x)) => Ok(Value::Float(-x)),
                    (UnaryOp::Neg, other) => Err(EngineError::TypeMismatch(format!(
                        "cannot negate {}",
                        other.type_name()
                    ))),
                }
            }
            Expr::Binary {
                op, left, right, ..
            } => {
                let left = self.eval(left, scope, out)?;
                let right = self.eval(right, scope, out)?;
                eval_binary(*op, left, right)
            }
            Expr::Print { value, .. } => {
                let value = self.eval(value, scope, out)?;
                out.push_str(&value.to_string());
                out.push('\n');
                Ok(Value::Unit)
            }
            Expr::Query(query) => self.eval_query(query),
            Expr::Mutation(mutation) => self.eval_mutation(mutation),
        }
    }

    fn eval_query(&self, query: &Query) -> EngineResult<Value> {
        let entity = self.entity(&query.entity.value)?;

        let mut parts = SelectParts::default();
        let mut includes = Vec::new();
        for clause in &query.clauses {
            match clause {
                QueryClause::Where(w) => parts.filters.push(&w.condition),
                QueryClause::Include(i) => includes.push(i.relation.value.as_str()),
                QueryClause::OrderBy(o) => parts.order = Some(o),
                QueryClause::Limit(n) => parts.limit = Some(n.value),
                QueryClause::Offset(n) => parts.offset = Some(n.value),
            }
        }

        if query.kind == QueryKind::Count {
            let sql = sql::build_count(&self.schema, entity, &parts.filters)?;
            let rows = self.db.query(&sql)?;
            let count = rows
                .first()
                .and_then(|row| row.first())
                .map(|(_, value)| value.clone())
                .unwrap_or(Value::Int(0));
            return Ok(count);
        }

        // A single-record lookup only ever needs one row.
        if matches!(query.kind, QueryKind::FindUnique | QueryKind::FindFirst) {
            parts.limit = Some(1);
        }

        let sql = sql::build_select(&self.schema, entity, &parts)?;
        let mut records: Vec<Record> = self
            .db
            .query(&sql)?
            .into_iter()
            .map(|fields| Record {
                entity: entity.name.clone(),
                fields,
            })
            .collect();

        for relation in includes {
            self.load_relation(entity, &mut records, relation)?;
        }

        match query.kind {
            QueryKind::FindMany => Ok(Value::Rows(records)),
            QueryKind::FindUnique | QueryKind::FindFirst => Ok(records
                .into_iter()
                .next()
                .map(Value::Record)
                .unwrap_or(Value::Null)),
            QueryKind::Count => unreachable!("count handled above"),
        }
    }

    /// Attach an included relation to every fetched record, with a
    /// single batched statement for the related rows.
    fn load_relation(
        &self,
        entity: &EntityDef,
        records: &mut [Record],
        relation: &str,
    ) -> EngineResult<()> {
        let (rel, reverse) = self
            .schema
            .find_relation(&entity.name, relation)
            .ok_or_else(|| EngineError::UnknownRelation {
                entity: entity.name.clone(),
                relation: relation.to_string(),
            })?;

        if !reverse {
            // These records carry the foreign key; fetch their targets.
            let target = self.entity(&rel.to_entity)?;
            let mut ids: Vec<i64> = records
                .iter()
                .filter_map(|r| r.get_int(&rel.from_field))
                .collect();
            ids.sort_unstable();
            ids.dedup();

            let mut related: HashMap<i64, Record> = HashMap::new();
            if !ids.is_empty() {
                let sql = sql::build_in_fetch(&target.table, &rel.to_field, &ids);
                for fields in self.db.query(&sql)? {
                    let record = Record {
                        entity: target.name.clone(),
                        fields,
                    };
                    if let Some(id) = record.get_int(&rel.to_field) {
                        related.insert(id, record);
                    }
                }
            }

            for record in records.iter_mut() {
                let value = record
                    .get_int(&rel.from_field)
                    .and_then(|id| related.get(&id).cloned())
                    .map(Value::Record)
                    .unwrap_or(Value::Null);
                record.fields.push((rel.name.clone(), value));
            }
        } else {
            // These records are the target; fetch the rows pointing at
            // them and group per parent.
            let child = self.entity(&rel.from_entity)?;
            let ids: Vec<i64> = records
                .iter()
                .filter_map(|r| r.get_int(&rel.to_field))
                .collect();

            let mut grouped: HashMap<i64, Vec<Record>> = HashMap::new();
            if !ids.is_empty() {
                let sql = sql::build_in_fetch(&child.table, &rel.from_field, &ids);
                for fields in self.db.query(&sql)? {
                    let record = Record {
                        entity: child.name.clone(),
                        fields,
                    };
                    if let Some(parent) = record.get_int(&rel.from_field) {
                        grouped.entry(parent).or_default().push(record);
                    }
                }
            }

            for record in records.iter_mut() {
                let children = record
                    .get_int(&rel.to_field)
                    .and_then(|id| grouped.remove(&id))
                    .unwrap_or_default();
                record.fields.push((rel.accessor.clone(), Value::Rows(children)));
            }
        }

        Ok(())
    }

    fn eval_mutation(&self, mutation: &Mutation) -> EngineResult<Value> {
        let entity = self.entity(&mutation.entity.value)?;

        match &mutation.kind {
            MutationKind::Create { data } => {
                let sql = sql::build_insert(&self.schema, entity, data)?;
                self.db.execute(&sql)?;
                let id = self.db.last_insert_rowid();

                let mut fields = vec![("id".to_string(), Value::Int(id))];
                for field in &data.fields {
                    fields.push((field.name.value.clone(), Value::from(&field.value.value)));
                }
                Ok(Value::Record(Record {
                    entity: entity.name.clone(),
                    fields,
                }))
            }
            MutationKind::Update { clauses } => {
                let (filters, set) = split_mutation_clauses(clauses);
                let set = set.ok_or_else(|| {
                    EngineError::Unsupported(format!(
                        "update on {} requires a set({{...}}) clause",
                        entity.name
                    ))
                })?;
                let sql = sql::build_update(&self.schema, entity, set, &filters)?;
                Ok(Value::Affected(self.db.execute(&sql)?))
            }
            MutationKind::Delete { clauses } => {
                let (filters, _) = split_mutation_clauses(clauses);
                let sql = sql::build_delete(&self.schema, entity, &filters)?;
                Ok(Value::Affected(self.db.execute(&sql)?))
            }
        }
    }

    fn write_schema(&self, entity: Option<&str>, out: &mut String) -> EngineResult<()> {
        let infos: Vec<EntityInfo> = match entity {
            Some(name) => vec![describe_entity(&self.schema, self.entity(name)?)],
            None => self
                .schema
                .entities
                .iter()
                .map(|e| describe_entity(&self.schema, e))
                .collect(),
        };

        for (i, info) in infos.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&info.name);
            out.push('\n');
            for field in &info.fields {
                out.push_str(&format!("  {}: {}", field.name, field.data_type));
                if let Some(model) = &field.related_model {
                    out.push_str(&format!(" -> {}", model));
                }
                out.push('\n');
            }
        }
        Ok(())
    }

    fn entity(&self, name: &str) -> EngineResult<&EntityDef> {
        self.schema
            .get_entity(name)
            .ok_or_else(|| EngineError::UnknownEntity(name.to_string()))
    }
}

fn eval_binary(op: BinOp, left: Value, right: Value) -> EngineResult<Value> {
    use Value::{Float, Int, Str};

    match (op, left, right) {
        (BinOp::Add, Str(a), Str(b)) => Ok(Str(a + &b)),

        (BinOp::Add, Int(a), Int(b)) => Ok(Int(a.wrapping_add(b))),
        (BinOp::Sub, Int(a), Int(b)) => Ok(Int(a.wrapping_sub(b))),
        (BinOp::Mul, Int(a), Int(b)) => Ok(Int(a.wrapping_mul(b))),
        (BinOp::Div, Int(_), Int(0)) => Err(EngineError::DivisionByZero),
        (BinOp::Div, Int(a), Int(b)) => Ok(Int(a.wrapping_div(b))),

        (op, a, b) if is_numeric(&a) && is_numeric(&b) => {
            let (a, b) = (as_float(&a), as_float(&b));
            match op {
                BinOp::Add => Ok(Float(a + b)),
                BinOp::Sub => Ok(Float(a - b)),
                BinOp::Mul => Ok(Float(a * b)),
                BinOp::Div if b == 0.0 => Err(EngineError::DivisionByZero),
                BinOp::Div => Ok(Float(a / b)),
            }
        }

        (op, a, b) => {
            let verb = match op {
                BinOp::Add => "add",
                BinOp::Sub => "subtract",
                BinOp::Mul => "multiply",
                BinOp::Div => "divide",
            };
            Err(EngineError::TypeMismatch(format!(
                "cannot {} {} and {}",
                verb,
                a.type_name(),
                b.type_name()
            )))
        }
    }
}

fn is_numeric(value: &Value) -> bool {
    matches!(value, Value::Int(_) | Value::Float(_))
}

fn as_float(value: &Value) -> f64 {
    match value {
        Value::Int(n) => *n as f64,
        Value::Float(x) => *x,
        _ => 0.0,
    }
}

fn split_mutation_clauses(
    clauses: &[MutationClause],
) -> (Vec<&ormpad_lang::Filter>, Option<&ormpad_lang::ObjectLiteral>) {
    let mut filters = Vec::new();
    let mut set = None;
    for clause in clauses {
        match clause {
            MutationClause::Where(w) => filters.push(&w.condition),
            MutationClause::Set(obj) => set = Some(obj),
        }
    }
    (filters, set)
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round4() {
        assert_eq!(round4(0.123456), 0.1235);
        assert_eq!(round4(0.0), 0.0);
        assert_eq!(round4(1.00004), 1.0);
    }

    #[test]
    fn test_eval_binary_arithmetic() {
        assert_eq!(
            eval_binary(BinOp::Add, Value::Int(1), Value::Int(1)).unwrap(),
            Value::Int(2)
        );
        assert_eq!(
            eval_binary(BinOp::Add, Value::Int(1), Value::Float(1.5)).unwrap(),
            Value::Float(2.5)
        );
        assert_eq!(
            eval_binary(BinOp::Div, Value::Int(7), Value::Int(2)).unwrap(),
            Value::Int(3)
        );
        assert_eq!(
            eval_binary(BinOp::Add, Value::Str("a".into()), Value::Str("b".into())).unwrap(),
            Value::Str("ab".into())
        );
    }

    #[test]
    fn test_eval_binary_errors() {
        assert!(matches!(
            eval_binary(BinOp::Div, Value::Int(1), Value::Int(0)),
            Err(EngineError::DivisionByZero)
        ));
        assert!(matches!(
            eval_binary(BinOp::Div, Value::Float(1.0), Value::Int(0)),
            Err(EngineError::DivisionByZero)
        ));
        assert!(matches!(
            eval_binary(BinOp::Add, Value::Int(1), Value::Str("x".into())),
            Err(EngineError::TypeMismatch(_))
        ));
    }
}
