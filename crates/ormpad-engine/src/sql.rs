//! SQL generation from parsed snippet chains.
//!
//! Literals are rendered inline (escaped), so the traced SQL is exactly
//! what ran. Field names in filters resolve against the catalog; a
//! forward relation name stands in for its foreign-key column, so
//! `where(author == 3)` filters on `author_id`.

use ormpad_lang::{CompareOp, Filter, Literal, ObjectLiteral, OrderByClause, SortDirection};
use ormpad_schema::{AppSchema, EntityDef};

use crate::error::{EngineError, EngineResult};

/// Escape a string for inclusion in a single-quoted SQL literal.
pub fn escape_str(s: &str) -> String {
    s.replace('\'', "''")
}

/// Render a snippet literal as SQL text.
pub fn literal_sql(lit: &Literal) -> String {
    match lit {
        Literal::Null => "NULL".to_string(),
        Literal::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        Literal::Int(n) => n.to_string(),
        Literal::Float(x) => x.to_string(),
        Literal::Str(s) => format!("'{}'", escape_str(s)),
    }
}

/// Resolve a filter or assignment name to a column on `entity`.
///
/// Plain columns resolve to themselves; a forward relation name maps to
/// its foreign-key column. Anything else is an unknown-field error.
pub fn resolve_column(
    schema: &AppSchema,
    entity: &EntityDef,
    name: &str,
) -> EngineResult<String> {
    if entity.has_field(name) {
        return Ok(name.to_string());
    }
    if let Some((rel, false)) = schema.find_relation(&entity.name, name) {
        return Ok(rel.from_field.clone());
    }
    Err(EngineError::UnknownField {
        entity: entity.name.clone(),
        field: name.to_string(),
    })
}

/// Select-side clauses collected from a query chain.
#[derive(Debug, Default)]
pub struct SelectParts<'a> {
    pub filters: Vec<&'a Filter>,
    pub order: Option<&'a OrderByClause>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Build a `SELECT *` statement for the chain.
pub fn build_select(
    schema: &AppSchema,
    entity: &EntityDef,
    parts: &SelectParts<'_>,
) -> EngineResult<String> {
    let mut sql = format!("SELECT * FROM {}", entity.table);
    push_where(&mut sql, schema, entity, &parts.filters)?;

    if let Some(order) = parts.order {
        let column = resolve_column(schema, entity, &order.field.value)?;
        let direction = match order.direction {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        };
        sql.push_str(&format!(" ORDER BY {} {}", column, direction));
    }

    match (parts.limit, parts.offset) {
        (Some(limit), Some(offset)) => sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset)),
        (Some(limit), None) => sql.push_str(&format!(" LIMIT {}", limit)),
        // SQLite requires a LIMIT to accept an OFFSET.
        (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {}", offset)),
        (None, None) => {}
    }

    Ok(sql)
}

/// Build a `SELECT COUNT(*)` statement for the chain.
pub fn build_count(
    schema: &AppSchema,
    entity: &EntityDef,
    filters: &[&Filter],
) -> EngineResult<String> {
    let mut sql = format!("SELECT COUNT(*) AS n FROM {}", entity.table);
    push_where(&mut sql, schema, entity, filters)?;
    Ok(sql)
}

/// Build an INSERT from a create payload.
pub fn build_insert(
    schema: &AppSchema,
    entity: &EntityDef,
    data: &ObjectLiteral,
) -> EngineResult<String> {
    if data.fields.is_empty() {
        return Err(EngineError::Unsupported(format!(
            "create on {} requires at least one field",
            entity.name
        )));
    }

    let mut columns = Vec::with_capacity(data.fields.len());
    let mut values = Vec::with_capacity(data.fields.len());
    for field in &data.fields {
        columns.push(resolve_column(schema, entity, &field.name.value)?);
        values.push(literal_sql(&field.value.value));
    }

    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        entity.table,
        columns.join(", "),
        values.join(", ")
    ))
}

/// Build an UPDATE from a set payload and where filters.
pub fn build_update(
    schema: &AppSchema,
    entity: &EntityDef,
    set: &ObjectLiteral,
    filters: &[&Filter],
) -> EngineResult<String> {
    if set.fields.is_empty() {
        return Err(EngineError::Unsupported(format!(
            "update on {} requires at least one field in set({{...}})",
            entity.name
        )));
    }

    let assignments: Vec<String> = set
        .fields
        .iter()
        .map(|field| {
            Ok(format!(
                "{} = {}",
                resolve_column(schema, entity, &field.name.value)?,
                literal_sql(&field.value.value)
            ))
        })
        .collect::<EngineResult<_>>()?;

    let mut sql = format!("UPDATE {} SET {}", entity.table, assignments.join(", "));
    push_where(&mut sql, schema, entity, filters)?;
    Ok(sql)
}

/// Build a DELETE from where filters.
pub fn build_delete(
    schema: &AppSchema,
    entity: &EntityDef,
    filters: &[&Filter],
) -> EngineResult<String> {
    let mut sql = format!("DELETE FROM {}", entity.table);
    push_where(&mut sql, schema, entity, filters)?;
    Ok(sql)
}

/// Fetch rows of `table` whose `column` is one of `ids`, for loading
/// included relations in one statement.
pub fn build_in_fetch(table: &str, column: &str, ids: &[i64]) -> String {
    let list: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    format!(
        "SELECT * FROM {} WHERE {} IN ({}) ORDER BY id ASC",
        table,
        column,
        list.join(", ")
    )
}

fn push_where(
    sql: &mut String,
    schema: &AppSchema,
    entity: &EntityDef,
    filters: &[&Filter],
) -> EngineResult<()> {
    if filters.is_empty() {
        return Ok(());
    }
    let rendered: Vec<String> = filters
        .iter()
        .map(|f| filter_sql(schema, entity, f, filters.len() > 1))
        .collect::<EngineResult<_>>()?;
    sql.push_str(" WHERE ");
    sql.push_str(&rendered.join(" AND "));
    Ok(())
}

/// Render one filter condition. `grouped` parenthesizes a top-level OR
/// when the condition is being AND-ed with siblings.
fn filter_sql(
    schema: &AppSchema,
    entity: &EntityDef,
    filter: &Filter,
    grouped: bool,
) -> EngineResult<String> {
    let sql = match filter {
        Filter::Compare { field, op, value } => {
            let column = resolve_column(schema, entity, &field.value)?;
            let op = match op {
                CompareOp::Eq => "=",
                CompareOp::Ne => "<>",
                CompareOp::Lt => "<",
                CompareOp::Le => "<=",
                CompareOp::Gt => ">",
                CompareOp::Ge => ">=",
            };
            format!("{} {} {}", column, op, literal_sql(&value.value))
        }
        Filter::In {
            field,
            values,
            negated,
        } => {
            let column = resolve_column(schema, entity, &field.value)?;
            if values.is_empty() {
                // Empty list: nothing matches (or everything, negated).
                return Ok(if *negated { "1 = 1" } else { "0 = 1" }.to_string());
            }
            let list: Vec<String> = values.iter().map(|v| literal_sql(&v.value)).collect();
            format!(
                "{} {} ({})",
                column,
                if *negated { "NOT IN" } else { "IN" },
                list.join(", ")
            )
        }
        Filter::IsNull { field, negated } => {
            let column = resolve_column(schema, entity, &field.value)?;
            format!(
                "{} {}",
                column,
                if *negated { "IS NOT NULL" } else { "IS NULL" }
            )
        }
        Filter::Like {
            field,
            pattern,
            negated,
        } => {
            let column = resolve_column(schema, entity, &field.value)?;
            format!(
                "{} {} '{}'",
                column,
                if *negated { "NOT LIKE" } else { "LIKE" },
                escape_str(&pattern.value)
            )
        }
        Filter::And(parts) => {
            let rendered: Vec<String> = parts
                .iter()
                .map(|p| filter_sql(schema, entity, p, true))
                .collect::<EngineResult<_>>()?;
            rendered.join(" AND ")
        }
        Filter::Or(parts) => {
            let rendered: Vec<String> = parts
                .iter()
                .map(|p| filter_sql(schema, entity, p, false))
                .collect::<EngineResult<_>>()?;
            let joined = rendered.join(" OR ");
            if grouped {
                format!("({})", joined)
            } else {
                joined
            }
        }
    };
    Ok(sql)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ormpad_lang::{Expr, QueryClause, Stmt};
    use ormpad_schema::bookstore;
    use pretty_assertions::assert_eq;

    fn book_filter(source: &str) -> Filter {
        // Parse a full chain and pull the where condition back out.
        let snippet = ormpad_lang::parse(source).unwrap();
        let Some(Stmt::Expr(Expr::Query(query))) = snippet.statements.into_iter().next() else {
            panic!("expected a query statement");
        };
        let Some(QueryClause::Where(clause)) = query.clauses.into_iter().next() else {
            panic!("expected a where clause");
        };
        clause.condition
    }

    fn render(filter: &Filter) -> String {
        let schema = bookstore();
        let book = schema.get_entity("Book").unwrap();
        filter_sql(&schema, book, filter, false).unwrap()
    }

    #[test]
    fn test_escape_single_quotes() {
        assert_eq!(escape_str("O'Brien"), "O''Brien");
        assert_eq!(literal_sql(&Literal::Str("O'Brien".into())), "'O''Brien'");
    }

    #[test]
    fn test_comparison_filters() {
        let filter = book_filter("Book.findMany().where(price > 20)");
        assert_eq!(render(&filter), "price > 20");

        let filter = book_filter(r#"Book.findMany().where(title != "X")"#);
        assert_eq!(render(&filter), "title <> 'X'");
    }

    #[test]
    fn test_relation_name_resolves_to_fk_column() {
        let filter = book_filter("Book.findMany().where(author == 3)");
        assert_eq!(render(&filter), "author_id = 3");
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let schema = bookstore();
        let book = schema.get_entity("Book").unwrap();
        let filter = book_filter("Book.findMany().where(pages > 100)");
        let err = filter_sql(&schema, book, &filter, false).unwrap_err();
        assert!(matches!(err, EngineError::UnknownField { .. }));
    }

    #[test]
    fn test_or_inside_and_is_parenthesized() {
        let filter = book_filter(
            r#"Book.findMany().where(price > 20 && (title like "A%" || title like "B%"))"#,
        );
        let sql = render(&filter);
        assert_eq!(sql, "price > 20 AND (title LIKE 'A%' OR title LIKE 'B%')");
    }

    #[test]
    fn test_null_and_in_filters() {
        let filter = book_filter("Book.findMany().where(description is not null)");
        assert_eq!(render(&filter), "description IS NOT NULL");

        let filter = book_filter("Book.findMany().where(id in [1, 2, 3])");
        assert_eq!(render(&filter), "id IN (1, 2, 3)");

        let filter = book_filter("Book.findMany().where(id not in [4])");
        assert_eq!(render(&filter), "id NOT IN (4)");
    }

    #[test]
    fn test_build_select_with_everything() {
        let schema = bookstore();
        let book = schema.get_entity("Book").unwrap();
        let filter = book_filter("Book.findMany().where(price > 20)");
        let snippet = ormpad_lang::parse("Book.findMany().orderBy(title.desc)").unwrap();
        let Some(Stmt::Expr(Expr::Query(query))) = snippet.statements.into_iter().next() else {
            panic!("expected a query");
        };
        let Some(QueryClause::OrderBy(order)) = query.clauses.into_iter().next() else {
            panic!("expected orderBy");
        };

        let parts = SelectParts {
            filters: vec![&filter],
            order: Some(&order),
            limit: Some(5),
            offset: Some(10),
        };
        assert_eq!(
            build_select(&schema, book, &parts).unwrap(),
            "SELECT * FROM book WHERE price > 20 ORDER BY title DESC LIMIT 5 OFFSET 10"
        );
    }

    #[test]
    fn test_offset_without_limit() {
        let schema = bookstore();
        let book = schema.get_entity("Book").unwrap();
        let parts = SelectParts {
            offset: Some(3),
            ..Default::default()
        };
        assert_eq!(
            build_select(&schema, book, &parts).unwrap(),
            "SELECT * FROM book LIMIT -1 OFFSET 3"
        );
    }

    #[test]
    fn test_build_insert_update_delete() {
        let schema = bookstore();
        let author = schema.get_entity("Author").unwrap();

        let snippet = ormpad_lang::parse(
            r#"Author.create({ first_name: "Jane", email: "jane@example.com" })"#,
        )
        .unwrap();
        let Some(Stmt::Expr(Expr::Mutation(m))) = snippet.statements.into_iter().next() else {
            panic!("expected a mutation");
        };
        let ormpad_lang::MutationKind::Create { data } = m.kind else {
            panic!("expected create");
        };
        assert_eq!(
            build_insert(&schema, author, &data).unwrap(),
            "INSERT INTO author (first_name, email) VALUES ('Jane', 'jane@example.com')"
        );

        let filter = book_filter("Book.findMany().where(id == 3)");
        let book = schema.get_entity("Book").unwrap();
        assert_eq!(
            build_delete(&schema, book, &[&filter]).unwrap(),
            "DELETE FROM book WHERE id = 3"
        );
    }

    #[test]
    fn test_build_in_fetch() {
        assert_eq!(
            build_in_fetch("book", "author_id", &[1, 3]),
            "SELECT * FROM book WHERE author_id IN (1, 3) ORDER BY id ASC"
        );
    }
}
