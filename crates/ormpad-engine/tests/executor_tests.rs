//! End-to-end executor scenarios: REPL echo, output capture, query
//! tracing, mutations, and schema commands against a live database.

use ormpad_engine::{populate, Engine};
use ormpad_schema::bookstore;

fn engine() -> Engine {
    Engine::in_memory(bookstore()).unwrap()
}

#[test]
fn trailing_expression_is_echoed() {
    assert_eq!(engine().run("1 + 1").output, "2\n");
}

#[test]
fn print_writes_to_captured_output() {
    assert_eq!(engine().run("print('hi')").output, "hi\n");
}

#[test]
fn binding_then_trailing_expression() {
    assert_eq!(engine().run("let x = 1\nx + 1").output, "2\n");
}

#[test]
fn print_as_last_statement_echoes_nothing_extra() {
    assert_eq!(engine().run("print(5)").output, "5\n");
}

#[test]
fn empty_source_is_a_noop() {
    let outcome = engine().run("");
    assert_eq!(outcome.output, "");
    assert!(outcome.queries.is_empty());
    assert!(outcome.elapsed_seconds >= 0.0);
}

#[test]
fn elapsed_is_rounded_to_four_decimals() {
    let outcome = engine().run("1 + 1");
    let scaled = outcome.elapsed_seconds * 10_000.0;
    assert!((scaled - scaled.round()).abs() < 1e-9);
}

#[test]
fn string_concatenation() {
    assert_eq!(engine().run("'foo' + \"bar\"").output, "foobar\n");
}

#[test]
fn mixed_arithmetic_produces_float() {
    assert_eq!(engine().run("1 + 1.5").output, "2.5\n");
}

#[test]
fn undefined_variable_is_an_error_line() {
    let output = engine().run("y + 1").output;
    assert!(output.starts_with("Error: "), "got: {output}");
    assert!(output.contains("undefined variable 'y'"));
}

#[test]
fn syntax_error_is_an_error_line() {
    let output = engine().run("let = 3").output;
    assert!(output.starts_with("Error: "), "got: {output}");
}

#[test]
fn division_by_zero_is_an_error_line() {
    assert_eq!(engine().run("1 / 0").output, "Error: division by zero\n");
}

#[test]
fn unknown_entity_is_an_error_line() {
    let output = engine().run("Publisher.findMany()").output;
    assert_eq!(output, "Error: unknown entity 'Publisher'\n");
}

#[test]
fn unknown_field_is_an_error_line() {
    let output = engine().run("Book.findMany().where(pages > 10)").output;
    assert_eq!(output, "Error: unknown field 'pages' on Book\n");
}

#[test]
fn output_before_the_error_is_kept() {
    let output = engine().run("print('before')\ny + 1").output;
    assert_eq!(output, "before\nError: undefined variable 'y'\n");
}

#[test]
fn create_echoes_the_record() {
    let output = engine()
        .run(r#"Author.create({ first_name: "Jane", last_name: "Austen", email: "jane@example.com" })"#)
        .output;
    assert!(output.starts_with("Author { id: 1,"), "got: {output}");
    assert!(output.contains(r#"first_name: "Jane""#));
}

#[test]
fn count_after_create() {
    let mut engine = engine();
    engine.run(r#"Author.create({ first_name: "A", last_name: "B", email: "a@example.com" })"#);
    assert_eq!(engine.run("Author.count()").output, "1\n");
}

#[test]
fn scope_does_not_leak_across_runs() {
    let mut engine = engine();
    engine.run("let x = 1");
    let output = engine.run("x + 1").output;
    assert!(output.starts_with("Error: undefined variable 'x'"));
}

#[test]
fn find_many_with_filter_and_order() {
    let mut engine = engine();
    engine.run(r#"Author.create({ first_name: "A", last_name: "B", email: "a@example.com" })"#);
    engine.run(
        "Book.create({ title: \"Cheap\", published_date: \"2001-01-01\", isbn: \"9780000000001\", price: 5.0, is_bestseller: false, author_id: 1 })",
    );
    engine.run(
        "Book.create({ title: \"Pricey\", published_date: \"2002-01-01\", isbn: \"9780000000002\", price: 40.0, is_bestseller: true, author_id: 1 })",
    );

    let output = engine
        .run("Book.findMany().where(price > 10).orderBy(title.desc)")
        .output;
    assert!(output.contains("Pricey"));
    assert!(!output.contains("Cheap"));
}

#[test]
fn find_first_returns_null_when_nothing_matches() {
    let output = engine().run("Book.findFirst().where(id == 99)").output;
    assert_eq!(output, "null\n");
}

#[test]
fn update_and_delete_report_affected_rows() {
    let mut engine = engine();
    engine.run(r#"Author.create({ first_name: "A", last_name: "B", email: "a@example.com" })"#);

    let output = engine
        .run(r#"Author.update().where(id == 1).set({ first_name: "Z" })"#)
        .output;
    assert_eq!(output, "1 row(s) affected\n");

    let output = engine.run("Author.delete().where(id == 1)").output;
    assert_eq!(output, "1 row(s) affected\n");
    assert_eq!(engine.run("Author.count()").output, "0\n");
}

#[test]
fn deleting_an_author_cascades_to_books_and_reviews() {
    let mut engine = engine();
    engine.run(r#"Author.create({ first_name: "A", last_name: "B", email: "a@example.com" })"#);
    engine.run(
        "Book.create({ title: \"T\", published_date: \"2001-01-01\", isbn: \"9780000000001\", price: 9.99, is_bestseller: false, author_id: 1 })",
    );
    engine.run(r#"Review.create({ book_id: 1, reviewer_name: "r", content: "ok" })"#);
    engine.run("Rating.create({ book_id: 1, score: 5 })");

    engine.run("Author.delete().where(id == 1)");
    assert_eq!(engine.run("Book.count()").output, "0\n");
    assert_eq!(engine.run("Review.count()").output, "0\n");
    assert_eq!(engine.run("Rating.count()").output, "0\n");
}

#[test]
fn unique_email_violation_is_an_error_line() {
    let mut engine = engine();
    let create = r#"Author.create({ first_name: "A", last_name: "B", email: "a@example.com" })"#;
    engine.run(create);
    let output = engine.run(create).output;
    assert!(output.starts_with("Error: "), "got: {output}");
    assert!(output.to_uppercase().contains("UNIQUE"));
}

#[test]
fn score_check_constraint_is_an_error_line() {
    let mut engine = engine();
    engine.run(r#"Author.create({ first_name: "A", last_name: "B", email: "a@example.com" })"#);
    engine.run(
        "Book.create({ title: \"T\", published_date: \"2001-01-01\", isbn: \"9780000000001\", price: 9.99, is_bestseller: false, author_id: 1 })",
    );
    let output = engine.run("Rating.create({ book_id: 1, score: 6 })").output;
    assert!(output.starts_with("Error: "), "got: {output}");
}

#[test]
fn include_forward_relation_attaches_a_record() {
    let mut engine = engine();
    engine.run(r#"Author.create({ first_name: "Jane", last_name: "A", email: "a@example.com" })"#);
    engine.run(
        "Book.create({ title: \"T\", published_date: \"2001-01-01\", isbn: \"9780000000001\", price: 9.99, is_bestseller: false, author_id: 1 })",
    );

    let output = engine.run("Book.findMany().include(author)").output;
    assert!(output.contains("author: Author {"), "got: {output}");
    assert!(output.contains(r#"first_name: "Jane""#));
}

#[test]
fn include_reverse_relation_attaches_rows() {
    let mut engine = engine();
    engine.run(r#"Author.create({ first_name: "Jane", last_name: "A", email: "a@example.com" })"#);
    engine.run(
        "Book.create({ title: \"One\", published_date: \"2001-01-01\", isbn: \"9780000000001\", price: 9.99, is_bestseller: false, author_id: 1 })",
    );
    engine.run(
        "Book.create({ title: \"Two\", published_date: \"2002-01-01\", isbn: \"9780000000002\", price: 9.99, is_bestseller: false, author_id: 1 })",
    );

    let output = engine.run("Author.findMany().include(books)").output;
    assert!(output.contains("books: [Book {"), "got: {output}");
    assert!(output.contains("One") && output.contains("Two"));
}

#[test]
fn trace_records_the_run_and_is_drained() {
    let mut engine = engine();
    let outcome = engine.run("Book.count()");
    assert_eq!(outcome.queries.len(), 1);
    assert!(outcome.queries[0].sql.starts_with("SELECT COUNT(*)"));
    let time: f64 = outcome.queries[0].time.parse().unwrap();
    assert!(time >= 0.0);

    // The previous run's trace must not leak into the next one.
    let outcome = engine.run("Book.count()");
    assert_eq!(outcome.queries.len(), 1);
}

#[test]
fn traced_sql_is_pretty_printed() {
    let mut engine = engine();
    let outcome = engine.run("Book.findMany().where(price > 20)");
    assert_eq!(
        outcome.queries[0].sql,
        "SELECT *\nFROM book\nWHERE price > 20"
    );
}

#[test]
fn errors_still_drain_their_trace() {
    let mut engine = engine();
    engine.run("Book.count()\ny + 1");
    let outcome = engine.run("1 + 1");
    assert!(outcome.queries.is_empty());
}

#[test]
fn schema_command_lists_entities_and_folds_fk_columns() {
    let output = engine().run(".schema Book").output;
    assert!(output.starts_with("Book\n"), "got: {output}");
    assert!(output.contains("  author: Foreign Key -> Author"));
    assert!(output.contains("  title: Character (255)"));
    assert!(output.contains("  reviews: Reverse ManyToOne -> Review"));
    assert!(!output.contains("author_id"));
}

#[test]
fn bare_schema_command_lists_every_entity() {
    let output = engine().run(".schema").output;
    for entity in ["Author", "Book", "Review", "Rating"] {
        assert!(output.contains(&format!("{}\n", entity)), "missing {entity}");
    }
}

#[test]
fn seeded_database_matches_expected_counts() {
    let mut engine = engine();
    populate(engine.db()).unwrap();
    assert_eq!(engine.run("Author.count()").output, "10\n");
    assert_eq!(engine.run("Book.count()").output, "30\n");
}

#[test]
fn multiline_chain_continues_across_newlines() {
    let mut engine = engine();
    populate(engine.db()).unwrap();
    let output = engine
        .run("Book.findMany()\n  .where(price > 0)\n  .limit(2)")
        .output;
    assert!(output.starts_with("[Book {"), "got: {output}");
}
