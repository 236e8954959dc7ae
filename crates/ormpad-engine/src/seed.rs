//! Sample-data seeding.
//!
//! Fills the playground database with a deterministic set of authors,
//! books, reviews, and ratings so the editor has something to query.
//! Seeding is untraced; the first snippet run should not see it.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::db::Database;
use crate::error::EngineResult;
use crate::sql::escape_str;

const AUTHOR_COUNT: usize = 10;
const BOOK_COUNT: usize = 30;

const FIRST_NAMES: [&str; 10] = [
    "Alice", "Bruno", "Carmen", "Dmitri", "Elena", "Farid", "Greta", "Hiro", "Ines", "Jonas",
];

const LAST_NAMES: [&str; 10] = [
    "Almeida", "Berg", "Castillo", "Dvorak", "Eriksen", "Fontaine", "Gallo", "Hayashi", "Iversen",
    "Jansen",
];

const TITLE_ADJECTIVES: [&str; 10] = [
    "Silent", "Crimson", "Forgotten", "Endless", "Hollow", "Gilded", "Restless", "Distant",
    "Broken", "Hidden",
];

const TITLE_NOUNS: [&str; 10] = [
    "River", "Archive", "Garden", "Horizon", "Lantern", "Orchard", "Compass", "Harbor", "Letter",
    "Winter",
];

const REVIEWERS: [&str; 6] = [
    "bookworm42", "quietreader", "marginalia", "chapterhouse", "inkwell", "dogearred",
];

const REVIEW_LINES: [&str; 6] = [
    "Could not put it down.",
    "Slow start, strong finish.",
    "The middle chapters drag a little.",
    "A new favorite.",
    "Not what I expected, in a good way.",
    "Would recommend to a friend.",
];

/// Delete existing rows and repopulate the sample dataset.
pub fn populate(db: &Database) -> EngineResult<()> {
    let prev = db.set_recording(false);
    let result = populate_inner(db);
    db.set_recording(prev);
    result
}

fn populate_inner(db: &Database) -> EngineResult<()> {
    let mut rng = StdRng::seed_from_u64(0x0b_00_c5);

    // Children first so the deletes never trip a foreign key.
    for table in ["rating", "review", "book", "author"] {
        db.execute(&format!("DELETE FROM {}", table))?;
    }

    let birth_base = NaiveDate::from_ymd_opt(1940, 1, 1).unwrap_or_default();
    let publish_base = NaiveDate::from_ymd_opt(1995, 1, 1).unwrap_or_default();

    let mut author_ids = Vec::with_capacity(AUTHOR_COUNT);
    for i in 0..AUTHOR_COUNT {
        let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
        let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
        let birth = birth_base + Duration::days(rng.gen_range(0..18_000));

        db.execute(&format!(
            "INSERT INTO author (first_name, last_name, birth_date, email) \
             VALUES ('{}', '{}', '{}', 'author{}@example.com')",
            escape_str(first),
            escape_str(last),
            birth.format("%Y-%m-%d"),
            i
        ))?;
        author_ids.push(db.last_insert_rowid());
    }

    for i in 0..BOOK_COUNT {
        let adjective = TITLE_ADJECTIVES[rng.gen_range(0..TITLE_ADJECTIVES.len())];
        let noun = TITLE_NOUNS[rng.gen_range(0..TITLE_NOUNS.len())];
        let title = format!("The {} {}", adjective, noun);

        let description = if rng.gen_bool(0.5) {
            format!("'A story about the {} {}.'", adjective.to_lowercase(), noun.to_lowercase())
        } else {
            "NULL".to_string()
        };

        let published = publish_base + Duration::days(rng.gen_range(0..10_000));
        let isbn = 9_780_000_000_000u64 + i as u64;
        let price = f64::from(rng.gen_range(500..=4999)) / 100.0;
        let bestseller = u8::from(rng.gen_bool(0.2));
        let author_id = author_ids[rng.gen_range(0..author_ids.len())];

        db.execute(&format!(
            "INSERT INTO book (title, description, published_date, isbn, price, is_bestseller, author_id) \
             VALUES ('{}', {}, '{}', '{}', {:.2}, {}, {})",
            escape_str(&title),
            description,
            published.format("%Y-%m-%d"),
            isbn,
            price,
            bestseller,
            author_id
        ))?;
        let book_id = db.last_insert_rowid();

        for _ in 0..rng.gen_range(0..=5) {
            let reviewer = REVIEWERS[rng.gen_range(0..REVIEWERS.len())];
            let content = REVIEW_LINES[rng.gen_range(0..REVIEW_LINES.len())];
            db.execute(&format!(
                "INSERT INTO review (book_id, reviewer_name, content) VALUES ({}, '{}', '{}')",
                book_id,
                escape_str(reviewer),
                escape_str(content)
            ))?;
        }

        for _ in 0..rng.gen_range(1..=10) {
            db.execute(&format!(
                "INSERT INTO rating (book_id, score) VALUES ({}, {})",
                book_id,
                rng.gen_range(1..=5)
            ))?;
        }
    }

    tracing::info!(
        authors = AUTHOR_COUNT,
        books = BOOK_COUNT,
        "sample data populated"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ormpad_schema::bookstore;

    fn seeded_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.create_tables(&bookstore()).unwrap();
        populate(&db).unwrap();
        db
    }

    fn count(db: &Database, table: &str) -> i64 {
        let rows = db
            .query(&format!("SELECT COUNT(*) AS n FROM {}", table))
            .unwrap();
        match rows[0][0].1 {
            crate::value::Value::Int(n) => n,
            _ => panic!("count was not an integer"),
        }
    }

    #[test]
    fn test_populate_counts() {
        let db = seeded_db();
        assert_eq!(count(&db, "author"), 10);
        assert_eq!(count(&db, "book"), 30);
        assert!(count(&db, "rating") >= 30);
    }

    #[test]
    fn test_populate_is_untraced_and_repeatable() {
        let db = seeded_db();
        assert!(db.log().is_empty());

        // Running again replaces, not duplicates.
        populate(&db).unwrap();
        assert_eq!(count(&db, "author"), 10);
        assert_eq!(count(&db, "book"), 30);
    }

    #[test]
    fn test_isbns_are_sequential_and_unique() {
        let db = seeded_db();
        let rows = db.query("SELECT isbn FROM book ORDER BY isbn").unwrap();
        let first = &rows[0][0].1;
        assert_eq!(*first, crate::value::Value::Str("9780000000000".into()));
        assert_eq!(rows.len(), 30);
    }
}
