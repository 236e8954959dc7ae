//! The built-in bookstore schema.

use super::entity::EntityDef;
use super::field::{DefaultValue, FieldDef};
use super::relation::{DeleteBehavior, RelationDef};
use super::registry::AppSchema;
use super::types::ScalarType;

/// Build the bookstore application schema: authors own books, books
/// collect reviews and ratings, all cascade on delete.
pub fn bookstore() -> AppSchema {
    let author = EntityDef::new("Author", "author")
        .with_field(FieldDef::serial("id"))
        .with_field(FieldDef::new("first_name", ScalarType::Char { max_length: 100 }))
        .with_field(FieldDef::new("last_name", ScalarType::Char { max_length: 100 }))
        .with_field(FieldDef::optional("birth_date", ScalarType::Date))
        .with_field(FieldDef::new("email", ScalarType::Email).with_unique());

    let book = EntityDef::new("Book", "book")
        .with_field(FieldDef::serial("id"))
        .with_field(FieldDef::new("title", ScalarType::Char { max_length: 255 }))
        .with_field(FieldDef::optional("description", ScalarType::Text))
        .with_field(FieldDef::new("published_date", ScalarType::Date))
        .with_field(FieldDef::new("isbn", ScalarType::Char { max_length: 13 }).with_unique())
        .with_field(FieldDef::new(
            "price",
            ScalarType::Decimal {
                precision: 6,
                scale: 2,
            },
        ))
        .with_field(
            FieldDef::new("is_bestseller", ScalarType::Bool)
                .with_default(DefaultValue::Bool(false)),
        )
        .with_field(FieldDef::new("author_id", ScalarType::Int));

    let review = EntityDef::new("Review", "review")
        .with_field(FieldDef::serial("id"))
        .with_field(FieldDef::new("book_id", ScalarType::Int))
        .with_field(FieldDef::new("reviewer_name", ScalarType::Char { max_length: 100 }))
        .with_field(FieldDef::new("content", ScalarType::Text))
        .with_field(
            FieldDef::new("date", ScalarType::DateTime)
                .with_default(DefaultValue::CurrentTimestamp),
        );

    let rating = EntityDef::new("Rating", "rating")
        .with_field(FieldDef::serial("id"))
        .with_field(FieldDef::new("book_id", ScalarType::Int))
        .with_field(FieldDef::new("score", ScalarType::Int).with_range(1, 5))
        .with_field(
            FieldDef::new("date", ScalarType::DateTime)
                .with_default(DefaultValue::CurrentTimestamp),
        );

    AppSchema::new("bookstore")
        .with_entity(author)
        .with_entity(book)
        .with_entity(review)
        .with_entity(rating)
        .with_relation(
            RelationDef::many_to_one("author", "Book", "author_id", "Author", "books")
                .with_on_delete(DeleteBehavior::Cascade),
        )
        .with_relation(
            RelationDef::many_to_one("book", "Review", "book_id", "Book", "reviews")
                .with_on_delete(DeleteBehavior::Cascade),
        )
        .with_relation(
            RelationDef::many_to_one("book", "Rating", "book_id", "Book", "ratings")
                .with_on_delete(DeleteBehavior::Cascade),
        )
}
