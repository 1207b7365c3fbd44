use error_stack::Report;
use sqlx::PgConnection;

use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{
    Book, BookAuthor, BookCode, BookId, BookPatch, BookStatus, BookTitle, NewBook, SelectLimit,
    SelectOffset,
};
use kernel::KernelError;

use crate::database::postgres::PostgresConnection;
use crate::error::ConvertError;

pub struct PostgresBookRepository;

#[async_trait::async_trait]
impl BookQuery for PostgresBookRepository {
    type Transaction = PostgresConnection;

    async fn find_by_id(
        &self,
        con: &mut PostgresConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_id(con, id).await
    }

    async fn find_by_code(
        &self,
        con: &mut PostgresConnection,
        code: &BookCode,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_code(con, code).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresConnection,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        PgBookInternal::find_all(con, limit, offset).await
    }
}

#[async_trait::async_trait]
impl BookModifier for PostgresBookRepository {
    type Transaction = PostgresConnection;

    async fn create(
        &self,
        con: &mut PostgresConnection,
        book: &NewBook,
    ) -> error_stack::Result<Book, KernelError> {
        PgBookInternal::create(con, book).await
    }

    async fn update(
        &self,
        con: &mut PostgresConnection,
        book_id: &BookId,
        patch: &BookPatch,
    ) -> error_stack::Result<Book, KernelError> {
        PgBookInternal::update(con, book_id, patch).await
    }

    async fn delete(
        &self,
        con: &mut PostgresConnection,
        book_id: &BookId,
    ) -> error_stack::Result<Book, KernelError> {
        PgBookInternal::delete(con, book_id).await
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: i32,
    code: String,
    title: String,
    author: String,
    status: String,
}

impl TryFrom<BookRow> for Book {
    type Error = Report<KernelError>;
    fn try_from(value: BookRow) -> Result<Self, Self::Error> {
        let status = value
            .status
            .parse::<BookStatus>()
            .map_err(|report| report.change_context(KernelError::Internal))?;
        Ok(Book::new(
            BookId::new(value.id),
            BookCode::new(value.code),
            BookTitle::new(value.title),
            BookAuthor::new(value.author),
            status,
        ))
    }
}

fn found(row: Option<BookRow>, id: &BookId) -> error_stack::Result<Book, KernelError> {
    row.ok_or_else(|| {
        Report::new(KernelError::NotFound)
            .attach_printable(format!("No book with id {}", i32::from(*id)))
    })
    .and_then(Book::try_from)
}

pub(in crate::database) struct PgBookInternal;

impl PgBookInternal {
    #[tracing::instrument(skip(con), level = "debug")]
    async fn find_by_id(
        con: &mut PgConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, code, title, author, status
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Book::try_from).transpose()
    }

    #[tracing::instrument(skip(con), level = "debug")]
    async fn find_by_code(
        con: &mut PgConnection,
        code: &BookCode,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, code, title, author, status
            FROM books
            WHERE code = $1
            "#,
        )
        .bind(code.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Book::try_from).transpose()
    }

    #[tracing::instrument(skip(con), level = "debug")]
    async fn find_all(
        con: &mut PgConnection,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        let (limit, offset): (&i32, &i32) = (limit.as_ref(), offset.as_ref());
        let rows = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, code, title, author, status
            FROM books
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(*limit))
        .bind(i64::from(*offset))
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(Book::try_from).collect()
    }

    #[tracing::instrument(skip(con), level = "debug")]
    async fn create(
        con: &mut PgConnection,
        book: &NewBook,
    ) -> error_stack::Result<Book, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            INSERT INTO books (code, title, author, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, code, title, author, status
            "#,
        )
        .bind(book.code().as_ref())
        .bind(book.title().as_ref())
        .bind(book.author().as_ref())
        .bind(book.status().as_str())
        .fetch_one(con)
        .await
        .convert_error()?;
        Book::try_from(row)
    }

    #[tracing::instrument(skip(con), level = "debug")]
    async fn update(
        con: &mut PgConnection,
        book_id: &BookId,
        patch: &BookPatch,
    ) -> error_stack::Result<Book, KernelError> {
        // Absent fields keep their stored value.
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            UPDATE books
            SET code   = COALESCE($2, code),
                title  = COALESCE($3, title),
                author = COALESCE($4, author),
                status = COALESCE($5, status)
            WHERE id = $1
            RETURNING id, code, title, author, status
            "#,
        )
        .bind(book_id.as_ref())
        .bind(patch.code().as_ref().map(AsRef::<String>::as_ref))
        .bind(patch.title().as_ref().map(AsRef::<String>::as_ref))
        .bind(patch.author().as_ref().map(AsRef::<String>::as_ref))
        .bind(patch.status().as_ref().map(BookStatus::as_str))
        .fetch_optional(con)
        .await
        .convert_error()?;
        found(row, book_id)
    }

    #[tracing::instrument(skip(con), level = "debug")]
    async fn delete(
        con: &mut PgConnection,
        book_id: &BookId,
    ) -> error_stack::Result<Book, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            DELETE FROM books
            WHERE id = $1
            RETURNING id, code, title, author, status
            "#,
        )
        .bind(book_id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        found(row, book_id)
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::database::Transaction;
    use kernel::interface::query::BookQuery;
    use kernel::interface::update::BookModifier;
    use kernel::prelude::entity::{
        BookAuthor, BookCode, BookId, BookPatch, BookStatus, BookTitle, NewBook, SelectLimit,
        SelectOffset,
    };
    use kernel::KernelError;

    use crate::database::postgres::book::PostgresBookRepository;
    use crate::database::postgres::test_support::{connect, unique_code};

    fn new_book(code: &str) -> NewBook {
        NewBook::new(
            BookCode::new(code),
            BookTitle::new("The Left Hand of Darkness"),
            BookAuthor::new("Ursula K. Le Guin"),
            BookStatus::Available,
        )
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn crud() -> error_stack::Result<(), KernelError> {
        let mut con = connect().await?;
        let raw_code = unique_code("crud");
        let code = BookCode::new(raw_code.clone());

        let created = PostgresBookRepository
            .create(&mut con, &new_book(&raw_code))
            .await?;
        assert_eq!(created.code(), &code);

        let found = PostgresBookRepository.find_by_code(&mut con, &code).await?;
        assert_eq!(found, Some(created.clone()));

        let updated = PostgresBookRepository
            .update(
                &mut con,
                created.id(),
                &BookPatch::status_only(BookStatus::Borrowed),
            )
            .await?;
        assert_eq!(updated.status(), &BookStatus::Borrowed);
        assert_eq!(updated.title(), created.title());

        let deleted = PostgresBookRepository.delete(&mut con, created.id()).await?;
        assert_eq!(deleted, updated);
        let found = PostgresBookRepository
            .find_by_id(&mut con, created.id())
            .await?;
        assert!(found.is_none());

        con.roll_back().await
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn duplicate_code_is_conflict() -> error_stack::Result<(), KernelError> {
        let mut con = connect().await?;
        let code = unique_code("dup");
        PostgresBookRepository
            .create(&mut con, &new_book(&code))
            .await?;

        let error = PostgresBookRepository
            .create(&mut con, &new_book(&code))
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Conflict);

        con.roll_back().await
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn missing_row_is_not_found() -> error_stack::Result<(), KernelError> {
        let mut con = connect().await?;
        let missing = BookId::new(-1);

        let error = PostgresBookRepository
            .update(&mut con, &missing, &BookPatch::status_only(BookStatus::Lost))
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::NotFound);

        let error = PostgresBookRepository
            .delete(&mut con, &missing)
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::NotFound);

        con.roll_back().await
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn find_all_pages_by_id() -> error_stack::Result<(), KernelError> {
        let mut con = connect().await?;
        for _ in 0..4 {
            PostgresBookRepository
                .create(&mut con, &new_book(&unique_code("page")))
                .await?;
        }

        let first = PostgresBookRepository
            .find_all(&mut con, &SelectLimit::new(2), &SelectOffset::new(0))
            .await?;
        let second = PostgresBookRepository
            .find_all(&mut con, &SelectLimit::new(2), &SelectOffset::new(2))
            .await?;
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        assert!(i32::from(*first[1].id()) < i32::from(*second[0].id()));

        con.roll_back().await
    }
}
