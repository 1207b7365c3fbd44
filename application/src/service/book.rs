use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{BookQuery, DependOnBookQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{BookCode, BookId, BookPatch, Capability, NewBook, Pagination};
use kernel::KernelError;

use crate::transfer::{
    BookDto, ChangeBookStatusDto, CreateBookDto, DeleteBookDto, GetBookByCodeDto, GetBooksDto,
    UpdateBookDto,
};

pub const DELETE_PERMISSION_DENIED: &str = "You don't have permission to delete a book";

#[async_trait::async_trait]
pub trait AddBookService: 'static + Sync + Send + DependOnBookModifier {
    async fn add_book(&self, dto: CreateBookDto) -> error_stack::Result<BookDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let book = NewBook::from(dto);
        let created = self
            .book_modifier()
            .create(&mut connection, &book)
            .await?;

        connection.commit().await?;

        Ok(BookDto::from(created))
    }
}

impl<T> AddBookService for T where T: DependOnBookModifier {}

#[async_trait::async_trait]
pub trait ChangeBookStatusService: 'static + Sync + Send + DependOnBookModifier {
    async fn change_book_status(
        &self,
        dto: ChangeBookStatusDto,
    ) -> error_stack::Result<BookDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = BookId::new(dto.id);
        let patch = BookPatch::status_only(dto.status);
        let updated = self
            .book_modifier()
            .update(&mut connection, &id, &patch)
            .await?;

        connection.commit().await?;

        Ok(BookDto::from(updated))
    }
}

impl<T> ChangeBookStatusService for T where T: DependOnBookModifier {}

#[async_trait::async_trait]
pub trait UpdateBookService: 'static + Sync + Send + DependOnBookModifier {
    async fn update_book(&self, dto: UpdateBookDto) -> error_stack::Result<BookDto, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let id = BookId::new(dto.id);
        let patch = BookPatch::from(&dto);
        let updated = self
            .book_modifier()
            .update(&mut connection, &id, &patch)
            .await?;

        connection.commit().await?;

        Ok(BookDto::from(updated))
    }
}

impl<T> UpdateBookService for T where T: DependOnBookModifier {}

#[async_trait::async_trait]
pub trait DeleteBookService: 'static + Sync + Send + DependOnBookModifier {
    /// Rejected roles never reach the store.
    async fn delete_book(&self, dto: DeleteBookDto) -> error_stack::Result<BookDto, KernelError> {
        if !dto.role.has_capability(Capability::DeleteBook) {
            return Err(Report::new(KernelError::Permission {
                message: DELETE_PERMISSION_DENIED,
            }));
        }

        let mut connection = self.database_connection().transact().await?;

        let id = BookId::new(dto.id);
        let deleted = self.book_modifier().delete(&mut connection, &id).await?;

        connection.commit().await?;

        Ok(BookDto::from(deleted))
    }
}

impl<T> DeleteBookService for T where T: DependOnBookModifier {}

#[async_trait::async_trait]
pub trait GetBookService: 'static + Sync + Send + DependOnBookQuery {
    async fn get_book_by_code(
        &self,
        dto: GetBookByCodeDto,
    ) -> error_stack::Result<Option<BookDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let code = BookCode::new(dto.code);
        let book = self.book_query().find_by_code(&mut connection, &code).await?;

        Ok(book.map(BookDto::from))
    }
}

impl<T> GetBookService for T where T: DependOnBookQuery {}

#[async_trait::async_trait]
pub trait GetBooksService: 'static + Sync + Send + DependOnBookQuery {
    async fn get_books(&self, dto: GetBooksDto) -> error_stack::Result<Vec<BookDto>, KernelError> {
        let pagination = Pagination::new(dto.size, dto.page)?;

        let mut connection = self.database_connection().transact().await?;

        let books = self
            .book_query()
            .find_all(&mut connection, pagination.limit(), pagination.offset())
            .await?;

        Ok(books.into_iter().map(BookDto::from).collect())
    }
}

impl<T> GetBooksService for T where T: DependOnBookQuery {}
