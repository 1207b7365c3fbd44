use error_stack::Report;

use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{Book, BookCode, BookId, BookPatch, NewBook, SelectLimit, SelectOffset};
use kernel::KernelError;

use crate::database::memory::{BookTable, InMemoryTransaction};

pub struct InMemoryBookRepository;

#[async_trait::async_trait]
impl BookQuery for InMemoryBookRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        Ok(con.staged.rows.get(&i32::from(*id)).cloned())
    }

    async fn find_by_code(
        &self,
        con: &mut InMemoryTransaction,
        code: &BookCode,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        Ok(con.staged.find_by_code(code).cloned())
    }

    async fn find_all(
        &self,
        con: &mut InMemoryTransaction,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        let (limit, offset): (&i32, &i32) = (limit.as_ref(), offset.as_ref());
        let limit = usize::try_from(*limit).unwrap_or(0);
        let offset = usize::try_from(*offset).unwrap_or(0);
        Ok(con
            .staged
            .rows
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl BookModifier for InMemoryBookRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        book: &NewBook,
    ) -> error_stack::Result<Book, KernelError> {
        let table = &mut con.staged;
        table.ensure_unique(book.code(), None)?;
        let id = table.last_id.checked_add(1).ok_or_else(|| {
            Report::new(KernelError::Internal).attach_printable("Book id sequence exhausted")
        })?;
        table.last_id = id;
        let created = book.clone().into_book(BookId::new(id));
        table.rows.insert(id, created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
        patch: &BookPatch,
    ) -> error_stack::Result<Book, KernelError> {
        let table = &mut con.staged;
        let key = i32::from(*book_id);
        if !table.rows.contains_key(&key) {
            return Err(not_found(book_id));
        }
        if let Some(code) = patch.code() {
            table.ensure_unique(code, Some(book_id))?;
        }
        let book = table.rows.get_mut(&key).ok_or_else(|| not_found(book_id))?;
        patch.apply_to(book);
        Ok(book.clone())
    }

    async fn delete(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<Book, KernelError> {
        con.staged
            .rows
            .remove(&i32::from(*book_id))
            .ok_or_else(|| not_found(book_id))
    }
}

impl BookTable {
    fn find_by_code(&self, code: &BookCode) -> Option<&Book> {
        self.rows.values().find(|book| book.code() == code)
    }

    fn ensure_unique(
        &self,
        code: &BookCode,
        owner: Option<&BookId>,
    ) -> error_stack::Result<(), KernelError> {
        match self.find_by_code(code) {
            Some(existing) if Some(existing.id()) != owner => {
                Err(Report::new(KernelError::Conflict)
                    .attach_printable(format!("Book code {:?} already exists", code)))
            }
            _ => Ok(()),
        }
    }
}

fn not_found(id: &BookId) -> Report<KernelError> {
    Report::new(KernelError::NotFound)
        .attach_printable(format!("No book with id {}", i32::from(*id)))
}
