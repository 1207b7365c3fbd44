use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::DependOnBookQuery;
use kernel::interface::update::DependOnBookModifier;
use kernel::prelude::entity::Book;
use kernel::KernelError;

pub use self::book::*;

mod book;

/// Process-local store that behaves like [`PostgresDatabase`](crate::database::PostgresDatabase).
///
/// A transaction holds the table lock until it is committed or dropped, so transactions run one
/// after another. Writes go to a copy of the table that `commit` publishes.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    table: Arc<Mutex<BookTable>>,
    opened: Arc<AtomicUsize>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of transactions opened since construction.
    pub fn transactions_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Default)]
struct BookTable {
    last_id: i32,
    rows: BTreeMap<i32, Book>,
}

#[async_trait::async_trait]
impl DatabaseConnection for InMemoryDatabase {
    type Transaction = InMemoryTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let guard = Arc::clone(&self.table).lock_owned().await;
        let staged = guard.clone();
        Ok(InMemoryTransaction { guard, staged })
    }
}

pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<BookTable>,
    staged: BookTable,
}

#[async_trait::async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        let InMemoryTransaction { mut guard, staged } = self;
        *guard = staged;
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

impl DependOnBookQuery for InMemoryDatabase {
    type BookQuery = InMemoryBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &InMemoryBookRepository
    }
}

impl DependOnBookModifier for InMemoryDatabase {
    type BookModifier = InMemoryBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &InMemoryBookRepository
    }
}
