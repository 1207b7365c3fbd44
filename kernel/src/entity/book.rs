mod author;
mod code;
mod id;
mod status;
mod title;

pub use self::{author::*, code::*, id::*, status::*, title::*};
use destructure::{Destructure, Mutation};
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Book {
    id: BookId,
    code: BookCode,
    title: BookTitle,
    author: BookAuthor,
    status: BookStatus,
}

impl Book {
    pub fn new(
        id: BookId,
        code: BookCode,
        title: BookTitle,
        author: BookAuthor,
        status: BookStatus,
    ) -> Self {
        Self {
            id,
            code,
            title,
            author,
            status,
        }
    }
}

/// A book that has not been stored yet, so it has no id.
#[derive(Debug, Clone, Eq, PartialEq, References)]
pub struct NewBook {
    code: BookCode,
    title: BookTitle,
    author: BookAuthor,
    status: BookStatus,
}

impl NewBook {
    pub fn new(code: BookCode, title: BookTitle, author: BookAuthor, status: BookStatus) -> Self {
        Self {
            code,
            title,
            author,
            status,
        }
    }

    pub fn into_book(self, id: BookId) -> Book {
        Book::new(id, self.code, self.title, self.author, self.status)
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq, References)]
pub struct BookPatch {
    code: Option<BookCode>,
    title: Option<BookTitle>,
    author: Option<BookAuthor>,
    status: Option<BookStatus>,
}

impl BookPatch {
    pub fn new(
        code: Option<BookCode>,
        title: Option<BookTitle>,
        author: Option<BookAuthor>,
        status: Option<BookStatus>,
    ) -> Self {
        Self {
            code,
            title,
            author,
            status,
        }
    }

    pub fn status_only(status: BookStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn apply_to(&self, book: &mut Book) {
        book.substitute(|book| {
            if let Some(code) = &self.code {
                *book.code = code.clone();
            }
            if let Some(title) = &self.title {
                *book.title = title.clone();
            }
            if let Some(author) = &self.author {
                *book.author = author.clone();
            }
            if let Some(status) = self.status {
                *book.status = status;
            }
        })
    }
}

#[cfg(test)]
mod test {
    use crate::entity::{Book, BookAuthor, BookCode, BookId, BookPatch, BookStatus, BookTitle};

    fn fixture() -> Book {
        Book::new(
            BookId::new(1),
            BookCode::new("ISBN-0001"),
            BookTitle::new("Dune"),
            BookAuthor::new("Frank Herbert"),
            BookStatus::Available,
        )
    }

    #[test]
    fn status_only_patch_leaves_other_fields() {
        let mut book = fixture();
        let before = book.clone();
        BookPatch::status_only(BookStatus::Lost).apply_to(&mut book);

        assert_eq!(book.status(), &BookStatus::Lost);
        assert_eq!(book.id(), before.id());
        assert_eq!(book.code(), before.code());
        assert_eq!(book.title(), before.title());
        assert_eq!(book.author(), before.author());
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut book = fixture();
        BookPatch::default().apply_to(&mut book);
        assert_eq!(book, fixture());
    }

    #[test]
    fn patch_overwrites_present_fields() {
        let mut book = fixture();
        let patch = BookPatch::new(
            None,
            Some(BookTitle::new("Dune Messiah")),
            None,
            Some(BookStatus::Reserved),
        );
        patch.apply_to(&mut book);
        assert_eq!(book.title(), &BookTitle::new("Dune Messiah"));
        assert_eq!(book.status(), &BookStatus::Reserved);
        assert_eq!(book.code(), &BookCode::new("ISBN-0001"));
    }
}
