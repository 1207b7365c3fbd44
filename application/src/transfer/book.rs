use serde::{Deserialize, Serialize};

use kernel::prelude::entity::{
    Book, BookAuthor, BookCode, BookPatch, BookStatus, BookTitle, DestructBook, NewBook, Role,
};

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct BookDto {
    pub id: i32,
    pub code: String,
    pub title: String,
    pub author: String,
    pub status: BookStatus,
}

impl From<Book> for BookDto {
    fn from(value: Book) -> Self {
        let DestructBook {
            id,
            code,
            title,
            author,
            status,
        } = value.into_destruct();
        Self {
            id: id.into(),
            code: code.into(),
            title: title.into(),
            author: author.into(),
            status,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookDto {
    pub code: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub status: Option<BookStatus>,
}

impl From<CreateBookDto> for NewBook {
    fn from(value: CreateBookDto) -> Self {
        NewBook::new(
            BookCode::new(value.code),
            BookTitle::new(value.title),
            BookAuthor::new(value.author),
            value.status.unwrap_or_default(),
        )
    }
}

#[derive(Debug, Clone)]
pub struct ChangeBookStatusDto {
    pub id: i32,
    pub status: BookStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBookDto {
    #[serde(skip)]
    pub id: i32,
    pub code: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub status: Option<BookStatus>,
}

impl From<&UpdateBookDto> for BookPatch {
    fn from(value: &UpdateBookDto) -> Self {
        BookPatch::new(
            value.code.clone().map(BookCode::new),
            value.title.clone().map(BookTitle::new),
            value.author.clone().map(BookAuthor::new),
            value.status,
        )
    }
}

#[derive(Debug, Clone)]
pub struct DeleteBookDto {
    pub id: i32,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct GetBookByCodeDto {
    pub code: String,
}

#[derive(Debug, Clone)]
pub struct GetBooksDto {
    pub size: i32,
    pub page: i32,
}
