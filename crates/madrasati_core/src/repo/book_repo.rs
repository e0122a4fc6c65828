//! Digital textbook repository.

use super::{handle_missing, RepoResult};
use crate::model::book::Book;
use crate::model::catalog::GradeLevel;
use crate::store::{Store, Table};
use log::info;

pub trait BookRepository {
    fn add_book(&mut self, book: Book) -> RepoResult<Book>;
    /// Removes the first book with `id`.
    fn delete_book(&mut self, id: &str) -> RepoResult<()>;
    fn list_books_by_grade(&mut self, grade: GradeLevel) -> RepoResult<Vec<Book>>;
}

pub struct StoreBookRepository<'s> {
    store: &'s mut Store,
}

impl<'s> StoreBookRepository<'s> {
    pub fn new(store: &'s mut Store) -> Self {
        Self { store }
    }
}

impl BookRepository for StoreBookRepository<'_> {
    fn add_book(&mut self, book: Book) -> RepoResult<Book> {
        book.validate()?;
        self.store.refresh(Table::Books);
        self.store.books_mut().push(book.clone());
        self.store.commit(Table::Books)?;
        info!(
            "event=book_add module=repo status=ok book_id={} grade=\"{}\"",
            book.id, book.grade_level
        );
        Ok(book)
    }

    fn delete_book(&mut self, id: &str) -> RepoResult<()> {
        self.store.refresh(Table::Books);
        let Some(index) = self.store.books().iter().position(|book| book.id == id) else {
            return handle_missing(self.store, "book_delete", "book", id);
        };
        self.store.books_mut().remove(index);
        self.store.commit(Table::Books)?;
        info!("event=book_delete module=repo status=ok book_id={}", id);
        Ok(())
    }

    fn list_books_by_grade(&mut self, grade: GradeLevel) -> RepoResult<Vec<Book>> {
        self.store.refresh(Table::Books);
        Ok(self
            .store
            .books()
            .iter()
            .filter(|book| book.grade_level == grade)
            .cloned()
            .collect())
    }
}
