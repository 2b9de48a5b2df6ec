use std::fmt;

use serde::{Deserialize, Serialize};

/// Lending status of a book
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum BookStatus {
    /// Book is on the shelf and can be borrowed
    #[default]
    Available,
    /// Book is out on loan
    Borrowed,
}

impl BookStatus {
    /// Get a short human-readable label for the status
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Borrowed => "Borrowed",
        }
    }
}

/// A single book in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Book {
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Identifier of the book, unique within a library
    pub isbn: String,
    /// Whether the book is on the shelf or out on loan
    #[serde(default)]
    status: BookStatus,
}

impl Book {
    /// Create a new, available book
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
            status: BookStatus::Available,
        }
    }

    /// Current lending status
    #[must_use]
    pub fn status(&self) -> BookStatus {
        self.status
    }

    /// Whether the book is currently out on loan
    #[must_use]
    pub fn is_borrowed(&self) -> bool {
        self.status == BookStatus::Borrowed
    }

    /// Mark the book as borrowed.
    ///
    /// Returns `false` without touching the book if it is already borrowed.
    pub fn borrow(&mut self) -> bool {
        if self.is_borrowed() {
            return false;
        }
        self.status = BookStatus::Borrowed;
        true
    }

    /// Mark the book as returned.
    ///
    /// Returns `false` without touching the book if it was not borrowed.
    pub fn return_book(&mut self) -> bool {
        if !self.is_borrowed() {
            return false;
        }
        self.status = BookStatus::Available;
        true
    }

    /// Human-readable one-line summary
    #[must_use]
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' by {} (ISBN: {}) - {}",
            self.title,
            self.author,
            self.isbn,
            self.status.label()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Book, BookStatus};

    #[test]
    fn test_new_book_is_available() {
        let book = Book::new("1984", "Orwell", "111");
        assert_eq!(book.status(), BookStatus::Available);
        assert!(!book.is_borrowed());
    }

    #[test]
    fn test_borrow_twice_fails_without_side_effects() {
        let mut book = Book::new("1984", "Orwell", "111");
        assert!(book.borrow());
        assert!(!book.borrow());
        assert!(book.is_borrowed());
    }

    #[test]
    fn test_return_requires_borrowed() {
        let mut book = Book::new("1984", "Orwell", "111");
        assert!(!book.return_book());
        assert!(book.borrow());
        assert!(book.return_book());
        assert_eq!(book.status(), BookStatus::Available);
    }

    #[test]
    fn test_describe() {
        let mut book = Book::new("1984", "Orwell", "111");
        assert_eq!(book.describe(), "'1984' by Orwell (ISBN: 111) - Available");
        book.borrow();
        assert_eq!(book.describe(), "'1984' by Orwell (ISBN: 111) - Borrowed");
    }
}
