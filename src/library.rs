use std::{collections::BTreeMap, fmt};

use crate::{
    book::Book,
    error::{Anomaly, LibraryError, LibraryResult},
    events::LibraryEvent,
    observers::{EventLogger, LibraryObserver},
    user::User,
};

/// One entry of a user's loan listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanEntry<'a> {
    /// The borrowed book, still present in the catalog
    Book(&'a Book),
    /// The user holds an ISBN the catalog no longer knows about
    Missing {
        /// ISBN recorded in the user's loan set
        isbn: &'a str,
    },
}

/// In-memory library catalog that owns every book and user
pub struct Library {
    /// Catalog of books, keyed by ISBN
    books: BTreeMap<String, Book>,
    /// Registered users, keyed by user ID
    users: BTreeMap<String, User>,
    /// Registered change observers
    observers: Vec<Box<dyn LibraryObserver>>,
}

// Manual implementation of Debug for Library
impl fmt::Debug for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library")
            .field("books", &self.books)
            .field("users", &self.users)
            .field("observers_count", &self.observers.len())
            .finish()
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}

impl Library {
    /// Create an empty library with no observers
    #[must_use]
    pub fn new() -> Self {
        Self { books: BTreeMap::new(), users: BTreeMap::new(), observers: Vec::new() }
    }

    /// Create an empty library that logs every mutation
    #[must_use]
    pub fn with_default_observers() -> Self {
        let mut library = Self::new();
        library.register_observer(Box::new(EventLogger));
        library
    }

    /// Register an observer to be notified of catalog changes
    pub fn register_observer(&mut self, observer: Box<dyn LibraryObserver>) {
        self.observers.push(observer);
    }

    /// Notify every observer of a committed change
    fn notify(&self, event: &LibraryEvent) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }

    /// Add a book to the catalog
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::DuplicateBook` if a book with the same ISBN exists
    pub fn add_book(&mut self, book: Book) -> LibraryResult<()> {
        if self.books.contains_key(&book.isbn) {
            tracing::debug!(isbn = %book.isbn, "refusing duplicate book");
            return Err(LibraryError::DuplicateBook { isbn: book.isbn });
        }

        let event = LibraryEvent::BookAdded { isbn: book.isbn.clone(), title: book.title.clone() };
        self.books.insert(book.isbn.clone(), book);
        self.notify(&event);
        Ok(())
    }

    /// Remove a book from the catalog and hand it back
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No book has the given ISBN (`BookNotFound`)
    /// - The book is currently borrowed (`BookBorrowed`)
    pub fn remove_book(&mut self, isbn: &str) -> LibraryResult<Book> {
        let book = self
            .books
            .get(isbn)
            .ok_or_else(|| LibraryError::BookNotFound { isbn: isbn.to_string() })?;

        if book.is_borrowed() {
            tracing::debug!(%isbn, "refusing to remove borrowed book");
            return Err(LibraryError::BookBorrowed {
                isbn: isbn.to_string(),
                title: book.title.clone(),
            });
        }

        let book = self
            .books
            .remove(isbn)
            .ok_or_else(|| LibraryError::BookNotFound { isbn: isbn.to_string() })?;
        self.notify(&LibraryEvent::BookRemoved { isbn: book.isbn.clone() });
        Ok(book)
    }

    /// Register a new user
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::DuplicateUser` if a user with the same ID exists
    pub fn register_user(&mut self, user: User) -> LibraryResult<()> {
        if self.users.contains_key(&user.user_id) {
            tracing::debug!(user_id = %user.user_id, "refusing duplicate user");
            return Err(LibraryError::DuplicateUser { user_id: user.user_id });
        }

        let event =
            LibraryEvent::UserRegistered { user_id: user.user_id.clone(), name: user.name.clone() };
        self.users.insert(user.user_id.clone(), user);
        self.notify(&event);
        Ok(())
    }

    /// Remove a user and hand it back
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No user has the given ID (`UserNotFound`)
    /// - The user still holds books (`UserHasLoans`)
    pub fn remove_user(&mut self, user_id: &str) -> LibraryResult<User> {
        let user = self
            .users
            .get(user_id)
            .ok_or_else(|| LibraryError::UserNotFound { user_id: user_id.to_string() })?;

        if user.loan_count() > 0 {
            tracing::debug!(%user_id, loans = user.loan_count(), "refusing to remove user");
            return Err(LibraryError::UserHasLoans {
                user_id: user_id.to_string(),
                name: user.name.clone(),
                count: user.loan_count(),
            });
        }

        let user = self
            .users
            .remove(user_id)
            .ok_or_else(|| LibraryError::UserNotFound { user_id: user_id.to_string() })?;
        self.notify(&LibraryEvent::UserRemoved { user_id: user.user_id.clone() });
        Ok(user)
    }

    /// Lend a book to a user
    ///
    /// The book is looked up before the user.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No book has the given ISBN (`BookNotFound`)
    /// - No user has the given ID (`UserNotFound`)
    /// - The book is already out on loan (`AlreadyBorrowed`)
    pub fn borrow_book(&mut self, isbn: &str, user_id: &str) -> LibraryResult<()> {
        let book = self
            .books
            .get_mut(isbn)
            .ok_or_else(|| LibraryError::BookNotFound { isbn: isbn.to_string() })?;
        let user = self
            .users
            .get_mut(user_id)
            .ok_or_else(|| LibraryError::UserNotFound { user_id: user_id.to_string() })?;

        // Status check and flip happen together; a refusal leaves both sides untouched.
        if !book.borrow() {
            tracing::debug!(%isbn, %user_id, "book already borrowed");
            return Err(LibraryError::AlreadyBorrowed {
                isbn: isbn.to_string(),
                title: book.title.clone(),
            });
        }
        user.add_borrowed_isbn(isbn);

        self.notify(&LibraryEvent::BookBorrowed {
            isbn: isbn.to_string(),
            user_id: user_id.to_string(),
        });
        Ok(())
    }

    /// Take a book back from the user who borrowed it
    ///
    /// The book is looked up before the user.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No book has the given ISBN (`BookNotFound`)
    /// - No user has the given ID (`UserNotFound`)
    /// - The user does not hold this book (`NotBorrowedBy`)
    /// - The user holds the book but it is not marked borrowed (`InvariantViolation`)
    pub fn return_book(&mut self, isbn: &str, user_id: &str) -> LibraryResult<()> {
        let book = self
            .books
            .get_mut(isbn)
            .ok_or_else(|| LibraryError::BookNotFound { isbn: isbn.to_string() })?;
        let user = self
            .users
            .get_mut(user_id)
            .ok_or_else(|| LibraryError::UserNotFound { user_id: user_id.to_string() })?;

        if !user.has_borrowed(isbn) {
            tracing::debug!(%isbn, %user_id, "user does not hold this book");
            return Err(LibraryError::NotBorrowedBy {
                isbn: isbn.to_string(),
                user_id: user_id.to_string(),
            });
        }

        if !book.return_book() {
            let anomaly = Anomaly::LoanOnAvailableBook {
                user_id: user_id.to_string(),
                isbn: isbn.to_string(),
            };
            tracing::error!(%anomaly, "refusing return on inconsistent loan");
            return Err(LibraryError::InvariantViolation(anomaly));
        }
        user.remove_borrowed_isbn(isbn);

        self.notify(&LibraryEvent::BookReturned {
            isbn: isbn.to_string(),
            user_id: user_id.to_string(),
        });
        Ok(())
    }

    /// Find books by title or author substring, or by exact ISBN.
    ///
    /// Matching ignores case. An empty result is not an error.
    #[must_use]
    pub fn search_books(&self, query: &str) -> Vec<&Book> {
        let query = query.to_lowercase();
        self.books
            .values()
            .filter(|book| {
                book.title.to_lowercase().contains(&query)
                    || book.author.to_lowercase().contains(&query)
                    || book.isbn.to_lowercase() == query
            })
            .collect()
    }

    /// All books, in ISBN order
    #[must_use]
    pub fn list_books(&self) -> Vec<&Book> {
        self.books.values().collect()
    }

    /// All users, in user ID order
    #[must_use]
    pub fn list_users(&self) -> Vec<&User> {
        self.users.values().collect()
    }

    /// Books currently held by a user.
    ///
    /// An ISBN the catalog no longer knows about is reported as
    /// [`LoanEntry::Missing`] rather than failing the whole listing.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::UserNotFound` if no user has the given ID
    pub fn list_user_loans(&self, user_id: &str) -> LibraryResult<Vec<LoanEntry<'_>>> {
        let user = self
            .users
            .get(user_id)
            .ok_or_else(|| LibraryError::UserNotFound { user_id: user_id.to_string() })?;

        Ok(user
            .borrowed_isbns()
            .map(|isbn| match self.books.get(isbn) {
                Some(book) => LoanEntry::Book(book),
                None => {
                    tracing::warn!(%user_id, %isbn, "loan references a missing book");
                    LoanEntry::Missing { isbn }
                }
            })
            .collect())
    }

    /// Look up a book by ISBN
    #[must_use]
    pub fn book(&self, isbn: &str) -> Option<&Book> {
        self.books.get(isbn)
    }

    /// Look up a user by ID
    #[must_use]
    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.get(user_id)
    }

    /// Number of books in the catalog
    #[must_use]
    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    /// Number of registered users
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Number of books currently out on loan
    #[must_use]
    pub fn loan_count(&self) -> usize {
        self.books.values().filter(|book| book.is_borrowed()).count()
    }

    /// Whether the catalog holds neither books nor users
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty() && self.users.is_empty()
    }

    /// Check every cross-entity invariant and report what is broken.
    ///
    /// An empty result means the catalog is consistent.
    #[must_use]
    pub fn audit(&self) -> Vec<Anomaly> {
        let mut anomalies = Vec::new();
        let mut holders: BTreeMap<&str, Vec<String>> = BTreeMap::new();

        for user in self.users.values() {
            for isbn in user.borrowed_isbns() {
                holders.entry(isbn).or_default().push(user.user_id.clone());
                match self.books.get(isbn) {
                    None => anomalies.push(Anomaly::DanglingLoan {
                        user_id: user.user_id.clone(),
                        isbn: isbn.to_string(),
                    }),
                    Some(book) if !book.is_borrowed() => {
                        anomalies.push(Anomaly::LoanOnAvailableBook {
                            user_id: user.user_id.clone(),
                            isbn: isbn.to_string(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        for (isbn, user_ids) in &holders {
            if user_ids.len() > 1 {
                anomalies.push(Anomaly::SharedLoan {
                    isbn: (*isbn).to_string(),
                    user_ids: user_ids.clone(),
                });
            }
        }

        for book in self.books.values().filter(|book| book.is_borrowed()) {
            if !holders.contains_key(book.isbn.as_str()) {
                anomalies.push(Anomaly::OrphanedBorrow { isbn: book.isbn.clone() });
            }
        }

        for anomaly in &anomalies {
            tracing::error!(%anomaly, "catalog audit found an inconsistency");
        }
        anomalies
    }
}

// Implementing display for nicer output
impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} books ({} on loan), {} users",
            self.book_count(),
            self.loan_count(),
            self.user_count()
        )
    }
}
