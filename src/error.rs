use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad category of a [`LibraryError`], stable across variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// An ISBN or user ID that is already present was inserted again
    DuplicateKey,
    /// An ISBN or user ID does not exist
    NotFound,
    /// The operation is blocked by an outstanding loan
    Conflict,
    /// A return named a loan that does not exist
    InvalidState,
    /// The catalog failed its own consistency rules
    Anomaly,
}

impl ErrorKind {
    /// Machine-friendly name of the kind
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DuplicateKey => "duplicate_key",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::InvalidState => "invalid_state",
            Self::Anomaly => "anomaly",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A broken cross-entity invariant found in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(tag = "anomaly", rename_all = "snake_case")]
pub enum Anomaly {
    /// A user holds an ISBN that has no book
    DanglingLoan { user_id: String, isbn: String },
    /// A user holds an ISBN whose book is marked available
    LoanOnAvailableBook { user_id: String, isbn: String },
    /// More than one user holds the same ISBN
    SharedLoan { isbn: String, user_ids: Vec<String> },
    /// A book is marked borrowed but nobody holds it
    OrphanedBorrow { isbn: String },
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingLoan { user_id, isbn } => {
                write!(f, "user {user_id} holds ISBN {isbn}, which is not in the catalog")
            }
            Self::LoanOnAvailableBook { user_id, isbn } => {
                write!(f, "user {user_id} holds ISBN {isbn}, but the book is not marked borrowed")
            }
            Self::SharedLoan { isbn, user_ids } => {
                write!(f, "ISBN {isbn} is held by several users: {}", user_ids.join(", "))
            }
            Self::OrphanedBorrow { isbn } => {
                write!(f, "ISBN {isbn} is marked borrowed, but no user holds it")
            }
        }
    }
}

/// Errors reported by [`crate::Library`] operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    #[error("Book with ISBN {isbn} already exists.")]
    DuplicateBook { isbn: String },

    #[error("User with ID {user_id} already exists.")]
    DuplicateUser { user_id: String },

    #[error("Book with ISBN {isbn} not found.")]
    BookNotFound { isbn: String },

    #[error("User with ID {user_id} not found.")]
    UserNotFound { user_id: String },

    #[error("Book '{title}' is borrowed.")]
    BookBorrowed { isbn: String, title: String },

    #[error("User '{name}' has borrowed books ({count}).")]
    UserHasLoans { user_id: String, name: String, count: usize },

    #[error("Book '{title}' is already borrowed.")]
    AlreadyBorrowed { isbn: String, title: String },

    #[error("User with ID {user_id} did not borrow the book with ISBN {isbn}.")]
    NotBorrowedBy { isbn: String, user_id: String },

    #[error("Catalog is inconsistent: {0}")]
    InvariantViolation(Anomaly),
}

impl LibraryError {
    /// Category of this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateBook { .. } | Self::DuplicateUser { .. } => ErrorKind::DuplicateKey,
            Self::BookNotFound { .. } | Self::UserNotFound { .. } => ErrorKind::NotFound,
            Self::BookBorrowed { .. }
            | Self::UserHasLoans { .. }
            | Self::AlreadyBorrowed { .. } => ErrorKind::Conflict,
            Self::NotBorrowedBy { .. } => ErrorKind::InvalidState,
            Self::InvariantViolation(_) => ErrorKind::Anomaly,
        }
    }
}

/// Result type used throughout the library catalog
pub type LibraryResult<T> = Result<T, LibraryError>;
