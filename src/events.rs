use serde::{Deserialize, Serialize};

/// Successful catalog mutations, as reported to observers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LibraryEvent {
    /// A book was added to the catalog
    BookAdded { isbn: String, title: String },
    /// A book was removed from the catalog
    BookRemoved { isbn: String },
    /// A user was registered
    UserRegistered { user_id: String, name: String },
    /// A user was removed
    UserRemoved { user_id: String },
    /// A book was lent to a user
    BookBorrowed { isbn: String, user_id: String },
    /// A user brought a book back
    BookReturned { isbn: String, user_id: String },
}
