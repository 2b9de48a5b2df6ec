use serde_json::{Value, json};

use crate::{
    book::Book,
    error::{Anomaly, LibraryError},
    library::LoanEntry,
    user::User,
};

/// Owned copy of one line of a user's loan listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoanLine {
    /// The borrowed book
    Book(Book),
    /// ISBN held by the user but absent from the catalog
    Missing(String),
}

impl From<LoanEntry<'_>> for LoanLine {
    fn from(entry: LoanEntry<'_>) -> Self {
        match entry {
            LoanEntry::Book(book) => Self::Book(book.clone()),
            LoanEntry::Missing { isbn } => Self::Missing(isbn.to_string()),
        }
    }
}

/// Result of one console command, ready to be rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// A mutation succeeded
    Done(String),
    /// A list of books, with the heading and empty-list text to print
    Books { heading: &'static str, empty: &'static str, books: Vec<Book> },
    /// All registered users
    Users(Vec<User>),
    /// Loans held by one user
    Loans { user_id: String, name: String, lines: Vec<LoanLine> },
    /// Result of a catalog audit
    Anomalies(Vec<Anomaly>),
    /// Command reference
    Help,
    /// The library refused the operation
    Failed(LibraryError),
    /// The driver refused the input before reaching the library
    Rejected { code: &'static str, message: String },
}

/// Command names, menu aliases and descriptions shown by `help`
pub const COMMANDS: [(&str, &str, &str); 13] = [
    ("add-book", "1", "Add Book"),
    ("remove-book", "2", "Remove Book"),
    ("register-user", "3", "Register User"),
    ("remove-user", "4", "Remove User"),
    ("borrow", "5", "Borrow Book"),
    ("return", "6", "Return Book"),
    ("search", "7", "Search Book"),
    ("list-books", "8", "Display All Books"),
    ("list-users", "9", "Display All Users"),
    ("list-loans", "10", "Display User Borrowed Books"),
    ("audit", "", "Check Catalog Consistency"),
    ("help", "", "Show This Menu"),
    ("exit", "0", "Exit"),
];

impl Report {
    /// Whether the command failed
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_) | Self::Rejected { .. })
    }

    /// Render as plain text lines
    #[must_use]
    pub fn to_lines(&self) -> Vec<String> {
        match self {
            Self::Done(message) => vec![message.clone()],
            Self::Books { heading, empty, books } => {
                if books.is_empty() {
                    return vec![(*empty).to_string()];
                }
                let mut lines = vec![format!("--- {heading} ---")];
                lines.extend(books.iter().map(Book::describe));
                lines
            }
            Self::Users(users) => {
                if users.is_empty() {
                    return vec!["No users registered.".to_string()];
                }
                let mut lines = vec!["--- All Users ---".to_string()];
                lines.extend(users.iter().map(User::describe));
                lines
            }
            Self::Loans { name, lines: loans, .. } => {
                let mut lines = vec![format!("--- Books Borrowed by {name} ---")];
                if loans.is_empty() {
                    lines.push("No books borrowed by this user.".to_string());
                }
                lines.extend(loans.iter().map(|loan| match loan {
                    LoanLine::Book(book) => book.describe(),
                    LoanLine::Missing(isbn) => format!("Book (ISBN: {isbn}) not found in library."),
                }));
                lines
            }
            Self::Anomalies(anomalies) => {
                if anomalies.is_empty() {
                    return vec!["Catalog is consistent.".to_string()];
                }
                let mut lines = vec!["--- Catalog Anomalies ---".to_string()];
                lines.extend(anomalies.iter().map(ToString::to_string));
                lines
            }
            Self::Help => {
                let mut lines = vec!["--- Menu ---".to_string()];
                lines.extend(COMMANDS.iter().map(|(name, alias, about)| {
                    format!("{alias:>3} {name:<15} {about}")
                }));
                lines
            }
            Self::Failed(error) => vec![format!("Error: {error}")],
            Self::Rejected { message, .. } => vec![format!("Error: {message}")],
        }
    }

    /// Render as a single JSON object
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Done(message) => json!({ "ok": true, "message": message }),
            Self::Books { books, .. } => json!({ "ok": true, "books": books }),
            Self::Users(users) => json!({ "ok": true, "users": users }),
            Self::Loans { user_id, name, lines } => {
                let loans: Vec<Value> = lines
                    .iter()
                    .map(|loan| match loan {
                        LoanLine::Book(book) => json!({ "book": book }),
                        LoanLine::Missing(isbn) => json!({ "missing": isbn }),
                    })
                    .collect();
                json!({ "ok": true, "user_id": user_id, "name": name, "loans": loans })
            }
            Self::Anomalies(anomalies) => json!({ "ok": true, "anomalies": anomalies }),
            Self::Help => {
                let commands: Vec<&str> = COMMANDS.iter().map(|(name, _, _)| *name).collect();
                json!({ "ok": true, "commands": commands })
            }
            Self::Failed(error) => json!({
                "ok": false,
                "error": error.kind(),
                "message": error.to_string(),
            }),
            Self::Rejected { code, message } => json!({
                "ok": false,
                "error": code,
                "message": message,
            }),
        }
    }
}
