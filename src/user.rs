use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

/// A registered library patron
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    /// Display name of the patron
    pub name: String,
    /// Identifier of the patron, unique within a library
    pub user_id: String,
    /// ISBNs of the books this patron currently holds
    #[serde(default)]
    borrowed_isbns: BTreeSet<String>,
}

impl User {
    /// Create a new user with no loans
    #[must_use]
    pub fn new(name: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self { name: name.into(), user_id: user_id.into(), borrowed_isbns: BTreeSet::new() }
    }

    /// Record a loan. Recording the same ISBN twice is a no-op.
    pub fn add_borrowed_isbn(&mut self, isbn: &str) {
        if !self.borrowed_isbns.contains(isbn) {
            self.borrowed_isbns.insert(isbn.to_string());
        }
    }

    /// Forget a loan. Forgetting an ISBN that is not held is a no-op.
    pub fn remove_borrowed_isbn(&mut self, isbn: &str) {
        self.borrowed_isbns.remove(isbn);
    }

    /// Whether this user currently holds the given ISBN
    #[must_use]
    pub fn has_borrowed(&self, isbn: &str) -> bool {
        self.borrowed_isbns.contains(isbn)
    }

    /// ISBNs currently held by this user, in ISBN order
    #[must_use]
    pub fn borrowed_isbns(&self) -> impl Iterator<Item = &str> {
        self.borrowed_isbns.iter().map(String::as_str)
    }

    /// Number of books currently held by this user
    #[must_use]
    pub fn loan_count(&self) -> usize {
        self.borrowed_isbns.len()
    }

    /// Human-readable one-line summary
    #[must_use]
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User: {} (ID: {}), Borrowed: {} books",
            self.name,
            self.user_id,
            self.loan_count()
        )
    }
}
