//! In-memory library catalog that tracks books, users and lending state.
//!
//! The [`Library`] owns every [`Book`] and [`User`] and keeps the lending
//! invariants intact across every operation. A line-based [`Console`] drives
//! it from any `BufRead` source.

pub mod book;
pub mod console;
pub mod error;
pub mod events;
pub mod library;
pub mod observers;
pub mod report;
pub mod user;

pub use book::{Book, BookStatus};
pub use console::{Command, Console, ConsoleConfig, OutputFormat, RunSummary};
pub use error::{Anomaly, ErrorKind, LibraryError, LibraryResult};
pub use events::LibraryEvent;
pub use library::{Library, LoanEntry};
pub use observers::{EventLogger, LibraryObserver};
pub use report::Report;
pub use user::User;
