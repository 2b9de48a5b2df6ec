//! Line-based console driver for a [`Library`].
//!
//! Each command is read on its own line, followed by one line per field.
//! Commands can be given by name (`add-book`) or by their menu number (`1`).

use std::{
    fmt,
    io::{self, BufRead, Write},
    str::FromStr,
};

use colored::Colorize;

use crate::{
    book::Book,
    library::Library,
    report::{LoanLine, Report},
    user::User,
};

/// How command results are written to the output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable messages, one per line
    #[default]
    Text,
    /// One JSON object per command
    Json,
}

/// Settings for a console session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Output format
    pub format: OutputFormat,
    /// Colorize text output
    pub color: bool,
    /// Print the menu and field prompts
    pub prompt: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self { format: OutputFormat::Text, color: false, prompt: false }
    }
}

/// Commands understood by the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Add a book: title, author, ISBN
    AddBook,
    /// Remove a book: ISBN
    RemoveBook,
    /// Register a user: name, user ID
    RegisterUser,
    /// Remove a user: user ID
    RemoveUser,
    /// Lend a book: ISBN, user ID
    Borrow,
    /// Take a book back: ISBN, user ID
    Return,
    /// Search the catalog: query
    Search,
    /// List every book
    ListBooks,
    /// List every user
    ListUsers,
    /// List one user's loans: user ID
    ListLoans,
    /// Check catalog consistency
    Audit,
    /// Show the menu
    Help,
    /// Leave the console
    Exit,
}

/// A command line that matches no known command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid choice: {}", self.0)
    }
}

impl std::error::Error for UnknownCommand {}

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let command = match s.trim().to_lowercase().as_str() {
            "add-book" | "1" => Self::AddBook,
            "remove-book" | "2" => Self::RemoveBook,
            "register-user" | "3" => Self::RegisterUser,
            "remove-user" | "4" => Self::RemoveUser,
            "borrow" | "5" => Self::Borrow,
            "return" | "6" => Self::Return,
            "search" | "7" => Self::Search,
            "list-books" | "8" => Self::ListBooks,
            "list-users" | "9" => Self::ListUsers,
            "list-loans" | "10" => Self::ListLoans,
            "audit" => Self::Audit,
            "help" => Self::Help,
            "exit" | "quit" | "0" => Self::Exit,
            _ => return Err(UnknownCommand(s.trim().to_string())),
        };
        Ok(command)
    }
}

/// Counters for a finished console session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Commands read, including unknown ones
    pub executed: usize,
    /// Commands that reported an error
    pub failed: usize,
}

/// Interactive driver that reads commands and applies them to a library
#[derive(Debug)]
pub struct Console<R, W> {
    /// The catalog being driven
    library: Library,
    /// Command and field source
    input: R,
    /// Destination for prompts and results
    output: W,
    /// Session settings
    config: ConsoleConfig,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Create a console over the given library and streams
    #[must_use]
    pub fn new(library: Library, input: R, output: W, config: ConsoleConfig) -> Self {
        Self { library, input, output, config }
    }

    /// The library being driven
    #[must_use]
    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Consume the console and hand back the library
    #[must_use]
    pub fn into_library(self) -> Library {
        self.library
    }

    /// Read and execute commands until `exit` or end of input
    ///
    /// # Errors
    ///
    /// Returns an error if reading the input or writing the output fails
    pub fn run(&mut self) -> io::Result<RunSummary> {
        let mut summary = RunSummary::default();

        if self.config.prompt {
            self.emit(&Report::Help)?;
        }

        loop {
            let Some(line) = self.read_field("Enter choice")? else {
                break;
            };
            if line.is_empty() {
                continue;
            }

            let report = match line.parse::<Command>() {
                Ok(Command::Exit) => {
                    if self.config.format == OutputFormat::Text {
                        writeln!(self.output, "Exiting.")?;
                    }
                    break;
                }
                Ok(command) => match self.execute(command)? {
                    Some(report) => report,
                    // Input ran out in the middle of a command
                    None => break,
                },
                Err(unknown) => {
                    Report::Rejected { code: "invalid_command", message: unknown.to_string() }
                }
            };

            summary.executed = summary.executed.saturating_add(1);
            if report.is_failure() {
                summary.failed = summary.failed.saturating_add(1);
            }
            self.emit(&report)?;
        }

        self.output.flush()?;
        tracing::debug!(
            executed = summary.executed,
            failed = summary.failed,
            "console session ended"
        );
        Ok(summary)
    }

    /// Execute a single command, reading its fields from the input.
    ///
    /// Returns `None` if the input ends before every field is read.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the input or writing a prompt fails
    pub fn execute(&mut self, command: Command) -> io::Result<Option<Report>> {
        tracing::debug!(?command, "executing command");

        let report = match command {
            Command::AddBook => {
                let Some(title) = self.read_field("Title")? else { return Ok(None) };
                let Some(author) = self.read_field("Author")? else { return Ok(None) };
                let Some(isbn) = self.read_field("ISBN")? else { return Ok(None) };
                let fields = [("Title", title.as_str()), ("ISBN", isbn.as_str())];
                if let Some(rejected) = require(&fields) {
                    return Ok(Some(rejected));
                }
                let book = Book::new(title, author, isbn);
                let message = format!("Book '{}' added.", book.title);
                match self.library.add_book(book) {
                    Ok(()) => Report::Done(message),
                    Err(error) => Report::Failed(error),
                }
            }
            Command::RemoveBook => {
                let Some(isbn) = self.read_field("ISBN to remove")? else { return Ok(None) };
                if let Some(rejected) = require(&[("ISBN", isbn.as_str())]) {
                    return Ok(Some(rejected));
                }
                match self.library.remove_book(&isbn) {
                    Ok(book) => Report::Done(format!("Book with ISBN {} removed.", book.isbn)),
                    Err(error) => Report::Failed(error),
                }
            }
            Command::RegisterUser => {
                let Some(name) = self.read_field("User Name")? else { return Ok(None) };
                let Some(user_id) = self.read_field("User ID")? else { return Ok(None) };
                let fields = [("User Name", name.as_str()), ("User ID", user_id.as_str())];
                if let Some(rejected) = require(&fields) {
                    return Ok(Some(rejected));
                }
                let user = User::new(name, user_id);
                let message = format!("User '{}' registered.", user.name);
                match self.library.register_user(user) {
                    Ok(()) => Report::Done(message),
                    Err(error) => Report::Failed(error),
                }
            }
            Command::RemoveUser => {
                let Some(user_id) = self.read_field("User ID to remove")? else { return Ok(None) };
                if let Some(rejected) = require(&[("User ID", user_id.as_str())]) {
                    return Ok(Some(rejected));
                }
                match self.library.remove_user(&user_id) {
                    Ok(user) => Report::Done(format!("User with ID {} removed.", user.user_id)),
                    Err(error) => Report::Failed(error),
                }
            }
            Command::Borrow | Command::Return => {
                let Some(isbn) = self.read_field("Book ISBN")? else { return Ok(None) };
                let Some(user_id) = self.read_field("User ID")? else { return Ok(None) };
                let fields = [("ISBN", isbn.as_str()), ("User ID", user_id.as_str())];
                if let Some(rejected) = require(&fields) {
                    return Ok(Some(rejected));
                }
                let (result, verb) = if command == Command::Borrow {
                    (self.library.borrow_book(&isbn, &user_id), "borrowed")
                } else {
                    (self.library.return_book(&isbn, &user_id), "returned")
                };
                match result {
                    Ok(()) => Report::Done(self.loan_message(&isbn, &user_id, verb)),
                    Err(error) => Report::Failed(error),
                }
            }
            Command::Search => {
                let Some(query) = self.read_field("Search (title/author/ISBN)")? else {
                    return Ok(None);
                };
                Report::Books {
                    heading: "Found Books",
                    empty: "No books found.",
                    books: self.library.search_books(&query).into_iter().cloned().collect(),
                }
            }
            Command::ListBooks => Report::Books {
                heading: "All Books",
                empty: "No books in library.",
                books: self.library.list_books().into_iter().cloned().collect(),
            },
            Command::ListUsers => {
                Report::Users(self.library.list_users().into_iter().cloned().collect())
            }
            Command::ListLoans => {
                let Some(user_id) = self.read_field("User ID")? else { return Ok(None) };
                match self.library.list_user_loans(&user_id) {
                    Ok(entries) => Report::Loans {
                        name: self
                            .library
                            .user(&user_id)
                            .map_or_else(|| user_id.clone(), |user| user.name.clone()),
                        lines: entries.into_iter().map(LoanLine::from).collect(),
                        user_id,
                    },
                    Err(error) => Report::Failed(error),
                }
            }
            Command::Audit => Report::Anomalies(self.library.audit()),
            Command::Help => Report::Help,
            Command::Exit => return Ok(None),
        };

        Ok(Some(report))
    }

    /// Success message for a borrow or return
    fn loan_message(&self, isbn: &str, user_id: &str, verb: &str) -> String {
        let title = self.library.book(isbn).map_or(isbn, |book| book.title.as_str());
        let name = self.library.user(user_id).map_or(user_id, |user| user.name.as_str());
        format!("Book '{title}' {verb} by '{name}'.")
    }

    /// Prompt for a field and read it, trimmed. `None` at end of input.
    fn read_field(&mut self, label: &str) -> io::Result<Option<String>> {
        if self.config.prompt {
            write!(self.output, "{label}: ")?;
            self.output.flush()?;
        }

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Write a report in the configured format
    fn emit(&mut self, report: &Report) -> io::Result<()> {
        match self.config.format {
            OutputFormat::Json => {
                let json = serde_json::to_string(&report.to_json())?;
                writeln!(self.output, "{json}")?;
            }
            OutputFormat::Text => {
                for line in report.to_lines() {
                    if !self.config.color {
                        writeln!(self.output, "{line}")?;
                    } else if report.is_failure() {
                        writeln!(self.output, "{}", line.red())?;
                    } else if matches!(report, Report::Done(_)) {
                        writeln!(self.output, "{}", line.green())?;
                    } else if line.starts_with("---") {
                        writeln!(self.output, "{}", line.yellow().bold())?;
                    } else {
                        writeln!(self.output, "{line}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Reject the command if any required field is blank
fn require(fields: &[(&str, &str)]) -> Option<Report> {
    fields.iter().find(|(_, value)| value.is_empty()).map(|(label, _)| Report::Rejected {
        code: "invalid_input",
        message: format!("{label} must not be empty."),
    })
}

// Include tests module
#[cfg(test)]
mod tests;
