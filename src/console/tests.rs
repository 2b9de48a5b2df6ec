use std::io::Cursor;

use crate::{
    console::{Command, Console, ConsoleConfig, UnknownCommand, require},
    library::Library,
    report::Report,
};

/// Helper function to run a script through a fresh console
fn run_script(script: &str) -> (String, Library) {
    let mut output = Vec::new();
    let mut console =
        Console::new(Library::new(), Cursor::new(script), &mut output, ConsoleConfig::default());
    let summary = console.run();
    assert!(summary.is_ok());
    let library = console.into_library();
    (String::from_utf8_lossy(&output).into_owned(), library)
}

#[test]
fn test_parse_names_and_menu_numbers() {
    assert_eq!("add-book".parse::<Command>(), Ok(Command::AddBook));
    assert_eq!("  LIST-LOANS ".parse::<Command>(), Ok(Command::ListLoans));
    assert_eq!("10".parse::<Command>(), Ok(Command::ListLoans));
    assert_eq!("0".parse::<Command>(), Ok(Command::Exit));
    assert_eq!("quit".parse::<Command>(), Ok(Command::Exit));
    assert_eq!("11".parse::<Command>(), Err(UnknownCommand("11".to_string())));
}

#[test]
fn test_require_names_first_blank_field() {
    assert_eq!(require(&[("Title", "1984"), ("ISBN", "111")]), None);
    assert_eq!(
        require(&[("Title", ""), ("ISBN", "")]),
        Some(Report::Rejected {
            code: "invalid_input",
            message: "Title must not be empty.".to_string()
        })
    );
}

#[test]
fn test_execute_reads_fields_from_input() {
    let mut output = Vec::new();
    let mut console = Console::new(
        Library::new(),
        Cursor::new("1984\nOrwell\n111\n"),
        &mut output,
        ConsoleConfig::default(),
    );

    let report = console.execute(Command::AddBook);
    assert!(matches!(
        report,
        Ok(Some(Report::Done(ref message))) if message == "Book '1984' added."
    ));
    assert_eq!(console.library().book_count(), 1);

    // Input is exhausted now
    assert!(matches!(console.execute(Command::RemoveBook), Ok(None)));
}

#[test]
fn test_blank_title_is_rejected() {
    let (output, library) = run_script("add-book\n\nOrwell\n111\n");
    assert_eq!(output, "Error: Title must not be empty.\n");
    assert!(library.is_empty());
}

#[test]
fn test_truncated_command_stops_quietly() {
    let (output, library) = run_script("register-user\nAlice\n");
    assert_eq!(output, "");
    assert!(library.is_empty());
}

#[test]
fn test_prompts_are_written_when_enabled() {
    let mut output = Vec::new();
    let config = ConsoleConfig { prompt: true, ..ConsoleConfig::default() };
    let input = Cursor::new("3\nAlice\nA1\n0\n");
    let mut console = Console::new(Library::new(), input, &mut output, config);
    assert!(console.run().is_ok());

    let output = String::from_utf8_lossy(&output);
    assert!(output.starts_with("--- Menu ---\n"));
    assert!(output.contains("Enter choice: User Name: User ID: User 'Alice' registered.\n"));
    assert!(output.ends_with("Enter choice: Exiting.\n"));
}
