use library_catalog::{Book, ErrorKind, Library, User};
use proptest::prelude::*;

/// One step of a random catalog session
#[derive(Debug, Clone)]
enum Op {
    /// Add book n
    AddBook(u8),
    /// Remove book n
    RemoveBook(u8),
    /// Register user n
    RegisterUser(u8),
    /// Remove user n
    RemoveUser(u8),
    /// Lend book b to user u
    Borrow(u8, u8),
    /// User u returns book b
    Return(u8, u8),
}

/// Small key spaces so operations collide often
fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..6u8).prop_map(Op::AddBook),
        (0..6u8).prop_map(Op::RemoveBook),
        (0..4u8).prop_map(Op::RegisterUser),
        (0..4u8).prop_map(Op::RemoveUser),
        (0..6u8, 0..4u8).prop_map(|(book, user)| Op::Borrow(book, user)),
        (0..6u8, 0..4u8).prop_map(|(book, user)| Op::Return(book, user)),
    ]
}

/// ISBN for the n-th book
fn isbn(n: u8) -> String {
    format!("isbn-{n}")
}

/// ID for the n-th user
fn user_id(n: u8) -> String {
    format!("user-{n}")
}

/// The n-th book
fn book(n: u8) -> Book {
    Book::new(format!("Title {n}"), "Author", isbn(n))
}

/// The n-th user
fn user(n: u8) -> User {
    User::new(format!("Name {n}"), user_id(n))
}

proptest! {
    #[test]
    fn lending_invariants_hold_after_every_step(ops in proptest::collection::vec(op(), 0..64)) {
        let mut library = Library::new();

        for op in ops {
            let result = match op {
                Op::AddBook(n) => library.add_book(book(n)),
                Op::RemoveBook(n) => library.remove_book(&isbn(n)).map(drop),
                Op::RegisterUser(n) => library.register_user(user(n)),
                Op::RemoveUser(n) => library.remove_user(&user_id(n)).map(drop),
                Op::Borrow(b, u) => library.borrow_book(&isbn(b), &user_id(u)),
                Op::Return(b, u) => library.return_book(&isbn(b), &user_id(u)),
            };

            if let Err(error) = result {
                prop_assert_ne!(error.kind(), ErrorKind::Anomaly);
            }
            prop_assert!(library.audit().is_empty());

            let held: usize = library.list_users().iter().map(|user| user.loan_count()).sum();
            prop_assert_eq!(held, library.loan_count());
        }
    }

    #[test]
    fn failed_operations_leave_state_unchanged(
        ops in proptest::collection::vec(op(), 0..32),
        probe in op()
    ) {
        let mut library = Library::new();
        for op in ops {
            drop(match op {
                Op::AddBook(n) => library.add_book(book(n)),
                Op::RegisterUser(n) => library.register_user(user(n)),
                Op::Borrow(b, u) => library.borrow_book(&isbn(b), &user_id(u)),
                _ => Ok(()),
            });
        }

        let books_before: Vec<Book> = library.list_books().into_iter().cloned().collect();
        let users_before: Vec<User> = library.list_users().into_iter().cloned().collect();

        let result = match probe {
            Op::AddBook(n) => library.add_book(Book::new("Probe", "Author", isbn(n))),
            Op::RemoveBook(n) => library.remove_book(&isbn(n)).map(drop),
            Op::RegisterUser(n) => library.register_user(User::new("Probe", user_id(n))),
            Op::RemoveUser(n) => library.remove_user(&user_id(n)).map(drop),
            Op::Borrow(b, u) => library.borrow_book(&isbn(b), &user_id(u)),
            Op::Return(b, u) => library.return_book(&isbn(b), &user_id(u)),
        };

        if result.is_err() {
            let books_after: Vec<Book> = library.list_books().into_iter().cloned().collect();
            let users_after: Vec<User> = library.list_users().into_iter().cloned().collect();
            prop_assert_eq!(books_before, books_after);
            prop_assert_eq!(users_before, users_after);
        }
    }
}
