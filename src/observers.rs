use crate::events::LibraryEvent;

/// Trait for catalog change observation
pub trait LibraryObserver {
    /// Called after a mutation has been fully applied
    fn on_event(&self, event: &LibraryEvent);
}

/// Logs every catalog mutation through `tracing`
#[derive(Debug, Default)]
pub struct EventLogger;

impl LibraryObserver for EventLogger {
    fn on_event(&self, event: &LibraryEvent) {
        match event {
            LibraryEvent::BookAdded { isbn, title } => {
                tracing::info!(%isbn, %title, "book added");
            }
            LibraryEvent::BookRemoved { isbn } => {
                tracing::info!(%isbn, "book removed");
            }
            LibraryEvent::UserRegistered { user_id, name } => {
                tracing::info!(%user_id, %name, "user registered");
            }
            LibraryEvent::UserRemoved { user_id } => {
                tracing::info!(%user_id, "user removed");
            }
            LibraryEvent::BookBorrowed { isbn, user_id } => {
                tracing::info!(%isbn, %user_id, "book borrowed");
            }
            LibraryEvent::BookReturned { isbn, user_id } => {
                tracing::info!(%isbn, %user_id, "book returned");
            }
        }
    }
}
