use super::super::storage::StorageError;
use super::super::traits::BookingError;
use shared::booking::{CommandError, CommandErrorCode};
use thiserror::Error;

/// Manager errors
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Booking not found: {0}")]
    BookingNotFound(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Pickup date {date} is full ({count} bookings)")]
    CapacityExceeded { date: String, count: u32 },

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Concurrent modification: {0}")]
    ConcurrentModification(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Map storage failures to error codes the client can act on
fn classify_storage_error(e: &StorageError) -> CommandErrorCode {
    match e {
        StorageError::Serialization(_) => return CommandErrorCode::InternalError,
        StorageError::BookingNotFound(_) => return CommandErrorCode::BookingNotFound,
        _ => {}
    }

    // redb surfaces environment failures as strings
    let err_str = e.to_string().to_lowercase();

    if err_str.contains("no space") || err_str.contains("disk full") || err_str.contains("enospc")
    {
        return CommandErrorCode::StorageFull;
    }

    if err_str.contains("out of memory") || err_str.contains("cannot allocate") {
        return CommandErrorCode::OutOfMemory;
    }

    if err_str.contains("corrupt") || err_str.contains("invalid database") {
        return CommandErrorCode::StorageCorrupted;
    }

    CommandErrorCode::SystemBusy
}

impl From<ManagerError> for CommandError {
    fn from(err: ManagerError) -> Self {
        let (code, message) = match err {
            ManagerError::Storage(e) => {
                let code = classify_storage_error(&e);
                let message = e.to_string();
                tracing::error!(error = %e, error_code = ?code, "Storage error occurred");
                (code, message)
            }
            ManagerError::BookingNotFound(id) => (
                CommandErrorCode::BookingNotFound,
                format!("Booking not found: {}", id),
            ),
            ManagerError::InvalidSelection(msg) => (CommandErrorCode::InvalidSelection, msg),
            ManagerError::CapacityExceeded { date, count } => (
                CommandErrorCode::CapacityExceeded,
                format!("Pickup date {} is full ({} bookings)", date, count),
            ),
            ManagerError::InvalidTransition(msg) => (CommandErrorCode::InvalidTransition, msg),
            ManagerError::ConcurrentModification(msg) => {
                (CommandErrorCode::ConcurrentModification, msg)
            }
            ManagerError::InvalidState(msg) => (CommandErrorCode::InvalidState, msg),
            ManagerError::Internal(msg) => (CommandErrorCode::InternalError, msg),
        };
        CommandError::new(code, message)
    }
}

impl From<BookingError> for ManagerError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::BookingNotFound(id) => ManagerError::BookingNotFound(id),
            BookingError::InvalidSelection(msg) => ManagerError::InvalidSelection(msg),
            BookingError::CapacityExceeded { date, count } => {
                ManagerError::CapacityExceeded { date, count }
            }
            BookingError::InvalidTransition(msg) => ManagerError::InvalidTransition(msg),
            BookingError::ConcurrentModification(msg) => {
                ManagerError::ConcurrentModification(msg)
            }
            BookingError::InvalidState(msg) => ManagerError::InvalidState(msg),
            BookingError::Storage(msg) => ManagerError::Internal(msg),
        }
    }
}

pub type ManagerResult<T> = Result<T, ManagerError>;
