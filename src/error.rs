//! Input validation errors raised by the interactive menu.

use thiserror::Error;

/// Why a menu action could not go ahead. Apart from `Io`, the menu prints
/// the message and shows the main menu again.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Task title cannot be empty.")]
    EmptyTitle,

    #[error("Invalid ID {0:?}. Please enter a number.")]
    InvalidId(String),

    #[error("Task with ID {0} not found.")]
    TaskNotFound(u64),

    #[error("Invalid choice {0:?}.")]
    InvalidChoice(String),

    #[error("Search keyword cannot be empty.")]
    EmptyKeyword,

    #[error("Tag cannot be empty.")]
    EmptyTag,

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
